//! bizboard: ingestion, cleaning and chart preparation for finance, sales
//! and purchase-price CSV exports.
//!
//! Each upload runs independently through load → clean → present; the
//! egui dashboard and the `bizboard-report` CLI are thin sinks over this
//! library.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod present;
pub mod state;

pub use chart::{
    render_all, ChartError, ChartKind, ChartOutcome, ChartReport, ChartSink, ChartSpec, JsonSink,
};
pub use config::DashboardConfig;
pub use data::model::{CellValue, Dataset};
pub use error::{CoercionWarning, IngestError, ParseError, SchemaError};
pub use ingest::{
    CostFallback, DatasetKind, FinanceIngestion, Ingestion, PurchaseIngestion, SalesIngestion,
};
pub use present::Presentation;
pub use state::Session;
