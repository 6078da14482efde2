//! Per-dataset ingestion pipelines sharing one load/clean contract.

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::model::Dataset;
use crate::error::IngestError;

pub mod finance;
pub mod purchase;
pub mod sales;

pub use finance::FinanceIngestion;
pub use purchase::PurchaseIngestion;
pub use sales::{CostFallback, SalesIngestion};

/// Load a tabular source and normalise it into an analysis-ready table.
pub trait Ingestion {
    fn kind(&self) -> DatasetKind;

    /// Read the source. Fails with a parse error when it is not well-formed CSV.
    fn load(&self, source: &mut dyn Read) -> Result<Dataset, IngestError>;

    /// Apply this dataset kind's cleaning rules.
    fn clean(&self, dataset: Dataset) -> Result<Dataset, IngestError>;

    fn load_and_clean(&self, source: &mut dyn Read) -> Result<Dataset, IngestError> {
        let dataset = self.load(source)?;
        log::info!(
            "Loaded {} {} rows with columns {:?}",
            dataset.len(),
            self.kind(),
            dataset.columns
        );
        let cleaned = self.clean(dataset)?;
        if !cleaned.warnings.is_empty() {
            log::warn!(
                "{} cleaning treated {} value(s) as missing",
                self.kind(),
                cleaned.warnings.len()
            );
        }
        Ok(cleaned)
    }
}

/// The three dataset kinds the dashboard accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Finance,
    Sales,
    Purchase,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [DatasetKind::Finance, DatasetKind::Sales, DatasetKind::Purchase];

    /// The pipeline for this kind.
    pub fn ingestion(self, cost_fallback: CostFallback) -> Box<dyn Ingestion> {
        match self {
            DatasetKind::Finance => Box::new(FinanceIngestion),
            DatasetKind::Sales => Box::new(SalesIngestion::new(cost_fallback)),
            DatasetKind::Purchase => Box::new(PurchaseIngestion),
        }
    }

    /// Human label used in headings and error messages.
    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::Finance => "finance",
            DatasetKind::Sales => "sales",
            DatasetKind::Purchase => "purchase price",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "finance" => Ok(DatasetKind::Finance),
            "sales" => Ok(DatasetKind::Sales),
            "purchase" | "purchase-price" | "purchase_price" => Ok(DatasetKind::Purchase),
            other => Err(format!(
                "unknown dataset kind '{other}' (expected finance, sales or purchase)"
            )),
        }
    }
}
