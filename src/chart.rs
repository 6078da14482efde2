//! Chart specifications handed to a rendering sink.
//!
//! Building a spec and rendering it are both guarded per chart: one chart
//! failing never stops the others of the same presentation.

use serde::Serialize;
use thiserror::Error;

use crate::data::model::Dataset;
use crate::error::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    Histogram,
}

/// Everything a sink needs to draw one chart: the kind, column bindings,
/// labels and the (already aggregated) table to draw from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x: String,
    pub y: Option<String>,
    pub color: Option<String>,
    pub x_label: String,
    pub y_label: String,
    /// Bin count, histograms only.
    pub bins: Option<usize>,
    pub data: Dataset,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: &str, data: Dataset, x: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            x: x.to_string(),
            y: None,
            color: None,
            x_label: x.to_string(),
            y_label: String::new(),
            bins: None,
            data,
        }
    }

    pub fn y(mut self, column: &str) -> Self {
        self.y = Some(column.to_string());
        if self.y_label.is_empty() {
            self.y_label = column.to_string();
        }
        self
    }

    pub fn color(mut self, column: &str) -> Self {
        self.color = Some(column.to_string());
        self
    }

    pub fn labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn bins(mut self, bins: usize) -> Self {
        self.bins = Some(bins);
        self
    }

    /// Check that every bound column exists in `data`.
    pub fn validate(&self) -> Result<(), ChartError> {
        let bound: Vec<&str> = std::iter::once(self.x.as_str())
            .chain(self.y.as_deref())
            .chain(self.color.as_deref())
            .collect();
        self.data.require_columns(&bound)?;
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("no data to plot for `{0}`")]
    NoData(String),
    #[error("rendering failed: {0}")]
    Sink(String),
}

/// The result of building one chart, titled so failures can be reported.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOutcome {
    pub title: String,
    pub result: Result<ChartSpec, ChartError>,
}

impl ChartOutcome {
    /// Run one chart builder under its own guard.
    pub fn build(title: &str, f: impl FnOnce() -> Result<ChartSpec, ChartError>) -> Self {
        let result = f().and_then(|spec| {
            spec.validate()?;
            Ok(spec)
        });
        if let Err(e) = &result {
            log::warn!("Chart '{title}' skipped: {e}");
        }
        Self {
            title: title.to_string(),
            result,
        }
    }
}

/// The external drawing surface.
pub trait ChartSink {
    fn render(&mut self, spec: &ChartSpec) -> Result<(), ChartError>;
}

/// Per-chart status after handing a presentation to a sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartReport {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChartReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// User-facing line, e.g. "Error plotting Sales by Product: ...".
    pub fn message(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|e| format!("Error plotting {}: {e}", self.title))
    }
}

/// Render each chart independently, collecting one report per chart.
pub fn render_all(sink: &mut dyn ChartSink, charts: &[ChartOutcome]) -> Vec<ChartReport> {
    charts
        .iter()
        .map(|outcome| {
            let result = match &outcome.result {
                Ok(spec) => sink.render(spec),
                Err(e) => Err(e.clone()),
            };
            ChartReport {
                title: outcome.title.clone(),
                error: result.err().map(|e| e.to_string()),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON sink
// ---------------------------------------------------------------------------

/// Collects rendered specs as JSON values, for headless output.
#[derive(Debug, Default)]
pub struct JsonSink {
    pub charts: Vec<serde_json::Value>,
}

impl ChartSink for JsonSink {
    fn render(&mut self, spec: &ChartSpec) -> Result<(), ChartError> {
        if spec.data.is_empty() {
            return Err(ChartError::NoData(spec.title.clone()));
        }
        let value = serde_json::to_value(spec).map_err(|e| ChartError::Sink(e.to_string()))?;
        self.charts.push(value);
        Ok(())
    }
}
