use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Fatal errors for one pipeline run
// ---------------------------------------------------------------------------

/// Any failure that aborts the load → clean → present run of one dataset.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// The source is not well-formed tabular text.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("source has no header row")]
    MissingHeader,
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

/// A column needed by an operation is absent or has the wrong shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required column `{0}`")]
    MissingColumn(String),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("column `{0}` is not numeric")]
    NotNumeric(String),
    #[error("column `{0}` contains no parseable dates")]
    NoParseableDates(String),
    #[error("row {row}, column `{column}`: '{value}' is not a date")]
    UnparseableDate {
        column: String,
        row: usize,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Non-fatal coercion notes
// ---------------------------------------------------------------------------

/// What a cell was being converted into when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionTarget {
    Number,
    Date,
}

/// A value that could not be converted and was treated as missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoercionWarning {
    pub column: String,
    /// Zero-based data row (header excluded).
    pub row: usize,
    pub value: String,
    pub target: CoercionTarget,
}

impl fmt::Display for CoercionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            CoercionTarget::Number => "number",
            CoercionTarget::Date => "date",
        };
        write!(
            f,
            "row {}, column `{}`: '{}' is not a {target}; treated as missing",
            self.row, self.column, self.value
        )
    }
}
