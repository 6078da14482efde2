use std::io::Read;
use std::path::Path;

use crate::error::{IngestError, ParseError};

use super::model::{CellValue, Dataset};

/// Tokens a dataframe reader treats as "not available" by default.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Only delimited text (`.csv`, `.txt`) is accepted.
pub fn ensure_supported(path: &Path) -> Result<(), ParseError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => Ok(()),
        other => Err(ParseError::UnsupportedFormat(other.to_string())),
    }
}

/// Load a dataset from a file.  Dispatch by extension; only delimited
/// text is supported.
pub fn load_file(path: &Path) -> Result<Dataset, IngestError> {
    ensure_supported(path)?;
    let file = std::fs::File::open(path)?;
    read_csv(file)
}

/// CSV layout: one header row with column names, then one record per row.
/// Every record must have as many fields as the header.
pub fn read_csv<R: Read>(source: R) -> Result<Dataset, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .map_err(ParseError::from)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::MissingHeader.into());
    }

    let mut dataset = Dataset::new(headers);

    for result in reader.records() {
        let record = result.map_err(ParseError::from)?;
        dataset.push_row(record.iter().map(guess_cell_type).collect());
    }

    log::debug!(
        "Read {} rows with columns {:?}",
        dataset.len(),
        dataset.columns
    );
    Ok(dataset)
}

/// Per-cell type inference: NA tokens → `Missing`, floats → `Number`,
/// everything else stays text. Dates are parsed later by the pipelines.
pub fn guess_cell_type(s: &str) -> CellValue {
    let trimmed = s.trim();
    if NA_TOKENS.contains(&trimmed) {
        return CellValue::Missing;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => CellValue::number(v),
        _ => CellValue::Text(s.to_string()),
    }
}
