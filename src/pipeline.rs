use std::io::Read;
use std::path::Path;

use crate::config::DashboardConfig;
use crate::data::loader::ensure_supported;
use crate::error::IngestError;
use crate::ingest::DatasetKind;
use crate::present::{present, Presentation};

/// One upload's full run: load → clean → present.
pub fn run(
    kind: DatasetKind,
    source: &mut dyn Read,
    config: &DashboardConfig,
) -> Result<Presentation, IngestError> {
    let ingestion = kind.ingestion(config.cost_fallback);
    let cleaned = ingestion.load_and_clean(source)?;
    let presentation = present(kind, &cleaned, config)?;
    log::info!(
        "{kind} data ready: {} rows, {} chart(s)",
        cleaned.len(),
        presentation.charts.len()
    );
    Ok(presentation)
}

/// [`run`] on a `.csv` or `.txt` file from disk.
pub fn run_file(
    kind: DatasetKind,
    path: &Path,
    config: &DashboardConfig,
) -> Result<Presentation, IngestError> {
    ensure_supported(path)?;
    let mut file = std::fs::File::open(path)?;
    run(kind, &mut file, config)
}
