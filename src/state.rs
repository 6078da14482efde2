use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::error::IngestError;
use crate::ingest::DatasetKind;
use crate::pipeline;
use crate::present::Presentation;

// ---------------------------------------------------------------------------
// Per-dataset upload slot
// ---------------------------------------------------------------------------

/// What the dashboard holds for one dataset kind.
#[derive(Debug, Default)]
pub struct UploadSlot {
    /// Name of the last uploaded file.
    pub source_name: Option<String>,

    /// Cleaned and presented data (None until an upload succeeds).
    pub presentation: Option<Presentation>,

    /// Colour map for the colour-bound column of a scatter chart, if any.
    pub color_map: Option<ColorMap>,

    /// User-visible error scoped to this dataset.
    pub error: Option<String>,
}

impl UploadSlot {
    fn set_result(&mut self, kind: DatasetKind, result: Result<Presentation, IngestError>) {
        match result {
            Ok(presentation) => {
                self.color_map = ColorMap::for_presentation(&presentation);
                self.presentation = Some(presentation);
                self.error = None;
            }
            Err(e) => {
                log::error!("Failed to process {kind} data: {e}");
                self.presentation = None;
                self.color_map = None;
                self.error = Some(format!("An error occurred with the {kind} data: {e}"));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering. Each dataset kind
/// runs its own pipeline; a failure in one slot leaves the others alone.
#[derive(Debug)]
pub struct Session {
    pub config: DashboardConfig,
    pub slots: BTreeMap<DatasetKind, UploadSlot>,
}

impl Session {
    pub fn new(config: DashboardConfig) -> Self {
        let slots = DatasetKind::ALL
            .into_iter()
            .map(|kind| (kind, UploadSlot::default()))
            .collect();
        Self { config, slots }
    }

    pub fn slot(&self, kind: DatasetKind) -> &UploadSlot {
        &self.slots[&kind]
    }

    /// Run one upload through its pipeline and store the outcome in its slot.
    pub fn upload(&mut self, kind: DatasetKind, name: &str, source: &mut dyn Read) {
        let result = pipeline::run(kind, source, &self.config);
        let slot = self.slots.entry(kind).or_default();
        slot.source_name = Some(name.to_string());
        slot.set_result(kind, result);
    }

    /// [`Session::upload`] from a file path.
    pub fn upload_file(&mut self, kind: DatasetKind, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let result = pipeline::run_file(kind, path, &self.config);
        let slot = self.slots.entry(kind).or_default();
        slot.source_name = Some(name);
        slot.set_result(kind, result);
    }

    /// Forget one dataset.
    pub fn clear(&mut self, kind: DatasetKind) {
        self.slots.insert(kind, UploadSlot::default());
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALES: &str = "Order Date,Price Each,Quantity Ordered\n2021-01-01,20,5\n";
    const PURCHASE: &str = "PurchasePrice,Price,Classification,VendorName\n10,30,1,Acme\n";

    #[test]
    fn failures_are_scoped_to_one_dataset() {
        let mut session = Session::default();
        session.upload(DatasetKind::Sales, "sales.csv", &mut SALES.as_bytes());
        session.upload(DatasetKind::Finance, "finance.csv", &mut "sales\n$1\n".as_bytes());
        session.upload(DatasetKind::Purchase, "purchase.csv", &mut PURCHASE.as_bytes());

        let finance = session.slot(DatasetKind::Finance);
        assert!(finance.presentation.is_none());
        assert_eq!(
            finance.error.as_deref(),
            Some("An error occurred with the finance data: missing required column `date`")
        );
        assert!(session.slot(DatasetKind::Sales).presentation.is_some());
        assert!(session.slot(DatasetKind::Purchase).presentation.is_some());
        assert!(session.slot(DatasetKind::Purchase).color_map.is_some());
    }

    #[test]
    fn successful_reupload_clears_error() {
        let mut session = Session::default();
        session.upload(DatasetKind::Sales, "bad.csv", &mut "x\n1\n".as_bytes());
        assert!(session.slot(DatasetKind::Sales).error.is_some());
        session.upload(DatasetKind::Sales, "good.csv", &mut SALES.as_bytes());
        let slot = session.slot(DatasetKind::Sales);
        assert!(slot.error.is_none());
        assert_eq!(slot.source_name.as_deref(), Some("good.csv"));
    }

    #[test]
    fn clear_resets_slot() {
        let mut session = Session::default();
        session.upload(DatasetKind::Sales, "sales.csv", &mut SALES.as_bytes());
        session.clear(DatasetKind::Sales);
        assert!(session.slot(DatasetKind::Sales).presentation.is_none());
    }
}
