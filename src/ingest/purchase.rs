use std::io::Read;

use crate::data::coerce::leading_integer;
use crate::data::loader::read_csv;
use crate::data::model::{CellValue, Dataset};
use crate::error::IngestError;

use super::{DatasetKind, Ingestion};

/// Unit-labelled text columns and the numeric column derived from each.
pub const UNIT_COLUMNS: [(&str, &str); 2] = [("Volume", "Volume_ml"), ("Size", "Size_ml")];

/// Purchase-price lists: unit-labelled sizes, duplicate rows, gaps in numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PurchaseIngestion;

/// Leading integer of each cell's text form; no digit run means missing.
fn extract_measure(ds: &Dataset, idx: usize) -> Vec<CellValue> {
    ds.column(idx)
        .map(|cell| match cell {
            CellValue::Missing => CellValue::Missing,
            other => leading_integer(&other.to_string()).into(),
        })
        .collect()
}

/// Replace missing cells of every numeric column with the column mean.
/// Columns with no values at all are left missing.
fn impute_means(ds: &mut Dataset) {
    for idx in 0..ds.columns.len() {
        if !ds.is_numeric_column(idx) {
            continue;
        }
        let values = ds.numeric_values(idx);
        if values.len() == ds.len() {
            continue;
        }
        if values.is_empty() {
            log::warn!(
                "purchase: column `{}` has no values; leaving it missing",
                ds.columns[idx]
            );
            continue;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let mut filled = 0;
        for row in ds.rows.iter_mut().filter(|r| r[idx].is_missing()) {
            row[idx] = CellValue::Number(mean);
            filled += 1;
        }
        log::debug!(
            "purchase: filled {filled} missing `{}` value(s) with mean {mean}",
            ds.columns[idx]
        );
    }
}

impl Ingestion for PurchaseIngestion {
    fn kind(&self) -> DatasetKind {
        DatasetKind::Purchase
    }

    fn load(&self, source: &mut dyn Read) -> Result<Dataset, IngestError> {
        read_csv(source)
    }

    fn clean(&self, mut dataset: Dataset) -> Result<Dataset, IngestError> {
        for (source, derived) in UNIT_COLUMNS {
            if let Some(idx) = dataset.column_index(source) {
                let values = extract_measure(&dataset, idx);
                dataset.set_column(derived, values);
            }
        }

        let dropped = dataset.drop_duplicates();
        if dropped > 0 {
            log::info!("purchase: removed {dropped} duplicate row(s)");
        }

        impute_means(&mut dataset);
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(csv: &str) -> Dataset {
        let ingestion = PurchaseIngestion;
        let ds = ingestion.load(&mut csv.as_bytes()).unwrap();
        ingestion.clean(ds).unwrap()
    }

    fn col(ds: &Dataset, name: &str) -> Vec<CellValue> {
        ds.column(ds.column_index(name).unwrap()).cloned().collect()
    }

    #[test]
    fn unit_labels_become_numbers() {
        let ds = clean("Volume,Size\n500ml,250ml\n1000ml,500ml\n");
        assert_eq!(ds.columns, vec!["Volume", "Size", "Volume_ml", "Size_ml"]);
        assert_eq!(col(&ds, "Volume_ml"), vec![CellValue::Number(500.0), CellValue::Number(1000.0)]);
        assert_eq!(col(&ds, "Size_ml"), vec![CellValue::Number(250.0), CellValue::Number(500.0)]);
    }

    #[test]
    fn plain_numeric_volume_is_kept() {
        let ds = clean("Volume,Size\n750,750mL\n");
        assert_eq!(col(&ds, "Volume_ml"), vec![CellValue::Number(750.0)]);
    }

    #[test]
    fn no_digits_then_mean_imputed() {
        let ds = clean("Size\n750mL\nLiter\n250mL\n");
        assert_eq!(
            col(&ds, "Size_ml"),
            vec![CellValue::Number(750.0), CellValue::Number(500.0), CellValue::Number(250.0)]
        );
    }

    #[test]
    fn duplicate_rows_collapse() {
        let ds = clean("VendorName,Price\nAcme,10\nAcme,10\nBolt,12\n");
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn signed_zero_rows_are_duplicates() {
        let ds = clean("Brand,Price\nA,0\nA,-0\n");
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn missing_number_gets_column_mean() {
        let ds = clean("Brand,Price\nA,10\nB,20\nC,\n");
        assert_eq!(
            col(&ds, "Price"),
            vec![CellValue::Number(10.0), CellValue::Number(20.0), CellValue::Number(15.0)]
        );
    }

    #[test]
    fn duplicates_dropped_before_mean() {
        let ds = clean("Brand,Price\nA,10\nA,10\nB,40\nC,\n");
        assert_eq!(col(&ds, "Price")[2], CellValue::Number(25.0));
    }

    #[test]
    fn text_columns_and_empty_columns_untouched() {
        let ds = clean("Brand,Note,Price\nA,,1\n,x,3\n");
        assert_eq!(col(&ds, "Brand")[1], CellValue::Missing);
        let ds = clean("Brand,Empty\nA,\nB,\n");
        assert!(col(&ds, "Empty").iter().all(CellValue::is_missing));
    }

    #[test]
    fn no_unit_columns_is_fine() {
        let ds = clean("VendorName,PurchasePrice\nAcme,3.5\n");
        assert_eq!(ds.columns, vec!["VendorName", "PurchasePrice"]);
    }
}
