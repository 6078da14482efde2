use std::io::Read;

use crate::data::coerce::{coerce_date_column, coerce_numeric_column};
use crate::data::loader::read_csv;
use crate::data::model::Dataset;
use crate::error::IngestError;

use super::{DatasetKind, Ingestion};

/// Columns holding currency-formatted amounts (after header normalisation).
pub const CURRENCY_COLUMNS: [&str; 8] = [
    "units_sold",
    "manufacturing_price",
    "sale_price",
    "gross_sales",
    "discounts",
    "sales",
    "cogs",
    "profit",
];

/// Trim, lowercase and snake-case a header: `" Sale Price"` → `"sale_price"`.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Finance exports: `$`-formatted amounts and a `date` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinanceIngestion;

impl Ingestion for FinanceIngestion {
    fn kind(&self) -> DatasetKind {
        DatasetKind::Finance
    }

    fn load(&self, source: &mut dyn Read) -> Result<Dataset, IngestError> {
        let mut dataset = read_csv(source)?;
        dataset.rename_columns(normalize_column_name);
        Ok(dataset)
    }

    fn clean(&self, mut dataset: Dataset) -> Result<Dataset, IngestError> {
        let date = dataset.require_column("date")?;

        for col in CURRENCY_COLUMNS {
            if let Some(idx) = dataset.column_index(col) {
                coerce_numeric_column(&mut dataset, idx);
            }
        }

        let parsed = coerce_date_column(&mut dataset, date);
        log::debug!("finance: {parsed}/{} dates parsed", dataset.len());
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use crate::error::SchemaError;

    const CSV: &str = "date,units_sold,manufacturing_price,sale_price,gross_sales,discounts,sales,cogs,profit
2021-01-01,'100','$10','$20','$2000','$200','$1800','$800','$1000'";

    fn clean(csv: &str) -> Result<Dataset, IngestError> {
        let ingestion = FinanceIngestion;
        let ds = ingestion.load(&mut csv.as_bytes())?;
        ingestion.clean(ds)
    }

    #[test]
    fn header_names_are_normalized() {
        assert_eq!(normalize_column_name(" Sale Price "), "sale_price");
        assert_eq!(normalize_column_name("COGS"), "cogs");
        let ds = FinanceIngestion
            .load(&mut " Product , Gross Sales,Date\nA,1,2021-01-01\n".as_bytes())
            .unwrap();
        assert_eq!(ds.columns, vec!["product", "gross_sales", "date"]);
    }

    #[test]
    fn currency_columns_become_floats() {
        // Single-quoted numbers are not currency-formatted and do not survive.
        let ds = clean(CSV).unwrap();
        let row = &ds.rows[0];
        assert!(matches!(row[0], CellValue::Date(_)));
        assert!(row[1].is_missing());
        assert!(row[2].is_missing());
        assert_eq!(ds.warnings.len(), 8);
        assert_eq!(ds.warnings[0].column, "units_sold");
    }

    #[test]
    fn dollar_amounts_with_separators() {
        let csv = "Date,Sales,Profit\n01/01/2014,\"$2,000\",\" $1,000.50 \"\n";
        let ds = clean(csv).unwrap();
        assert_eq!(ds.rows[0][1], CellValue::Number(2000.0));
        assert_eq!(ds.rows[0][2], CellValue::Number(1000.5));
        assert!(ds.warnings.is_empty());
    }

    #[test]
    fn blank_amount_is_missing_not_error() {
        let csv = "date,discounts,sales\n2021-01-01,\" $ \",$5\n";
        let ds = clean(csv).unwrap();
        assert!(ds.rows[0][1].is_missing());
        assert_eq!(ds.rows[0][2], CellValue::Number(5.0));
        assert!(ds.warnings.is_empty());
    }

    #[test]
    fn bad_dates_become_missing() {
        let csv = "date,sales\nsoon,$1\n2021-03-04,$2\n";
        let ds = clean(csv).unwrap();
        assert!(ds.rows[0][0].is_missing());
        assert!(ds.rows[1][0].as_date().is_some());
        assert_eq!(ds.warnings.len(), 1);
    }

    #[test]
    fn non_currency_columns_untouched() {
        let csv = "date,product,sales\n2021-01-01,$Widget,$3\n";
        let ds = clean(csv).unwrap();
        assert_eq!(ds.rows[0][1], CellValue::Text("$Widget".into()));
    }

    #[test]
    fn date_column_is_required() {
        let err = clean("sales\n$1\n").unwrap_err();
        assert!(matches!(
            err,
            IngestError::Schema(SchemaError::MissingColumn(ref c)) if c == "date"
        ));
    }
}
