//! Integration tests for bizboard

use std::io::Write;

use bizboard::{
    pipeline, render_all, CellValue, DashboardConfig, Dataset, DatasetKind, FinanceIngestion,
    IngestError, Ingestion, JsonSink, ParseError, PurchaseIngestion, SalesIngestion, Session,
};
use tempfile::NamedTempFile;

/// Write `contents` to a temporary `.csv` file
fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn column(ds: &Dataset, name: &str) -> Vec<CellValue> {
    let idx = ds.column_index(name).unwrap();
    ds.column(idx).cloned().collect()
}

#[test]
fn test_finance_scenario() {
    let file = csv_file(
        "date,units_sold,manufacturing_price,sale_price,gross_sales,discounts,sales,cogs,profit\n\
         2021-01-01,\"100\",$10,$20,\"$2,000\",$200,\"$1,800\",$800,\"$1,000\"\n",
    );
    let ingestion = FinanceIngestion;
    let ds = ingestion
        .load_and_clean(&mut std::fs::File::open(file.path()).unwrap())
        .unwrap();

    assert!(column(&ds, "date")[0].as_date().is_some());
    assert_eq!(column(&ds, "manufacturing_price"), vec![CellValue::Number(10.0)]);
    assert_eq!(column(&ds, "units_sold"), vec![CellValue::Number(100.0)]);
    assert_eq!(column(&ds, "gross_sales"), vec![CellValue::Number(2000.0)]);
    assert!(ds.warnings.is_empty());
}

#[test]
fn test_sales_scenario_two_months() {
    let csv = "Order Date,Price Each,Quantity Ordered\n2021-01-01,20,5\n2021-02-01,30,10\n";
    let ds = SalesIngestion::default()
        .load_and_clean(&mut csv.as_bytes())
        .unwrap();
    assert_eq!(
        column(&ds, "Profit"),
        vec![CellValue::Number(100.0), CellValue::Number(300.0)]
    );
}

#[test]
fn test_purchase_scenario() {
    let csv = "Volume,Size\n500ml,250ml\n1000ml,500ml\n500ml,250ml\n";
    let ds = PurchaseIngestion.load_and_clean(&mut csv.as_bytes()).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(
        column(&ds, "Volume_ml"),
        vec![CellValue::Number(500.0), CellValue::Number(1000.0)]
    );
    assert_eq!(
        column(&ds, "Size_ml"),
        vec![CellValue::Number(250.0), CellValue::Number(500.0)]
    );
}

#[test]
fn test_purchase_end_to_end_charts() {
    let file = csv_file(
        "Brand,Price,Size,Classification,PurchasePrice,VendorName\n\
         58,30,750mL,1,10,Vendor1\n\
         62,,375mL,2,20,Vendor2\n\
         63,50,Liter,2,20,Vendor2\n",
    );
    let config = DashboardConfig::default();
    let presentation = pipeline::run_file(DatasetKind::Purchase, file.path(), &config).unwrap();

    assert_eq!(column(&presentation.preview, "Price")[1], CellValue::Number(40.0));
    assert_eq!(presentation.charts.len(), 3);

    let mut sink = JsonSink::default();
    let reports = render_all(&mut sink, &presentation.charts);
    assert!(reports.iter().all(|r| r.is_ok()), "{reports:?}");
    assert_eq!(sink.charts.len(), 3);
    assert_eq!(sink.charts[0]["color"], "Classification");
    assert_eq!(sink.charts[2]["data"]["rows"][0][0], "Vendor2");
}

#[test]
fn test_session_isolates_failures() {
    let finance = csv_file("product,sales\nA,$1\n");
    let sales = csv_file("Order Date,Price Each,Quantity Ordered\n2021-01-01,20,5\n");

    let mut session = Session::default();
    session.upload_file(DatasetKind::Finance, finance.path());
    session.upload_file(DatasetKind::Sales, sales.path());

    let finance_slot = session.slot(DatasetKind::Finance);
    assert!(finance_slot
        .error
        .as_deref()
        .unwrap()
        .starts_with("An error occurred with the finance data"));

    let sales_slot = session.slot(DatasetKind::Sales);
    assert!(sales_slot.error.is_none());
    let presentation = sales_slot.presentation.as_ref().unwrap();
    let summary = presentation.summary.as_ref().unwrap();
    assert_eq!(summary.rows[5], vec!["Total Profit".into(), CellValue::Number(100.0)]);
    assert!(session.slot(DatasetKind::Purchase).presentation.is_none());
}

#[test]
fn test_finance_presentation_with_missing_chart_columns() {
    let csv = "Date,Product,Sales\n01/01/2014,Velo,\"$1,000\"\n02/01/2014,Paseo,$500\n";
    let presentation =
        pipeline::run(DatasetKind::Finance, &mut csv.as_bytes(), &DashboardConfig::default())
            .unwrap();
    let mut sink = JsonSink::default();
    let reports = render_all(&mut sink, &presentation.charts);
    assert!(reports[0].is_ok());
    // No profit column: only the time series fails.
    assert!(!reports[1].is_ok());
    assert_eq!(sink.charts.len(), 1);
}

#[test]
fn test_non_csv_extension_is_rejected() {
    let mut file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    write!(file, "Order Date,Price Each,Quantity Ordered\n2021-01-01,20,5\n").unwrap();

    let err = pipeline::run_file(DatasetKind::Sales, file.path(), &DashboardConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        IngestError::Parse(ParseError::UnsupportedFormat(ref ext)) if ext == "parquet"
    ));

    let mut session = Session::default();
    session.upload_file(DatasetKind::Sales, file.path());
    let slot = session.slot(DatasetKind::Sales);
    assert!(slot.presentation.is_none());
    assert!(slot.error.as_deref().unwrap().contains("unsupported file extension"));
}
