//! Presentation step: preview, summary table and chart set per dataset kind.

use serde::Serialize;

use crate::chart::{ChartKind, ChartOutcome, ChartSpec};
use crate::config::DashboardConfig;
use crate::data::aggregate::{
    group_by_month_sum, group_mean, group_sum, resample_month_end_sum, sort_by_value_desc,
};
use crate::data::model::Dataset;
use crate::data::summary::{describe, sales_summary};
use crate::error::{CoercionWarning, SchemaError};
use crate::ingest::sales::{ORDER_DATE, PROFIT};
use crate::ingest::DatasetKind;

/// Columns every purchase-price chart relies on.
pub const PURCHASE_REQUIRED: [&str; 3] = ["PurchasePrice", "Price", "Classification"];

/// What the UI shows for one cleaned dataset.
#[derive(Debug, Clone, Serialize)]
pub struct Presentation {
    pub kind: DatasetKind,
    pub heading: String,
    pub preview: Dataset,
    pub summary: Option<Dataset>,
    /// Values the cleaning step treated as missing.
    pub warnings: Vec<CoercionWarning>,
    #[serde(skip)]
    pub charts: Vec<ChartOutcome>,
}

pub fn present(
    kind: DatasetKind,
    ds: &Dataset,
    config: &DashboardConfig,
) -> Result<Presentation, SchemaError> {
    match kind {
        DatasetKind::Finance => Ok(present_finance(ds, config)),
        DatasetKind::Sales => present_sales(ds, config),
        DatasetKind::Purchase => present_purchase(ds, config),
    }
}

pub fn present_finance(ds: &Dataset, config: &DashboardConfig) -> Presentation {
    let charts = vec![
        ChartOutcome::build("Sales by Product", || {
            let totals = sort_by_value_desc(group_sum(ds, "product", "sales")?, "sales")?;
            Ok(ChartSpec::new(ChartKind::Bar, "Sales by Product", totals, "product")
                .y("sales")
                .labels("Product", "Total Sales"))
        }),
        ChartOutcome::build("Profit Over Time", || {
            let monthly = resample_month_end_sum(ds, "date", "profit")?;
            Ok(ChartSpec::new(ChartKind::Line, "Profit Over Time", monthly, "date")
                .y("profit")
                .labels("date", "Total Profit"))
        }),
    ];

    Presentation {
        kind: DatasetKind::Finance,
        heading: "Finance Data Overview".to_string(),
        preview: ds.head(config.preview_rows),
        summary: Some(describe(ds)),
        warnings: ds.warnings.clone(),
        charts,
    }
}

pub fn present_sales(ds: &Dataset, config: &DashboardConfig) -> Result<Presentation, SchemaError> {
    let summary = sales_summary(ds)?;

    let charts = vec![ChartOutcome::build("Monthly Profit Over Time", || {
        let monthly = group_by_month_sum(ds, ORDER_DATE, PROFIT)?;
        Ok(ChartSpec::new(ChartKind::Line, "Monthly Profit Over Time", monthly, "Month")
            .y(PROFIT)
            .labels("Month", "Total Profit"))
    })];

    Ok(Presentation {
        kind: DatasetKind::Sales,
        heading: "Sales Data Overview".to_string(),
        preview: ds.head(config.preview_rows),
        summary: Some(summary),
        warnings: ds.warnings.clone(),
        charts,
    })
}

pub fn present_purchase(ds: &Dataset, config: &DashboardConfig) -> Result<Presentation, SchemaError> {
    ds.require_columns(&PURCHASE_REQUIRED)?;

    let charts = vec![
        ChartOutcome::build("Price vs Purchase Price", || {
            let points = ds.select(&["PurchasePrice", "Price", "Classification"])?;
            Ok(ChartSpec::new(
                ChartKind::Scatter,
                "Purchase Price vs. Sale Price by Classification",
                points,
                "PurchasePrice",
            )
            .y("Price")
            .color("Classification")
            .labels("Purchase Price", "Sale Price"))
        }),
        ChartOutcome::build("Distribution of Purchase Prices", || {
            let values = ds.select(&["PurchasePrice"])?;
            Ok(ChartSpec::new(
                ChartKind::Histogram,
                "Distribution of Purchase Prices",
                values,
                "PurchasePrice",
            )
            .labels("PurchasePrice", "count")
            .bins(config.histogram_bins))
        }),
        ChartOutcome::build("Average Prices by Vendor", || {
            let averages = sort_by_value_desc(group_mean(ds, "VendorName", "Price")?, "Price")?;
            Ok(ChartSpec::new(ChartKind::Bar, "Average Sale Price by Vendor", averages, "VendorName")
                .y("Price")
                .labels("Vendor", "Average Sale Price ($)"))
        }),
    ];

    Ok(Presentation {
        kind: DatasetKind::Purchase,
        heading: "Purchase Price Data Overview".to_string(),
        preview: ds.head(config.preview_rows),
        summary: None,
        warnings: ds.warnings.clone(),
        charts,
    })
}
