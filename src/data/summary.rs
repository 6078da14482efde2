use crate::error::SchemaError;

use super::model::{CellValue, Dataset};

const STATISTICS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Linear-interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn describe_column(values: &mut [f64]) -> [f64; 8] {
    values.sort_by(f64::total_cmp);
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        f64::NAN
    };
    [
        n,
        mean,
        std,
        values[0],
        quantile(values, 0.25),
        quantile(values, 0.5),
        quantile(values, 0.75),
        values[values.len() - 1],
    ]
}

/// Summary statistics of every numeric column holding at least one value.
/// One row per statistic; the first column is `statistic`.
pub fn describe(ds: &Dataset) -> Dataset {
    let numeric: Vec<usize> = (0..ds.columns.len())
        .filter(|&i| ds.is_numeric_column(i) && ds.column(i).any(|c| !c.is_missing()))
        .collect();

    let stats: Vec<[f64; 8]> = numeric
        .iter()
        .map(|&i| describe_column(&mut ds.numeric_values(i)))
        .collect();

    let mut out = Dataset::new(
        std::iter::once("statistic".to_string()).chain(numeric.iter().map(|&i| ds.columns[i].clone())),
    );
    for (s, name) in STATISTICS.iter().enumerate() {
        let mut row = vec![CellValue::from(*name)];
        row.extend(stats.iter().map(|col| CellValue::number(col[s])));
        out.push_row(row);
    }
    out
}

/// Headline figures for a cleaned sales table, as a `Metric`/`Value` table.
pub fn sales_summary(ds: &Dataset) -> Result<Dataset, SchemaError> {
    ds.require_columns(&["Price Each", "Quantity Ordered", "Profit"])?;
    let price = ds.numeric_values(ds.require_column("Price Each")?);
    let quantity = ds.numeric_values(ds.require_column("Quantity Ordered")?);
    let profit = ds.numeric_values(ds.require_column("Profit")?);

    let total_price: f64 = price.iter().sum();
    let metrics: [(&str, Option<f64>); 6] = [
        ("Total Sales", Some(total_price)),
        (
            "Average Sales Price",
            (!price.is_empty()).then(|| total_price / price.len() as f64),
        ),
        ("Max Sale", price.iter().copied().reduce(f64::max)),
        ("Min Sale", price.iter().copied().reduce(f64::min)),
        ("Total Quantity Sold", Some(quantity.iter().sum())),
        ("Total Profit", Some(profit.iter().sum())),
    ];

    let mut out = Dataset::new(["Metric", "Value"]);
    for (metric, value) in metrics {
        out.push_row(vec![metric.into(), value.into()]);
    }
    Ok(out)
}
