use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::SchemaError;

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Group-by aggregations
// ---------------------------------------------------------------------------

/// Sum of `value` per distinct `key`, keys ascending. Missing keys and
/// non-numeric values are skipped.
pub fn group_sum(ds: &Dataset, key: &str, value: &str) -> Result<Dataset, SchemaError> {
    group_by(ds, key, value, |vals| vals.iter().sum())
}

/// Mean of `value` per distinct `key`, keys ascending.
pub fn group_mean(ds: &Dataset, key: &str, value: &str) -> Result<Dataset, SchemaError> {
    group_by(ds, key, value, |vals| vals.iter().sum::<f64>() / vals.len() as f64)
}

fn group_by(
    ds: &Dataset,
    key: &str,
    value: &str,
    reduce: impl Fn(&[f64]) -> f64,
) -> Result<Dataset, SchemaError> {
    let k = ds.require_column(key)?;
    let v = ds.require_column(value)?;

    let mut groups: BTreeMap<&CellValue, Vec<f64>> = BTreeMap::new();
    for row in &ds.rows {
        if row[k].is_missing() {
            continue;
        }
        let entry = groups.entry(&row[k]).or_default();
        if let Some(x) = row[v].as_f64() {
            entry.push(x);
        }
    }

    let mut out = Dataset::new([key, value]);
    for (group, vals) in groups {
        let reduced = if vals.is_empty() {
            CellValue::Missing
        } else {
            CellValue::number(reduce(&vals))
        };
        out.push_row(vec![group.clone(), reduced]);
    }
    Ok(out)
}

/// Reorder rows by `value` descending ("total descending" category order).
/// Missing values sort last.
pub fn sort_by_value_desc(mut ds: Dataset, value: &str) -> Result<Dataset, SchemaError> {
    let v = ds.require_column(value)?;
    ds.rows.sort_by(|a, b| match (a[v].as_f64(), b[v].as_f64()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    Ok(ds)
}

// ---------------------------------------------------------------------------
// Monthly buckets
// ---------------------------------------------------------------------------

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1).and_then(|d| d.pred_opt())
}

fn monthly_sums(ds: &Dataset, date: &str, value: &str) -> Result<BTreeMap<(i32, u32), f64>, SchemaError> {
    let d = ds.require_column(date)?;
    let v = ds.require_column(value)?;
    let mut sums: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for row in &ds.rows {
        let Some(when) = row[d].as_date() else {
            continue;
        };
        let bucket = sums.entry((when.year(), when.month())).or_insert(0.0);
        if let Some(x) = row[v].as_f64() {
            *bucket += x;
        }
    }
    Ok(sums)
}

/// Calendar-month totals labelled by month-end date, with every month
/// between the first and last present (empty months total 0).
pub fn resample_month_end_sum(ds: &Dataset, date: &str, value: &str) -> Result<Dataset, SchemaError> {
    let sums = monthly_sums(ds, date, value)?;
    let mut out = Dataset::new([date, value]);

    let (Some(&first), Some(&last)) = (sums.keys().next(), sums.keys().next_back()) else {
        return Ok(out);
    };

    let (mut year, mut month) = first;
    while (year, month) <= last {
        let total = sums.get(&(year, month)).copied().unwrap_or(0.0);
        let label: CellValue = month_end(year, month)
            .map(|d| d.and_time(NaiveTime::MIN))
            .into();
        out.push_row(vec![label, CellValue::number(total)]);
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    Ok(out)
}

/// Totals per `YYYY-MM` period for months that have rows, ascending.
/// The output columns are `Month` and `value`.
pub fn group_by_month_sum(ds: &Dataset, date: &str, value: &str) -> Result<Dataset, SchemaError> {
    let sums = monthly_sums(ds, date, value)?;
    let mut out = Dataset::new(["Month", value]);
    for ((year, month), total) in sums {
        out.push_row(vec![
            CellValue::Text(format!("{year:04}-{month:02}")),
            CellValue::number(total),
        ]);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// One equal-width bin; `end` is exclusive except for the last bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split `values` into `bins` equal-width bins over their range.
/// A constant input gives a single bin holding everything.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: finite.len(),
        }];
    }

    let width = range / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for v in finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::coerce::parse_datetime;

    fn dated(rows: &[(&str, f64)]) -> Dataset {
        let mut ds = Dataset::new(["date", "profit"]);
        for (d, p) in rows {
            ds.push_row(vec![parse_datetime(d).into(), (*p).into()]);
        }
        ds
    }

    #[test]
    fn group_sum_skips_missing_keys() {
        let mut ds = Dataset::new(["product", "sales"]);
        ds.push_row(vec!["A".into(), 10.0.into()]);
        ds.push_row(vec!["B".into(), 5.0.into()]);
        ds.push_row(vec!["A".into(), 2.5.into()]);
        ds.push_row(vec![CellValue::Missing, 99.0.into()]);
        let out = group_sum(&ds, "product", "sales").unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows[0], vec!["A".into(), CellValue::Number(12.5)]);
        assert_eq!(out.rows[1], vec!["B".into(), CellValue::Number(5.0)]);
    }

    #[test]
    fn group_mean_and_descending_order() {
        let mut ds = Dataset::new(["VendorName", "Price"]);
        ds.push_row(vec!["V1".into(), 10.0.into()]);
        ds.push_row(vec!["V1".into(), 20.0.into()]);
        ds.push_row(vec!["V2".into(), 40.0.into()]);
        let out = sort_by_value_desc(group_mean(&ds, "VendorName", "Price").unwrap(), "Price").unwrap();
        assert_eq!(out.rows[0], vec!["V2".into(), CellValue::Number(40.0)]);
        assert_eq!(out.rows[1], vec!["V1".into(), CellValue::Number(15.0)]);
    }

    #[test]
    fn group_requires_columns() {
        let ds = Dataset::new(["product"]);
        assert_eq!(
            group_sum(&ds, "product", "sales"),
            Err(SchemaError::MissingColumn("sales".into()))
        );
    }

    #[test]
    fn month_end_resample_fills_gaps() {
        let ds = dated(&[("2021-01-05", 500.0), ("2021-01-20", 100.0), ("2021-03-02", 1000.0)]);
        let out = resample_month_end_sum(&ds, "date", "profit").unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out.rows[0][0].to_string(), "2021-01-31");
        assert_eq!(out.rows[0][1], CellValue::Number(600.0));
        assert_eq!(out.rows[1][0].to_string(), "2021-02-28");
        assert_eq!(out.rows[1][1], CellValue::Number(0.0));
        assert_eq!(out.rows[2][0].to_string(), "2021-03-31");
    }

    #[test]
    fn month_end_handles_december() {
        let ds = dated(&[("2020-12-15", 1.0), ("2021-01-15", 2.0)]);
        let out = resample_month_end_sum(&ds, "date", "profit").unwrap();
        assert_eq!(out.rows[0][0].to_string(), "2020-12-31");
        assert_eq!(out.rows[1][0].to_string(), "2021-01-31");
    }

    #[test]
    fn period_grouping_only_lists_present_months() {
        let ds = dated(&[("2021-02-01", 1000.0), ("2021-01-01", 500.0), ("2021-04-01", 1.0)]);
        let out = group_by_month_sum(&ds, "date", "profit").unwrap();
        assert_eq!(out.columns, vec!["Month", "profit"]);
        let months: Vec<String> = out.column(0).map(|c| c.to_string()).collect();
        assert_eq!(months, vec!["2021-01", "2021-02", "2021-04"]);
    }

    #[test]
    fn histogram_counts_every_value() {
        let bins = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0, 10.0], 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 6);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 2);
        assert_eq!(bins[4].count, 1);
        assert_eq!(bins[4].end, 10.0);
    }

    #[test]
    fn histogram_of_constant_values_is_one_bin() {
        let bins = histogram(&[7.0, 7.0], 30);
        assert_eq!(bins, vec![HistogramBin { start: 7.0, end: 7.0, count: 2 }]);
        assert!(histogram(&[], 30).is_empty());
    }
}
