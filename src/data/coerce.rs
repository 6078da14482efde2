//! Cell coercion used by the cleaning pipelines. Failures are never fatal:
//! the caller records a [`CoercionWarning`] and stores `Missing`.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::error::{CoercionTarget, CoercionWarning};

use super::model::{CellValue, Dataset};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y", "%d %B %Y"];

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)").expect("static pattern"))
}

/// Drop `$` and `,` and surrounding whitespace.
pub fn strip_currency(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Currency-aware numeric coercion. `Err` carries the residue that failed.
pub fn to_number(cell: &CellValue) -> Result<Option<f64>, String> {
    match cell {
        CellValue::Number(v) => Ok(Some(*v)),
        CellValue::Missing => Ok(None),
        CellValue::Date(d) => Err(d.to_string()),
        CellValue::Text(s) => {
            let stripped = strip_currency(s);
            if stripped.is_empty() {
                return Ok(None);
            }
            match stripped.parse::<f64>() {
                Ok(v) if !v.is_nan() => Ok(Some(v)),
                _ => Err(s.clone()),
            }
        }
    }
}

/// Parse the date shapes seen in business exports.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Date coercion for one cell. `Err` carries the text that failed.
pub fn to_datetime(cell: &CellValue) -> Result<Option<NaiveDateTime>, String> {
    match cell {
        CellValue::Date(d) => Ok(Some(*d)),
        CellValue::Missing => Ok(None),
        other => {
            let text = other.to_string();
            parse_datetime(&text).map(Some).ok_or(text)
        }
    }
}

/// First run of ASCII digits, e.g. `"750mL"` → `750`.
pub fn leading_integer(s: &str) -> Option<f64> {
    digit_run()
        .captures(s)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Coerce a whole column to numbers in place, recording warnings.
pub fn coerce_numeric_column(ds: &mut Dataset, idx: usize) {
    let column = ds.columns[idx].clone();
    let mut warnings = Vec::new();
    for (row_no, row) in ds.rows.iter_mut().enumerate() {
        row[idx] = match to_number(&row[idx]) {
            Ok(v) => v.into(),
            Err(value) => {
                warnings.push(warning(&column, row_no, value, CoercionTarget::Number));
                CellValue::Missing
            }
        };
    }
    ds.warnings.extend(warnings);
}

/// Coerce a whole column to dates in place, recording warnings.
/// Returns how many cells hold a date afterwards.
pub fn coerce_date_column(ds: &mut Dataset, idx: usize) -> usize {
    let column = ds.columns[idx].clone();
    let mut warnings = Vec::new();
    let mut parsed = 0;
    for (row_no, row) in ds.rows.iter_mut().enumerate() {
        row[idx] = match to_datetime(&row[idx]) {
            Ok(Some(d)) => {
                parsed += 1;
                CellValue::Date(d)
            }
            Ok(None) => CellValue::Missing,
            Err(value) => {
                warnings.push(warning(&column, row_no, value, CoercionTarget::Date));
                CellValue::Missing
            }
        };
    }
    ds.warnings.extend(warnings);
    parsed
}

fn warning(column: &str, row: usize, value: String, target: CoercionTarget) -> CoercionWarning {
    let w = CoercionWarning {
        column: column.to_string(),
        row,
        value,
        target,
    };
    log::warn!("{w}");
    w
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_strings_become_numbers() {
        assert_eq!(to_number(&"$2,000".into()), Ok(Some(2000.0)));
        assert_eq!(to_number(&" $1,234.50 ".into()), Ok(Some(1234.5)));
        assert_eq!(to_number(&CellValue::Number(7.0)), Ok(Some(7.0)));
    }

    #[test]
    fn empty_after_stripping_is_missing() {
        assert_eq!(to_number(&"$".into()), Ok(None));
        assert_eq!(to_number(&" , ".into()), Ok(None));
        assert_eq!(to_number(&CellValue::Missing), Ok(None));
    }

    #[test]
    fn non_numeric_residue_is_an_error() {
        assert_eq!(to_number(&"'100'".into()), Err("'100'".to_string()));
        assert_eq!(to_number(&"$-".into()), Err("$-".to_string()));
    }

    #[test]
    fn parses_common_date_shapes() {
        let jan1 = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(parse_datetime("2021-01-01"), Some(jan1));
        assert_eq!(parse_datetime("01/01/2021"), Some(jan1));
        assert_eq!(parse_datetime("2021-01-01T00:00:00Z"), Some(jan1));
        assert_eq!(
            parse_datetime("04/19/19 08:46"),
            NaiveDate::from_ymd_opt(2019, 4, 19)
                .unwrap()
                .and_hms_opt(8, 46, 0)
        );
        assert_eq!(parse_datetime("not a date"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn extracts_first_digit_run() {
        assert_eq!(leading_integer("500ml"), Some(500.0));
        assert_eq!(leading_integer("1000ml"), Some(1000.0));
        assert_eq!(leading_integer("Pack 4 x 330ml"), Some(4.0));
        assert_eq!(leading_integer("Liter"), None);
    }

    #[test]
    fn column_coercion_records_warnings() {
        let mut ds = Dataset::new(["sales"]);
        ds.push_row(vec!["$1,800".into()]);
        ds.push_row(vec!["n/a".into()]);
        ds.push_row(vec!["".into()]);
        coerce_numeric_column(&mut ds, 0);
        assert_eq!(ds.rows[0][0], CellValue::Number(1800.0));
        assert!(ds.rows[1][0].is_missing());
        assert!(ds.rows[2][0].is_missing());
        assert_eq!(ds.warnings.len(), 1);
        assert_eq!(ds.warnings[0].row, 1);
    }

    #[test]
    fn date_coercion_counts_parsed_cells() {
        let mut ds = Dataset::new(["date"]);
        ds.push_row(vec!["2021-01-01".into()]);
        ds.push_row(vec!["soon".into()]);
        assert_eq!(coerce_date_column(&mut ds, 0), 1);
        assert!(ds.rows[0][0].as_date().is_some());
        assert_eq!(ds.warnings[0].target, CoercionTarget::Date);
    }
}
