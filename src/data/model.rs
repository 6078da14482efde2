use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::error::{CoercionWarning, SchemaError};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a tabular dataset
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a dataframe would infer.
/// Grouping and duplicate removal key on cells, so `CellValue` must be `Ord` + `Hash`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
    Missing,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeMap / HashSet --
// Equality, ordering and hashing all treat 0.0 and -0.0 as one number.

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Missing => 0,
                Number(_) => 1,
                Date(_) => 2,
                Text(_) => 3,
            }
        }
        match (self, other) {
            (Missing, Missing) => std::cmp::Ordering::Equal,
            (Number(a), Number(b)) => a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b)),
            (Date(a), Date(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Number(f) if *f == 0.0 => 0u64.hash(state),
            CellValue::Number(f) => f.to_bits().hash(state),
            CellValue::Text(s) => s.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::Missing => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Date(d) => {
                if d.time() == chrono::NaiveTime::MIN {
                    write!(f, "{}", d.date())
                } else {
                    write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            CellValue::Missing => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(v) => serializer.serialize_f64(*v),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Date(_) => serializer.collect_str(self),
            CellValue::Missing => serializer.serialize_none(),
        }
    }
}

impl CellValue {
    /// Wrap a float, mapping NaN to `Missing` so missing-ness has one spelling.
    /// `-0.0` is stored as `0.0`.
    pub fn number(v: f64) -> Self {
        if v.is_nan() {
            CellValue::Missing
        } else {
            CellValue::Number(v + 0.0)
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Missing)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered table: named columns, rows of cells, and the coercion
/// warnings collected while cleaning it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CoercionWarning>,
}

impl Dataset {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Dataset {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Append a row, padding with `Missing` or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Index of a column that must exist.
    pub fn require_column(&self, name: &str) -> Result<usize, SchemaError> {
        self.column_index(name)
            .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
    }

    /// Check several columns at once, reporting every absent one.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), SchemaError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !self.has_column(n))
            .map(|n| n.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::MissingColumns(missing))
        }
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |r| &r[idx])
    }

    /// Non-missing numbers of a column.
    pub fn numeric_values(&self, idx: usize) -> Vec<f64> {
        self.column(idx).filter_map(CellValue::as_f64).collect()
    }

    /// True when every non-missing cell is a number. An all-missing column
    /// counts as numeric, like a float column full of NaN.
    pub fn is_numeric_column(&self, idx: usize) -> bool {
        self.column(idx)
            .all(|c| matches!(c, CellValue::Number(_) | CellValue::Missing))
    }

    /// Replace a column's cells, or append it as the last column.
    pub fn set_column(&mut self, name: &str, values: Vec<CellValue>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row[idx] = v;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
    }

    /// Rewrite every column name through `f`.
    pub fn rename_columns(&mut self, f: impl Fn(&str) -> String) {
        self.columns = self.columns.iter().map(|c| f(c)).collect();
    }

    /// A new table holding only `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<Dataset, SchemaError> {
        self.require_columns(names)?;
        let idx: Vec<usize> = names
            .iter()
            .filter_map(|n| self.column_index(n))
            .collect();
        Ok(Dataset {
            columns: names.iter().map(|n| n.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| idx.iter().map(|&i| r[i].clone()).collect())
                .collect(),
            warnings: Vec::new(),
        })
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
            warnings: Vec::new(),
        }
    }

    /// Remove rows equal across all columns, keeping the first occurrence.
    /// Returns how many rows were dropped.
    pub fn drop_duplicates(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<CellValue>> = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }
}
