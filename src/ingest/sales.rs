use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::data::coerce::{coerce_date_column, to_datetime};
use crate::data::loader::read_csv;
use crate::data::model::{CellValue, Dataset};
use crate::error::{IngestError, SchemaError};

use super::{DatasetKind, Ingestion};

pub const ORDER_DATE: &str = "Order Date";
pub const PRICE_EACH: &str = "Price Each";
pub const QUANTITY_ORDERED: &str = "Quantity Ordered";
pub const COST_PRICE: &str = "Cost price";
pub const PROFIT: &str = "Profit";

/// Unit cost assumed when the table has no `Cost price` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostFallback {
    /// No cost: profit is the full revenue.
    #[default]
    Zero,
    /// Cost equals `Price Each`, so profit is always zero.
    PriceEach,
}

/// Order-level sales exports with a derived `Profit` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesIngestion {
    pub cost_fallback: CostFallback,
}

impl SalesIngestion {
    pub fn new(cost_fallback: CostFallback) -> Self {
        Self { cost_fallback }
    }
}

/// `Price Each` and `Quantity Ordered` are used as loaded; a text cell is a
/// schema problem rather than something to coerce.
fn require_numeric(ds: &Dataset, name: &str) -> Result<usize, SchemaError> {
    let idx = ds.require_column(name)?;
    if ds.is_numeric_column(idx) {
        Ok(idx)
    } else {
        Err(SchemaError::NotNumeric(name.to_string()))
    }
}

/// Every non-blank `Order Date` must parse; blanks stay missing.
fn require_dates(ds: &Dataset, idx: usize) -> Result<(), SchemaError> {
    for (row, cells) in ds.rows.iter().enumerate() {
        if let Err(value) = to_datetime(&cells[idx]) {
            return Err(SchemaError::UnparseableDate {
                column: ds.columns[idx].clone(),
                row,
                value,
            });
        }
    }
    Ok(())
}

impl Ingestion for SalesIngestion {
    fn kind(&self) -> DatasetKind {
        DatasetKind::Sales
    }

    fn load(&self, source: &mut dyn Read) -> Result<Dataset, IngestError> {
        read_csv(source)
    }

    fn clean(&self, mut dataset: Dataset) -> Result<Dataset, IngestError> {
        let date = dataset.require_column(ORDER_DATE)?;
        let price = require_numeric(&dataset, PRICE_EACH)?;
        let quantity = require_numeric(&dataset, QUANTITY_ORDERED)?;
        let cost = dataset
            .column_index(COST_PRICE)
            .map(|_| require_numeric(&dataset, COST_PRICE))
            .transpose()?;

        require_dates(&dataset, date)?;
        let parsed = coerce_date_column(&mut dataset, date);
        if parsed == 0 && !dataset.is_empty() {
            return Err(SchemaError::NoParseableDates(ORDER_DATE.to_string()).into());
        }

        let profit: Vec<CellValue> = dataset
            .rows
            .iter()
            .map(|row| {
                let unit_price = row[price].as_f64()?;
                let ordered = row[quantity].as_f64()?;
                let unit_cost = match cost {
                    Some(c) => row[c].as_f64()?,
                    None => match self.cost_fallback {
                        CostFallback::Zero => 0.0,
                        CostFallback::PriceEach => unit_price,
                    },
                };
                Some((unit_price - unit_cost) * ordered)
            })
            .map(CellValue::from)
            .collect();

        if cost.is_none() {
            log::debug!("sales: no `{COST_PRICE}` column, cost fallback {:?}", self.cost_fallback);
        }
        dataset.set_column(PROFIT, profit);
        Ok(dataset)
    }
}
