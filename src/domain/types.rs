//! Shared domain types.
//!
//! Three layers of order data flow through the pipeline:
//!
//! - [`RawTable`] / [`RawValue`]: what extraction hands over, untyped
//! - [`OrderRecord`] → [`ValidOrder`]: canonical records before and after filtering
//! - [`FactOrder`] / [`DimCustomer`]: the two output tables

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single untyped cell of the raw extract.
///
/// CSV extraction only produces `Text` and `Null`; the numeric variants exist
/// so in-memory callers can hand over native values.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

static NULL_CELL: RawValue = RawValue::Null;

/// Cell spellings treated as missing, mirroring the usual CSV reader defaults.
const NULL_MARKERS: [&str; 8] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

impl RawValue {
    /// Build a cell from CSV text, mapping null markers to [`RawValue::Null`].
    pub fn from_csv_field(field: &str) -> Self {
        let trimmed = field.trim();
        if NULL_MARKERS.contains(&trimmed) {
            RawValue::Null
        } else {
            RawValue::Text(trimmed.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(s) => NULL_MARKERS.contains(&s.trim()),
            // A NaN float is how in-memory numeric columns spell "missing".
            RawValue::Float(v) => v.is_nan(),
            RawValue::Int(_) => false,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => Ok(()),
            RawValue::Int(v) => write!(f, "{v}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Int(i64::from(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Null, Into::into)
    }
}

/// In-memory tabular extract: a header plus rows of untyped cells.
///
/// Rows may be shorter than the header; missing trailing cells read as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from named columns of equal length (column-major input).
    ///
    /// Shorter columns are padded with nulls.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<RawValue>)>,
        S: Into<String>,
    {
        let (names, values): (Vec<String>, Vec<Vec<RawValue>>) =
            columns.into_iter().map(|(name, vals)| (name.into(), vals)).unzip();
        let n_rows = values.iter().map(Vec::len).max().unwrap_or(0);

        let rows = (0..n_rows)
            .map(|r| {
                values
                    .iter()
                    .map(|col| col.get(r).cloned().unwrap_or(RawValue::Null))
                    .collect()
            })
            .collect();

        Self { columns: names, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<RawValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a chunk of rows read with the same header.
    pub fn append_rows(&mut self, rows: Vec<Vec<RawValue>>) {
        self.rows.extend(rows);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> &RawValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL_CELL)
    }

    /// First `n` rows, keeping the header.
    pub fn head(&self, n: usize) -> RawTable {
        RawTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// An order row after type coercion, before validation.
///
/// Every field is optional here: null cells coerce to `None` and are dealt
/// with by the validity filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderRecord {
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub order_date: Option<NaiveDate>,
    pub item: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// An order row that passed the validity filter.
///
/// Invariants: `quantity > 0`, `price >= 0`, `total_amount == quantity * price`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidOrder {
    pub order_id: i64,
    pub customer_id: i64,
    pub order_date: NaiveDate,
    pub item: String,
    pub quantity: f64,
    pub price: f64,
    pub city: Option<String>,
    pub country: Option<String>,
    pub total_amount: f64,
}

/// One row of the `fact_orders` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactOrder {
    pub order_id: i64,
    pub customer_id: i64,
    pub order_date: NaiveDate,
    pub item: String,
    pub quantity: f64,
    pub price: f64,
    pub total_amount: f64,
}

impl FactOrder {
    pub const TABLE: &'static str = "fact_orders";
    pub const COLUMNS: [&'static str; 7] = [
        "order_id",
        "customer_id",
        "order_date",
        "item",
        "quantity",
        "price",
        "total_amount",
    ];
}

impl From<&ValidOrder> for FactOrder {
    fn from(o: &ValidOrder) -> Self {
        FactOrder {
            order_id: o.order_id,
            customer_id: o.customer_id,
            order_date: o.order_date,
            item: o.item.clone(),
            quantity: o.quantity,
            price: o.price,
            total_amount: o.total_amount,
        }
    }
}

/// One row of the `dim_customers` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimCustomer {
    pub customer_id: i64,
    pub city: Option<String>,
    pub country: Option<String>,
    pub first_order_date: NaiveDate,
    pub last_order_date: NaiveDate,
    pub order_count: u64,
    pub lifetime_value: f64,
}

impl DimCustomer {
    pub const TABLE: &'static str = "dim_customers";
    pub const COLUMNS: [&'static str; 7] = [
        "customer_id",
        "city",
        "country",
        "first_order_date",
        "last_order_date",
        "order_count",
        "lifetime_value",
    ];
}

/// Resolved options for one `etl run`.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// CSV path or http(s) URL.
    pub source: String,
    pub db_path: PathBuf,
    /// Rows per read chunk; `None` reads in one pass.
    pub chunk_size: Option<usize>,
    /// Inclusive lower bound on `order_date`, as given on the command line.
    pub min_date: Option<String>,
    pub http_timeout: Duration,
    /// Also write both tables to this JSON file.
    pub export_json: Option<PathBuf>,
}
