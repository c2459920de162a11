//! Required-column check for the raw extract.

use crate::domain::RawTable;
use crate::error::TransformError;

/// Columns every order extract must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "order_id",
    "customer_id",
    "order_date",
    "item",
    "quantity",
    "price",
    "city",
    "country",
];

/// Positions of the required columns inside a particular [`RawTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub order_id: usize,
    pub customer_id: usize,
    pub order_date: usize,
    pub item: usize,
    pub quantity: usize,
    pub price: usize,
    pub city: usize,
    pub country: usize,
}

/// Resolve every required column, or report all of the missing ones at once.
pub fn resolve_columns(table: &RawTable) -> Result<ColumnIndex, TransformError> {
    let positions: Vec<Option<usize>> = REQUIRED_COLUMNS
        .iter()
        .map(|name| table.column_index(name))
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .zip(&positions)
        .filter(|(_, pos)| pos.is_none())
        .map(|(name, _)| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(TransformError::MissingColumns(missing));
    }

    let at = |i: usize| positions[i].unwrap_or_default();
    Ok(ColumnIndex {
        order_id: at(0),
        customer_id: at(1),
        order_date: at(2),
        item: at(3),
        quantity: at(4),
        price: at(5),
        city: at(6),
        country: at(7),
    })
}
