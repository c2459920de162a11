//! Row filters: the optional date cutoff and the validity rules.
//!
//! Neither filter reports individual rows; rejected rows simply disappear.

use chrono::NaiveDate;

use crate::domain::{OrderRecord, ValidOrder};
use crate::error::TransformError;
use crate::transform::coerce::parse_date;

/// Parse the `--min-date` argument with the same rules as `order_date` cells.
pub fn parse_min_date(raw: &str) -> Result<NaiveDate, TransformError> {
    parse_date(raw).ok_or_else(|| TransformError::InvalidMinDate(raw.to_string()))
}

/// Keep rows dated on or after `cutoff`. Rows without a date cannot satisfy
/// the bound and are dropped too.
pub fn apply_cutoff(records: Vec<OrderRecord>, cutoff: NaiveDate) -> Vec<OrderRecord> {
    records
        .into_iter()
        .filter(|r| r.order_date.is_some_and(|d| d >= cutoff))
        .collect()
}

/// Apply the validity rules and compute `total_amount` for the survivors.
///
/// A row survives only if none of order_id, customer_id, order_date, item,
/// quantity, price is null, `quantity > 0` and `price >= 0`.
pub fn validate_rows(records: Vec<OrderRecord>) -> Vec<ValidOrder> {
    records.into_iter().filter_map(validate).collect()
}

fn validate(r: OrderRecord) -> Option<ValidOrder> {
    let quantity = r.quantity?;
    let price = r.price?;
    // NaN fails both comparisons.
    if !(quantity > 0.0 && price >= 0.0) {
        return None;
    }

    Some(ValidOrder {
        order_id: r.order_id?,
        customer_id: r.customer_id?,
        order_date: r.order_date?,
        item: r.item?,
        quantity,
        price,
        city: r.city,
        country: r.country,
        total_amount: quantity * price,
    })
}
