//! `fact_orders`: one row per order.

use std::collections::HashSet;

use crate::domain::{FactOrder, ValidOrder};

/// Build the fact table from validated rows.
///
/// Among rows sharing an `order_id`, the first in input order wins. The
/// result is then stably sorted by `order_date`, so same-day orders keep
/// their input order.
pub fn build_fact_orders(rows: &[ValidOrder]) -> Vec<FactOrder> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut facts: Vec<FactOrder> = rows
        .iter()
        .filter(|r| seen.insert(r.order_id))
        .map(FactOrder::from)
        .collect();

    facts.sort_by_key(|f| f.order_date);
    facts
}
