//! `dim_customers`: per-customer rollup of the validated rows.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::domain::{DimCustomer, ValidOrder};

/// Running aggregate for one customer.
#[derive(Debug)]
struct CustomerAcc {
    city: Option<String>,
    country: Option<String>,
    first_order_date: NaiveDate,
    last_order_date: NaiveDate,
    order_ids: HashSet<i64>,
    lifetime_value: f64,
}

impl CustomerAcc {
    fn new(row: &ValidOrder) -> Self {
        Self {
            city: None,
            country: None,
            first_order_date: row.order_date,
            last_order_date: row.order_date,
            order_ids: HashSet::new(),
            lifetime_value: 0.0,
        }
    }

    fn add(&mut self, row: &ValidOrder) {
        // First non-null value in input order.
        if self.city.is_none() {
            self.city.clone_from(&row.city);
        }
        if self.country.is_none() {
            self.country.clone_from(&row.country);
        }
        self.first_order_date = self.first_order_date.min(row.order_date);
        self.last_order_date = self.last_order_date.max(row.order_date);
        self.order_ids.insert(row.order_id);
        // Summed per row, not per distinct order.
        self.lifetime_value += row.total_amount;
    }

    fn finish(self, customer_id: i64) -> DimCustomer {
        DimCustomer {
            customer_id,
            city: self.city,
            country: self.country,
            first_order_date: self.first_order_date,
            last_order_date: self.last_order_date,
            order_count: self.order_ids.len() as u64,
            lifetime_value: self.lifetime_value,
        }
    }
}

/// Group validated rows by customer, ordered by `customer_id` ascending.
///
/// Rows are not deduplicated first: a repeated `order_id` counts once in
/// `order_count` but adds its amount to `lifetime_value` once per row.
pub fn build_dim_customers(rows: &[ValidOrder]) -> Vec<DimCustomer> {
    let mut groups: BTreeMap<i64, CustomerAcc> = BTreeMap::new();

    for row in rows {
        groups
            .entry(row.customer_id)
            .or_insert_with(|| CustomerAcc::new(row))
            .add(row);
    }

    groups
        .into_iter()
        .map(|(customer_id, acc)| acc.finish(customer_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(order_id: i64, customer_id: i64, day: u32, total: f64, city: Option<&str>) -> ValidOrder {
        ValidOrder {
            order_id,
            customer_id,
            order_date: NaiveDate::from_ymd_opt(2025, 9, day).unwrap(),
            item: "Pen".to_string(),
            quantity: 1.0,
            price: total,
            city: city.map(str::to_string),
            country: Some("UK".to_string()),
            total_amount: total,
        }
    }

    #[test]
    fn rolls_up_per_customer_sorted_by_id() {
        let rows = vec![
            row(1, 20, 5, 3.0, Some("Leeds")),
            row(2, 10, 9, 1.0, Some("London")),
            row(3, 20, 2, 4.0, Some("York")),
        ];
        let dim = build_dim_customers(&rows);

        assert_eq!(dim.len(), 2);
        assert_eq!(dim[0].customer_id, 10);
        assert_eq!(dim[1].customer_id, 20);

        let c20 = &dim[1];
        assert_eq!(c20.city.as_deref(), Some("Leeds"));
        assert_eq!(c20.first_order_date.to_string(), "2025-09-02");
        assert_eq!(c20.last_order_date.to_string(), "2025-09-05");
        assert_eq!(c20.order_count, 2);
        assert_eq!(c20.lifetime_value, 7.0);
    }

    #[test]
    fn duplicate_order_rows_count_once_but_sum_twice() {
        let rows = vec![row(1, 5, 1, 2.5, None), row(1, 5, 1, 2.5, Some("Paris"))];
        let dim = build_dim_customers(&rows);

        assert_eq!(dim[0].order_count, 1);
        assert_eq!(dim[0].lifetime_value, 5.0);
        assert_eq!(dim[0].city.as_deref(), Some("Paris"));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert!(build_dim_customers(&[]).is_empty());
    }
}
