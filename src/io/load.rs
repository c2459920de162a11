//! Load the output tables into the SQLite warehouse.
//!
//! Both tables are replaced wholesale on every run inside one transaction, so
//! a failed load leaves the previous warehouse contents untouched.

use std::fs::create_dir_all;
use std::path::Path;

use rusqlite::{Connection, Transaction, params};
use tracing::info;

use crate::domain::{DimCustomer, FactOrder};
use crate::error::{AppError, EXIT_IO};

const CREATE_DIM_CUSTOMERS: &str = "CREATE TABLE dim_customers (
    customer_id INTEGER NOT NULL,
    city TEXT,
    country TEXT,
    first_order_date TEXT NOT NULL,
    last_order_date TEXT NOT NULL,
    order_count INTEGER NOT NULL,
    lifetime_value REAL NOT NULL
)";

const CREATE_FACT_ORDERS: &str = "CREATE TABLE fact_orders (
    order_id INTEGER NOT NULL,
    customer_id INTEGER NOT NULL,
    order_date TEXT NOT NULL,
    item TEXT NOT NULL,
    quantity REAL NOT NULL,
    price REAL NOT NULL,
    total_amount REAL NOT NULL
)";

/// Replace `fact_orders` and `dim_customers` in the database at `db_path`.
pub fn load_to_sqlite(fact: &[FactOrder], dim: &[DimCustomer], db_path: &Path) -> Result<(), AppError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| {
            AppError::new(
                EXIT_IO,
                format!("Failed to create database directory '{}': {e}", parent.display()),
            )
        })?;
    }

    let mut conn = Connection::open(db_path)
        .map_err(|e| db_error(format!("Failed to open database '{}'", db_path.display()), e))?;
    let tx = conn
        .transaction()
        .map_err(|e| db_error("Failed to start transaction", e))?;

    replace_dim_customers(&tx, dim)?;
    replace_fact_orders(&tx, fact)?;

    tx.commit().map_err(|e| db_error("Failed to commit load", e))?;

    info!(
        db = %db_path.display(),
        fact_orders = fact.len(),
        dim_customers = dim.len(),
        "loaded warehouse tables"
    );
    Ok(())
}

fn replace_dim_customers(tx: &Transaction<'_>, dim: &[DimCustomer]) -> Result<(), AppError> {
    recreate(tx, DimCustomer::TABLE, CREATE_DIM_CUSTOMERS)?;

    let mut stmt = tx
        .prepare(
            "INSERT INTO dim_customers (customer_id, city, country, first_order_date, last_order_date, order_count, lifetime_value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(|e| db_error("Failed to prepare dim_customers insert", e))?;

    for c in dim {
        stmt.execute(params![
            c.customer_id,
            c.city,
            c.country,
            c.first_order_date.to_string(),
            c.last_order_date.to_string(),
            c.order_count as i64,
            c.lifetime_value,
        ])
        .map_err(|e| db_error(format!("Failed to insert customer {}", c.customer_id), e))?;
    }
    Ok(())
}

fn replace_fact_orders(tx: &Transaction<'_>, fact: &[FactOrder]) -> Result<(), AppError> {
    recreate(tx, FactOrder::TABLE, CREATE_FACT_ORDERS)?;

    let mut stmt = tx
        .prepare(
            "INSERT INTO fact_orders (order_id, customer_id, order_date, item, quantity, price, total_amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(|e| db_error("Failed to prepare fact_orders insert", e))?;

    for o in fact {
        stmt.execute(params![
            o.order_id,
            o.customer_id,
            o.order_date.to_string(),
            o.item,
            o.quantity,
            o.price,
            o.total_amount,
        ])
        .map_err(|e| db_error(format!("Failed to insert order {}", o.order_id), e))?;
    }
    Ok(())
}

fn recreate(tx: &Transaction<'_>, table: &str, create_sql: &str) -> Result<(), AppError> {
    tx.execute_batch(&format!("DROP TABLE IF EXISTS {table}; {create_sql};"))
        .map_err(|e| db_error(format!("Failed to recreate table {table}"), e))
}

fn db_error(context: impl Into<String>, err: rusqlite::Error) -> AppError {
    AppError::new(EXIT_IO, format!("{}: {err}", context.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    fn fact(order_id: i64) -> FactOrder {
        FactOrder {
            order_id,
            customer_id: 10,
            order_date: date(1),
            item: "Pen".to_string(),
            quantity: 2.0,
            price: 1.5,
            total_amount: 3.0,
        }
    }

    fn customer() -> DimCustomer {
        DimCustomer {
            customer_id: 10,
            city: None,
            country: Some("UK".to_string()),
            first_order_date: date(1),
            last_order_date: date(2),
            order_count: 2,
            lifetime_value: 9.0,
        }
    }

    fn count(db: &Path, table: &str) -> i64 {
        let conn = Connection::open(db).unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn load_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("warehouse.db");

        load_to_sqlite(&[fact(1), fact(2)], &[customer()], &db).unwrap();
        assert_eq!(count(&db, "fact_orders"), 2);

        load_to_sqlite(&[fact(3)], &[], &db).unwrap();
        assert_eq!(count(&db, "fact_orders"), 1);
        assert_eq!(count(&db, "dim_customers"), 0);
    }

    #[test]
    fn dates_are_stored_as_iso_text() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("w.db");
        load_to_sqlite(&[fact(1)], &[customer()], &db).unwrap();

        let conn = Connection::open(&db).unwrap();
        let (first, city): (String, Option<String>) = conn
            .query_row(
                "SELECT first_order_date, city FROM dim_customers",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(first, "2025-09-01");
        assert_eq!(city, None);
    }
}
