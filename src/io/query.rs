//! Ad hoc read access to the warehouse.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use crate::error::{AppError, EXIT_INPUT, EXIT_IO};

/// A single SQLite value, owned.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for QueryValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => QueryValue::Null,
            ValueRef::Integer(v) => QueryValue::Integer(v),
            ValueRef::Real(v) => QueryValue::Real(v),
            ValueRef::Text(t) => QueryValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => QueryValue::Blob(b.to_vec()),
        }
    }
}

/// Column names plus every row returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<QueryValue>>,
}

/// Run one SQL statement against an existing warehouse file.
///
/// The database is opened read-only, so a typo'd path does not create an empty
/// database and the query cannot modify the loaded tables.
pub fn run_query(db_path: &Path, sql: &str) -> Result<QueryResult, AppError> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(|e| {
        AppError::new(
            EXIT_IO,
            format!("Failed to open database '{}': {e}", db_path.display()),
        )
    })?;

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid query: {e}")))?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt
        .query([])
        .map_err(|e| AppError::new(EXIT_IO, format!("Query failed: {e}")))?;
    while let Some(row) = cursor
        .next()
        .map_err(|e| AppError::new(EXIT_IO, format!("Query failed: {e}")))?
    {
        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            let value = row
                .get_ref(i)
                .map_err(|e| AppError::new(EXIT_IO, format!("Failed to read column {i}: {e}")))?;
            values.push(QueryValue::from(value));
        }
        rows.push(values);
    }

    Ok(QueryResult { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_db(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("q.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER, name TEXT, score REAL);
             INSERT INTO t VALUES (1, 'a', 1.5), (2, NULL, 2.0);",
        )
        .unwrap();
        path
    }

    #[test]
    fn returns_columns_and_typed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(dir.path());

        let result = run_query(&db, "SELECT id, name, score FROM t ORDER BY id").unwrap();
        assert_eq!(result.columns, vec!["id", "name", "score"]);
        assert_eq!(
            result.rows[1],
            vec![QueryValue::Integer(2), QueryValue::Null, QueryValue::Real(2.0)]
        );
    }

    #[test]
    fn missing_database_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("absent.db");
        assert!(run_query(&db, "SELECT 1").is_err());
        assert!(!db.exists());
    }

    #[test]
    fn writes_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(dir.path());
        assert!(run_query(&db, "DELETE FROM t").is_err());
    }
}
