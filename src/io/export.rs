//! JSON snapshot of one run's output tables.
//!
//! Written next to the SQLite load when `etl run --export-json` is given, so a
//! run's result can be diffed or shipped without opening the warehouse.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{DimCustomer, FactOrder};
use crate::error::{AppError, EXIT_INPUT, EXIT_IO};

/// On-disk layout: one array per warehouse table, keyed by table name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablesFile {
    pub fact_orders: Vec<FactOrder>,
    pub dim_customers: Vec<DimCustomer>,
}

/// Write both tables as pretty-printed JSON, creating the parent directory.
pub fn write_tables_json(path: &Path, fact: &[FactOrder], dim: &[DimCustomer]) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::new(EXIT_IO, format!("Failed to create directory '{}': {e}", parent.display()))
        })?;
    }

    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to create JSON export '{}': {e}", path.display())))?;

    let tables = TablesFile {
        fact_orders: fact.to_vec(),
        dim_customers: dim.to_vec(),
    };
    serde_json::to_writer_pretty(file, &tables)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write JSON export: {e}")))?;

    Ok(())
}

/// Read a file written by [`write_tables_json`].
pub fn read_tables_json(path: &Path) -> Result<TablesFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open JSON export '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid JSON export: {e}")))
}
