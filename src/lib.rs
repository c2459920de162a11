//! `orders-etl` library crate.
//!
//! The binary (`etl`) is a thin wrapper around this library so that:
//!
//! - the transform rules are testable without spawning processes
//! - extraction and load can be driven directly from integration tests
//!
//! The core is [`transform::transform_orders`]; `io` holds the CSV/SQLite
//! collaborators around it.

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod transform;

pub use domain::{DimCustomer, FactOrder, RawTable, RawValue};
pub use error::{AppError, TransformError};
pub use transform::{TransformOutput, TransformStats, transform_orders};
