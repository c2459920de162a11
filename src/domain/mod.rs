//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the raw extract (`RawTable`, `RawValue`)
//! - canonical and validated order rows (`OrderRecord`, `ValidOrder`)
//! - the output tables (`FactOrder`, `DimCustomer`)
//! - resolved run options (`RunConfig`)

pub mod types;

pub use types::*;
