//! Input/output collaborators around the transform stage.
//!
//! - CSV extraction from a file or URL (`extract`)
//! - replace-on-write load into SQLite (`load`)
//! - JSON snapshot of the output tables (`export`)
//! - read-only ad hoc queries (`query`)

pub mod export;
pub mod extract;
pub mod load;
pub mod query;

pub use export::*;
pub use extract::*;
pub use load::*;
pub use query::*;
