//! Transform stage: raw order extract -> `fact_orders` + `dim_customers`.
//!
//! Steps, in order:
//! 1. required-column check (`schema`)
//! 2. per-column type coercion (`coerce`)
//! 3. optional inclusive date cutoff (`filter`)
//! 4. validity rules + `total_amount` (`filter`)
//! 5. fact table (`fact`) and customer rollup (`dimension`) from the same rows
//!
//! Any failure in steps 1-3 aborts the call; no partial tables are returned.

use tracing::debug;

use crate::domain::{DimCustomer, FactOrder, RawTable};
use crate::error::TransformError;

pub mod coerce;
pub mod dimension;
pub mod fact;
pub mod filter;
pub mod schema;

pub use dimension::build_dim_customers;
pub use fact::build_fact_orders;
pub use schema::REQUIRED_COLUMNS;

/// Row counts at each stage of a transform call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformStats {
    pub rows_in: usize,
    pub rows_after_cutoff: usize,
    pub rows_valid: usize,
    pub fact_rows: usize,
    pub dim_rows: usize,
}

impl TransformStats {
    /// Rows removed by the validity rules (not counting the date cutoff).
    pub fn rows_rejected(&self) -> usize {
        self.rows_after_cutoff - self.rows_valid
    }
}

/// Both output tables of one transform call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub fact: Vec<FactOrder>,
    pub dim: Vec<DimCustomer>,
    pub stats: TransformStats,
}

/// Turn a raw extract into the fact and dimension tables.
///
/// `min_date`, when given, keeps only orders dated on or after it. A blank
/// `min_date` is the same as none.
pub fn transform_orders(raw: &RawTable, min_date: Option<&str>) -> Result<TransformOutput, TransformError> {
    let cols = schema::resolve_columns(raw)?;
    let cutoff = min_date
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(filter::parse_min_date)
        .transpose()?;

    let records = coerce::coerce_rows(raw, &cols)?;
    let rows_in = records.len();

    let records = match cutoff {
        Some(cutoff) => {
            let kept = filter::apply_cutoff(records, cutoff);
            debug!(%cutoff, kept = kept.len(), dropped = rows_in - kept.len(), "applied date cutoff");
            kept
        }
        None => records,
    };
    let rows_after_cutoff = records.len();

    let valid = filter::validate_rows(records);
    debug!(
        valid = valid.len(),
        rejected = rows_after_cutoff - valid.len(),
        "applied validity rules"
    );

    let fact = build_fact_orders(&valid);
    let dim = build_dim_customers(&valid);

    let stats = TransformStats {
        rows_in,
        rows_after_cutoff,
        rows_valid: valid.len(),
        fact_rows: fact.len(),
        dim_rows: dim.len(),
    };

    Ok(TransformOutput { fact, dim, stats })
}
