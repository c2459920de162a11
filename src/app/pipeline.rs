//! The `run` pipeline: extract -> transform -> load.
//!
//! Kept apart from argument handling so the whole flow can be driven from
//! tests with a [`RunConfig`] and a temporary database.

use tracing::info;

use crate::domain::RunConfig;
use crate::error::AppError;
use crate::transform::{TransformOutput, transform_orders};

/// Execute one full run. Nothing is written if extraction or transform fails.
pub fn run_pipeline(config: &RunConfig) -> Result<TransformOutput, AppError> {
    info!(source = %config.source, "extracting");
    let raw = crate::io::extract_orders(&config.source, config.chunk_size, config.http_timeout)?;
    info!(rows = raw.len(), "extracted");

    info!(min_date = config.min_date.as_deref(), "transforming");
    let output = transform_orders(&raw, config.min_date.as_deref())?;
    info!(
        fact_orders = output.stats.fact_rows,
        dim_customers = output.stats.dim_rows,
        rejected = output.stats.rows_rejected(),
        "transformed"
    );

    info!(db = %config.db_path.display(), "loading");
    crate::io::load_to_sqlite(&output.fact, &output.dim, &config.db_path)?;

    if let Some(path) = &config.export_json {
        crate::io::write_tables_json(path, &output.fact, &output.dim)?;
        info!(path = %path.display(), "exported JSON");
    }
    info!("done");

    Ok(output)
}
