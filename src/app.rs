//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging once for the process
//! - dispatches `run`, `preview` and `query`

use std::time::Duration;

use clap::Parser;

use crate::cli::{Command, PreviewArgs, QueryArgs, RunArgs};
use crate::domain::RunConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `etl` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` only fills in variables that are not already set.
    dotenvy::dotenv().ok();

    let cli = crate::cli::Cli::parse();
    crate::logging::init(cli.log_level, cli.log_json);

    match cli.command {
        Command::Run(args) => handle_run(&args),
        Command::Preview(args) => handle_preview(&args),
        Command::Query(args) => handle_query(&args),
    }
}

fn handle_run(args: &RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(args);
    let output = pipeline::run_pipeline(&config)?;
    println!("{}", crate::report::format_run_summary(&output.stats));
    Ok(())
}

fn handle_preview(args: &PreviewArgs) -> Result<(), AppError> {
    let timeout = Duration::from_secs(args.http_timeout);
    let table = crate::io::extract_orders(&args.source, None, timeout)?;
    println!("{}", crate::report::format_preview(&table.head(args.rows)));
    Ok(())
}

fn handle_query(args: &QueryArgs) -> Result<(), AppError> {
    let result = crate::io::run_query(&args.db, &args.sql)?;
    print!("{}", crate::report::format_query_rows(&result));
    Ok(())
}

pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    RunConfig {
        source: args.source.clone(),
        db_path: args.db.clone(),
        // Clap already rejects 0.
        chunk_size: args.chunksize.map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
        min_date: args.min_date.clone(),
        http_timeout: Duration::from_secs(args.http_timeout),
        export_json: args.export_json.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn run_config_copies_arguments() {
        let args = RunArgs {
            source: "https://example.com/orders.csv".to_string(),
            db: PathBuf::from("out.db"),
            chunksize: Some(500),
            min_date: Some("2025-09-01".to_string()),
            http_timeout: 5,
            export_json: Some(PathBuf::from("run.json")),
        };
        let config = run_config_from_args(&args);
        assert_eq!(config.chunk_size, Some(500));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.db_path, PathBuf::from("out.db"));
        assert_eq!(config.min_date.as_deref(), Some("2025-09-01"));
        assert_eq!(config.export_json, Some(PathBuf::from("run.json")));
    }
}
