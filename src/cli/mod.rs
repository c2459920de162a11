//! Command-line parsing for the orders ETL.
//!
//! Argument parsing and command dispatch live apart from the pipeline code;
//! `app` turns these structs into a [`crate::domain::RunConfig`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::Level;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "etl", version, about = "ETL pipeline: orders CSV -> SQLite warehouse")]
pub struct Cli {
    /// Log level (overridden by `RUST_LOG`).
    #[arg(long, global = true, default_value_t = Level::INFO)]
    pub log_level: Level,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline: extract -> transform -> load.
    Run(RunArgs),
    /// Show the first rows of the source CSV (debug helper).
    Preview(PreviewArgs),
    /// Run a quick SQL query against the warehouse.
    Query(QueryArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// CSV path or http(s) URL.
    #[arg(long)]
    pub source: String,

    /// SQLite database path.
    #[arg(long, env = "ETL_DB_PATH", default_value = "data/warehouse.db")]
    pub db: PathBuf,

    /// Read the CSV in chunks of this many rows.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub chunksize: Option<u64>,

    /// Keep only orders on/after this date (YYYY-MM-DD).
    #[arg(long)]
    pub min_date: Option<String>,

    /// Timeout in seconds for URL sources.
    #[arg(long, env = "ETL_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout: u64,

    /// Also write both output tables to this JSON file.
    #[arg(long)]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// CSV path or http(s) URL.
    pub source: String,

    /// Number of rows to show.
    #[arg(long, default_value_t = 5)]
    pub rows: usize,

    /// Timeout in seconds for URL sources.
    #[arg(long, env = "ETL_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout: u64,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// SQLite database path.
    pub db: PathBuf,

    /// SQL statement to run.
    pub sql: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["etl", "run", "--source", "orders.csv"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.chunksize, None);
        assert_eq!(args.min_date, None);
        assert_eq!(args.export_json, None);
        assert_eq!(cli.log_level, Level::INFO);
    }

    #[test]
    fn zero_chunksize_is_rejected() {
        let res = Cli::try_parse_from(["etl", "run", "--source", "o.csv", "--chunksize", "0"]);
        assert!(res.is_err());
    }

    #[test]
    fn preview_accepts_http_timeout() {
        let cli = Cli::try_parse_from(["etl", "preview", "https://example.com/o.csv", "--http-timeout", "7"]).unwrap();
        let Command::Preview(args) = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(args.http_timeout, 7);
        assert_eq!(args.rows, 5);
    }

    #[test]
    fn query_takes_positional_db_and_sql() {
        let cli = Cli::try_parse_from(["etl", "--log-level", "debug", "query", "w.db", "SELECT 1"]).unwrap();
        let Command::Query(args) = cli.command else {
            panic!("expected query");
        };
        assert_eq!(args.db, PathBuf::from("w.db"));
        assert_eq!(args.sql, "SELECT 1");
        assert_eq!(cli.log_level, Level::DEBUG);
    }
}
