//! CSV extraction from a local path or an http(s) URL.
//!
//! Extraction does no typing at all: every cell becomes [`RawValue::Text`] or
//! [`RawValue::Null`]. Turning cells into dates and numbers is the transform
//! stage's job.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::time::Duration;

use csv::StringRecord;
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::domain::{RawTable, RawValue};
use crate::error::{AppError, EXIT_INPUT, EXIT_IO};

/// Default timeout for remote sources.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            Source::Url(source.to_string())
        } else {
            Source::Path(PathBuf::from(source))
        }
    }
}

/// Read the whole order extract from `source`.
///
/// With `chunk_size`, records are collected `chunk_size` rows at a time and
/// concatenated; the resulting table is the same as a single-pass read.
pub fn extract_orders(source: &str, chunk_size: Option<usize>, timeout: Duration) -> Result<RawTable, AppError> {
    let table = match Source::parse(source) {
        Source::Url(url) => {
            let body = fetch_url(&url, timeout)?;
            read_csv(Cursor::new(body), chunk_size)?
        }
        Source::Path(path) => {
            let file = File::open(&path).map_err(|e| {
                AppError::new(
                    EXIT_INPUT,
                    format!("Failed to open CSV '{}': {e}", path.display()),
                )
            })?;
            read_csv(file, chunk_size)?
        }
    };

    info!(source, rows = table.len(), columns = table.columns().len(), "extracted source");
    Ok(table)
}

fn fetch_url(url: &str, timeout: Duration) -> Result<Vec<u8>, AppError> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to build HTTP client: {e}")))?;

    let resp = client
        .get(url)
        .send()
        .map_err(|e| AppError::new(EXIT_IO, format!("Request to '{url}' failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::new(
            EXIT_IO,
            format!("Request to '{url}' failed with status {}.", resp.status()),
        ));
    }

    let body = resp
        .bytes()
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to read response body from '{url}': {e}")))?;
    debug!(url, bytes = body.len(), "fetched remote CSV");
    Ok(body.to_vec())
}

/// Parse CSV from any reader into a [`RawTable`].
pub fn read_csv<R: Read>(reader: R, chunk_size: Option<usize>) -> Result<RawTable, AppError> {
    if chunk_size == Some(0) {
        return Err(AppError::new(EXIT_INPUT, "Chunk size must be at least 1."));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read CSV headers: {e}")))?
        .clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::new(EXIT_INPUT, "CSV source has no header row."));
    }

    let columns: Vec<String> = headers.iter().map(normalize_header_name).collect();
    let width = columns.len();
    let mut table = RawTable::new(columns);

    let chunk_size = chunk_size.unwrap_or(usize::MAX);
    let mut chunk: Vec<Vec<RawValue>> = Vec::new();
    let mut n_chunks = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(EXIT_INPUT, format!("CSV parse error at line {line}: {e}")))?;

        // Short rows are padded with nulls later; long rows have nowhere to go.
        if record.len() > width {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("CSV parse error at line {line}: expected {width} fields, saw {}", record.len()),
            ));
        }

        chunk.push(to_row(&record));
        if chunk.len() >= chunk_size {
            n_chunks += 1;
            debug!(chunk = n_chunks, rows = chunk.len(), "read CSV chunk");
            table.append_rows(std::mem::take(&mut chunk));
        }
    }

    if !chunk.is_empty() {
        n_chunks += 1;
        debug!(chunk = n_chunks, rows = chunk.len(), "read CSV chunk");
        table.append_rows(chunk);
    }

    Ok(table)
}

fn to_row(record: &StringRecord) -> Vec<RawValue> {
    record.iter().map(RawValue::from_csv_field).collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM,
    // which would otherwise show up as a missing `order_id` column.
    // Case is kept: column names must match exactly.
    name.trim_start_matches('\u{feff}').trim().to_string()
}
