//! Error types.
//!
//! - [`TransformError`]: typed failures of the transform stage
//! - [`AppError`]: what the binary reports, carrying the process exit code
//!
//! Exit codes:
//! - `2`: bad input or configuration (schema, coercion, min-date, unreadable CSV)
//! - `4`: remote fetch or database failures

use thiserror::Error;

/// Exit code for input/configuration problems.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for network and database problems.
pub const EXIT_IO: u8 = 4;

/// Fatal conditions raised while turning a raw table into fact/dimension tables.
///
/// Row-level business-rule rejections are not errors; they are counted in
/// [`crate::transform::TransformStats`] instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// One or more required columns are absent from the input header.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A cell could not be parsed into its column's canonical type.
    #[error("Invalid value in column `{column}` at row {row}: '{value}' is not a valid {expected}")]
    Coercion {
        column: &'static str,
        /// 1-based data row (the header is not counted).
        row: usize,
        value: String,
        expected: &'static str,
    },

    /// The optional minimum-date filter is not a date.
    #[error("Invalid min date '{0}'. Expected YYYY-MM-DD (or another common date format).")]
    InvalidMinDate(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<TransformError> for AppError {
    fn from(err: TransformError) -> Self {
        AppError::new(EXIT_INPUT, format!("Transform failed: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
