//! Error types for output operations.

use thiserror::Error;

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;

/// Errors that can occur while rendering or exporting results.
#[derive(Debug, Error)]
pub enum OutputError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// A column required for rendering is missing.
    #[error("Missing column {0}")]
    MissingColumn(String),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}
