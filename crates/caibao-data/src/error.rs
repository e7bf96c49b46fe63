//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while fetching, reading or cleaning statement tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Provider returned an unusable payload
    #[error("Provider error for {report} on {date}: {reason}")]
    Provider {
        /// Provider report name
        report: String,
        /// Report date that was requested
        date: String,
        /// What went wrong
        reason: String,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report date is not an 8-digit calendar date
    #[error("Invalid report date: {0} (expected YYYYMMDD)")]
    InvalidReportDate(String),

    /// Unknown statement kind name
    #[error("Unknown statement kind: {0}")]
    UnknownKind(String),

    /// A column required by an operation is missing
    #[error("Missing column {column} in {table}")]
    MissingColumn {
        /// Column that was looked up
        column: String,
        /// Table the column was expected in
        table: String,
    },
}
