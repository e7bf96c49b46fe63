//! Error types for indicator computation.

use caibao_data::{DataError, StatementKind};
use thiserror::Error;

/// Result type for indicator operations.
pub type Result<T> = std::result::Result<T, IndicatorError>;

/// Errors that can occur while deriving indicators or running screens.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// Data layer error
    #[error(transparent)]
    Data(#[from] DataError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// An input table has not been produced yet
    #[error("Missing {stage} table for {kind}")]
    MissingTable {
        /// Statement kind
        kind: StatementKind,
        /// Pipeline stage the table belongs to
        stage: &'static str,
    },

    /// A column required by an operation is missing
    #[error("Missing column {column} in {table}")]
    MissingColumn {
        /// Column that was looked up
        column: String,
        /// Table the column was expected in
        table: String,
    },
}
