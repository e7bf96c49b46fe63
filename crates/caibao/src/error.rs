//! Error types for the pipeline.

use crate::config::ConfigError;
use caibao_data::DataError;
use caibao_indicators::IndicatorError;
use caibao_output::OutputError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised by any pipeline stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fetching, reading or cleaning error
    #[error(transparent)]
    Data(#[from] DataError),

    /// Indicator or screen error
    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    /// Presentation or export error
    #[error(transparent)]
    Output(#[from] OutputError),
}
