#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/caibao-rs/caibao/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export member crates
pub use caibao_data as data;
pub use caibao_indicators as indicators;
pub use caibao_output as output;

pub use config::{CONFIG_FILE_NAME, ConfigError, PipelineConfig, default_report_dates};
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, RunSummary};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
