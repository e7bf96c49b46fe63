#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/caibao-rs/caibao/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod clean;
pub mod code;
pub mod columns;
pub mod error;
pub mod fetch;
pub mod kind;
pub mod layout;
pub mod provider;
pub mod report_date;
pub mod table;

pub use clean::{CleanSummary, Cleaner};
pub use code::{CODE_WIDTH, normalize_stock_code};
pub use error::{DataError, Result};
pub use fetch::{FetchConfig, FetchFailure, FetchReport, FetchStatus, Fetcher};
pub use kind::StatementKind;
pub use layout::{DEFAULT_DATA_DIR, DataLayout};
pub use provider::{EastmoneyProvider, EastmoneySettings, RawTable, StatementProvider};
pub use report_date::parse_report_date;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
