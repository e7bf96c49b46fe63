#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/caibao-rs/caibao/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod error;
pub mod export;
pub mod ranking;
pub mod series;

pub use chart::{Bar, BarChart, DEFAULT_BAR_WIDTH};
pub use error::{OutputError, Result};
pub use export::{ExportFormat, Exporter, TopCompany};
pub use ranking::{
    DEFAULT_TOP_N, IndicatorView, RankedEntry, Ranking, default_views, rank_indicator, view_for,
};
pub use series::{CompanyFilter, CompanySeries, SeriesPoint, company_series, render_series};
