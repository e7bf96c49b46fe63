#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/caibao-rs/caibao/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod columns;
pub mod error;
pub mod scale;
pub mod screen;

pub use analysis::{
    AnalysisSummary, Analyzer, BalanceAnalysis, CashFlowAnalysis, DividendAnalysis,
    IncomeAnalysis, StatementAnalysis, analyze, output_columns,
};
pub use error::{IndicatorError, Result};
pub use scale::{ScaleConfig, company_scale};
pub use screen::{PassCount, ScreenConfig, SelectedStock, Selection, select_stocks};
