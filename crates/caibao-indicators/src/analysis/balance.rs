//! Balance sheet indicators
//!
//! Solvency ratios measure short-term assets against short-term obligations,
//! here approximated by payables plus advance receipts.

use super::{StatementAnalysis, TEN_THOUSAND, guarded};
use crate::columns::*;
use caibao_data::StatementKind;
use caibao_data::columns::{
    ADVANCE_RECEIPTS, CASH, DEBT_TO_ASSET_PCT, INVENTORY, PAYABLES, RECEIVABLES, TOTAL_ASSETS,
    TOTAL_EQUITY, TOTAL_LIABILITIES,
};
use polars::prelude::*;

/// Numeric columns of the balance sheet analysis table.
pub const OUTPUT_COLUMNS: &[&str] = &[
    ASSETS,
    LIABILITIES,
    EQUITY,
    DEBT_RATIO,
    EQUITY_RATIO,
    CURRENT_RATIO,
    QUICK_RATIO,
    CASH_RATIO,
];

/// Balance sheet analysis.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceAnalysis;

fn short_term_liabilities() -> Expr {
    guarded(col(PAYABLES) + col(ADVANCE_RECEIPTS))
}

impl StatementAnalysis for BalanceAnalysis {
    fn kind(&self) -> StatementKind {
        StatementKind::Balance
    }

    fn derive(&self, data: LazyFrame) -> LazyFrame {
        data.with_columns([
            (col(TOTAL_ASSETS) / lit(TEN_THOUSAND)).alias(ASSETS),
            (col(TOTAL_LIABILITIES) / lit(TEN_THOUSAND)).alias(LIABILITIES),
            (col(TOTAL_EQUITY) / lit(TEN_THOUSAND)).alias(EQUITY),
            // Reported as a percentage
            (col(DEBT_TO_ASSET_PCT) / lit(100.0)).alias(DEBT_RATIO),
            ((col(CASH) + col(RECEIVABLES) + col(INVENTORY)) / short_term_liabilities())
                .alias(CURRENT_RATIO),
            ((col(CASH) + col(RECEIVABLES)) / short_term_liabilities()).alias(QUICK_RATIO),
            (col(CASH) / short_term_liabilities()).alias(CASH_RATIO),
        ])
        .with_columns([(col(LIABILITIES) / guarded(col(EQUITY))).alias(EQUITY_RATIO)])
    }

    fn output_columns(&self) -> &'static [&'static str] {
        OUTPUT_COLUMNS
    }
}
