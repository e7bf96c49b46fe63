//! Income statement indicators
//!
//! Margins and expense ratios are taken against total revenue. The financial
//! expense only counts toward total expenses when positive, since net interest
//! income is reported as a negative expense.

use super::{StatementAnalysis, guarded};
use crate::columns::*;
use caibao_data::StatementKind;
use caibao_data::columns::{
    ADMIN_EXPENSE, COST_OF_REVENUE, FINANCIAL_EXPENSE, NET_PROFIT, SELLING_EXPENSE, TOTAL_PROFIT,
    TOTAL_REVENUE,
};
use polars::prelude::*;

/// Numeric columns of the income analysis table.
pub const OUTPUT_COLUMNS: &[&str] = &[
    REVENUE,
    COST_OF_REVENUE,
    NET_PROFIT,
    TOTAL_PROFIT,
    GROSS_MARGIN,
    EXPENSE_TOTAL,
    EXPENSE_RATIO,
    OPERATING_MARGIN,
    EXPENSE_TO_GROSS_PROFIT,
];

/// Income statement analysis.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncomeAnalysis;

impl StatementAnalysis for IncomeAnalysis {
    fn kind(&self) -> StatementKind {
        StatementKind::Income
    }

    fn derive(&self, data: LazyFrame) -> LazyFrame {
        data.with_columns([
            col(TOTAL_REVENUE).alias(REVENUE),
            ((col(TOTAL_REVENUE) - col(COST_OF_REVENUE)) / guarded(col(TOTAL_REVENUE)))
                .alias(GROSS_MARGIN),
            when(col(FINANCIAL_EXPENSE).gt(lit(0.0)))
                .then(col(FINANCIAL_EXPENSE))
                .otherwise(lit(0.0))
                .alias(FINANCIAL_EXPENSE_ADJ),
        ])
        .with_columns([
            (col(SELLING_EXPENSE) + col(ADMIN_EXPENSE) + col(FINANCIAL_EXPENSE_ADJ))
                .alias(EXPENSE_TOTAL),
        ])
        .with_columns([
            (col(EXPENSE_TOTAL) / guarded(col(TOTAL_REVENUE))).alias(EXPENSE_RATIO),
            (col(TOTAL_PROFIT) / guarded(col(TOTAL_REVENUE))).alias(OPERATING_MARGIN),
            // Gross profit is not guarded; a zero here is reset to 0 afterwards.
            (col(EXPENSE_TOTAL) / (col(TOTAL_REVENUE) - col(COST_OF_REVENUE)))
                .alias(EXPENSE_TO_GROSS_PROFIT),
        ])
    }

    fn output_columns(&self) -> &'static [&'static str] {
        OUTPUT_COLUMNS
    }
}
