//! Company-scale composite ranking
//!
//! Joins the income, balance sheet and dividend analysis tables for one year's
//! cross-section and keeps the companies that sit in the top tier on total
//! assets, net assets and revenue at the same time.

use crate::columns::*;
use crate::error::{IndicatorError, Result};
use caibao_data::columns::{KEY_COLUMNS, REPORT_DATE, STOCK_CODE};
use caibao_data::parse_report_date;
use caibao_data::table::has_column;
use chrono::Datelike;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration for the company-scale screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Percentile each metric must reach (default: 0.7)
    pub quantile: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self { quantile: 0.7 }
    }
}

/// Competition rank of `expr`, largest value first.
///
/// Ties share the lowest rank; the next value is ranked after all of them.
pub fn rank_desc(expr: Expr) -> Expr {
    expr.rank(
        RankOptions {
            method: RankMethod::Min,
            descending: true,
        },
        None,
    )
    .cast(DataType::Float64)
}

/// Whether `column` reaches its `q` quantile (linear interpolation) over the frame.
pub fn at_or_above_quantile(column: &str, q: f64) -> Expr {
    col(column).gt_eq(col(column).quantile(lit(q), QuantileMethod::Linear))
}

fn key_exprs() -> Vec<Expr> {
    KEY_COLUMNS.iter().map(|&name| col(name)).collect()
}

/// Latest report date of `year` present in `df`.
fn latest_date_in_year(df: &DataFrame, year: i32) -> Result<Option<String>> {
    let dates = df.column(REPORT_DATE)?.as_materialized_series().str()?;

    let latest = dates
        .into_iter()
        .flatten()
        .filter(|date| {
            parse_report_date(date)
                .map(|d| d.year() == year)
                .unwrap_or(false)
        })
        .max()
        .map(str::to_string);

    Ok(latest)
}

fn require(df: &DataFrame, column: &str, table: &str) -> Result<()> {
    if has_column(df, column) {
        Ok(())
    } else {
        Err(IndicatorError::MissingColumn {
            column: column.to_string(),
            table: table.to_string(),
        })
    }
}

/// Rank the companies of `year` by scale.
///
/// `income` and `balance` are inner-joined on the key columns, `dividend` is
/// left-joined with absent values filled with 0. Returns `None` when the joined
/// table has no report date in `year`.
pub fn company_scale(
    income: &DataFrame,
    balance: &DataFrame,
    dividend: Option<&DataFrame>,
    year: i32,
    config: &ScaleConfig,
) -> Result<Option<DataFrame>> {
    require(income, REVENUE, "income analysis")?;
    require(balance, ASSETS, "balance analysis")?;
    require(balance, EQUITY, "balance analysis")?;

    let mut joined = income.clone().lazy().join(
        balance.clone().lazy(),
        key_exprs(),
        key_exprs(),
        JoinArgs::new(JoinType::Inner),
    );

    let dividend_columns: Vec<String> = match dividend {
        Some(df) => {
            joined = joined.join(
                df.clone().lazy(),
                key_exprs(),
                key_exprs(),
                JoinArgs::new(JoinType::Left),
            );
            df.get_column_names()
                .iter()
                .map(|n| n.to_string())
                .filter(|n| !KEY_COLUMNS.contains(&n.as_str()))
                .collect()
        }
        None => Vec::new(),
    };

    let joined = joined.collect()?;
    let Some(target) = latest_date_in_year(&joined, year)? else {
        warn!(year, "no report date in year, company-scale screen skipped");
        return Ok(None);
    };

    let fill: Vec<Expr> = dividend_columns
        .iter()
        .map(|name| col(name.as_str()).fill_null(lit(0.0)))
        .collect();

    let q = config.quantile;
    let mut section = joined
        .lazy()
        .filter(col(REPORT_DATE).eq(lit(target.clone())));
    if !fill.is_empty() {
        section = section.with_columns(fill);
    }

    // Ranks are taken over the whole cross-section, before the screen.
    let ranked = section
        .with_columns([
            rank_desc(col(ASSETS)).alias(ASSET_RANK),
            rank_desc(col(EQUITY)).alias(EQUITY_RANK),
            rank_desc(col(REVENUE)).alias(REVENUE_RANK),
        ])
        .with_columns([((col(ASSET_RANK) + col(EQUITY_RANK) + col(REVENUE_RANK)) / lit(3.0))
            .round(0)
            .cast(DataType::Int64)
            .alias(COMPOSITE_RANK)])
        .filter(
            at_or_above_quantile(ASSETS, q)
                .and(at_or_above_quantile(EQUITY, q))
                .and(at_or_above_quantile(REVENUE, q)),
        )
        .with_columns([
            col(ASSET_RANK).cast(DataType::Int64),
            col(EQUITY_RANK).cast(DataType::Int64),
            col(REVENUE_RANK).cast(DataType::Int64),
        ])
        .sort(
            [COMPOSITE_RANK, STOCK_CODE],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    info!(year, report_date = %target, companies = ranked.height(), "company-scale screen done");
    Ok(Some(ranked))
}
