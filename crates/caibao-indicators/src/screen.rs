//! Multi-period stock screen
//!
//! A company passes a period when, within that period's cross-section, its
//! revenue and total assets both reach the configured percentile and its
//! dividend yield and payout ratio clear fixed floors. Companies passing enough
//! of the most recent periods are selected.

use crate::columns::*;
use crate::error::{IndicatorError, Result};
use caibao_data::columns::{KEY_COLUMNS, REPORT_DATE, STOCK_CODE, STOCK_NAME};
use caibao_data::parse_report_date;
use caibao_data::table::has_column;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const PASSED: &str = "passed";

/// Thresholds of the multi-period screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Number of most recent report periods considered (default: 5)
    pub periods: usize,
    /// Passing periods required for selection (default: 4)
    pub min_passing: u32,
    /// Percentile revenue must reach within a period (default: 0.7)
    pub revenue_quantile: f64,
    /// Percentile total assets must reach within a period (default: 0.7)
    pub assets_quantile: f64,
    /// Minimum dividend yield (default: 0.03)
    pub min_dividend_yield: f64,
    /// Minimum payout ratio (default: 0.3)
    pub min_payout_ratio: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            periods: 5,
            min_passing: 4,
            revenue_quantile: 0.7,
            assets_quantile: 0.7,
            min_dividend_yield: 0.03,
            min_payout_ratio: 0.3,
        }
    }
}

/// Number of screened periods a company passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassCount {
    /// Company code
    pub code: String,
    /// Passing periods
    pub passes: u32,
}

/// A company selected by the screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedStock {
    /// Company code
    pub code: String,
    /// Company short name
    pub name: String,
    /// Passing periods
    pub passes: u32,
}

/// Result of a screen run.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Report periods screened, oldest first.
    pub periods: Vec<String>,
    /// Pass counts of every screened company, by code.
    pub counts: Vec<PassCount>,
    /// Distinct (code, name) pairs of selected companies, sorted by code.
    pub selected: DataFrame,
}

impl Selection {
    /// Selected companies with their pass counts.
    pub fn stocks(&self) -> Result<Vec<SelectedStock>> {
        let codes = self.selected.column(STOCK_CODE)?.as_materialized_series().str()?;
        let names = self.selected.column(STOCK_NAME)?.as_materialized_series().str()?;

        let stocks = codes
            .into_iter()
            .zip(names)
            .map(|(code, name)| {
                let code = code.unwrap_or_default().to_string();
                let passes = self
                    .counts
                    .iter()
                    .find(|c| c.code == code)
                    .map_or(0, |c| c.passes);
                SelectedStock {
                    code,
                    name: name.unwrap_or_default().to_string(),
                    passes,
                }
            })
            .collect();

        Ok(stocks)
    }
}

fn key_exprs() -> Vec<Expr> {
    KEY_COLUMNS.iter().map(|&name| col(name)).collect()
}

fn require(df: &DataFrame, columns: &[&str], table: &str) -> Result<()> {
    for &column in columns {
        if !has_column(df, column) {
            return Err(IndicatorError::MissingColumn {
                column: column.to_string(),
                table: table.to_string(),
            });
        }
    }
    Ok(())
}

/// The `n` most recent distinct report dates in `df`, oldest first.
fn recent_periods(df: &DataFrame, n: usize) -> Result<Vec<String>> {
    let dates = df.column(REPORT_DATE)?.as_materialized_series().str()?;

    let mut seen: Vec<&str> = Vec::new();
    let mut parsed: Vec<(NaiveDate, String)> = Vec::new();
    for date in dates.into_iter().flatten() {
        if seen.contains(&date) {
            continue;
        }
        seen.push(date);
        match parse_report_date(date) {
            Ok(day) => parsed.push((day, date.to_string())),
            Err(e) => warn!(report_date = date, error = %e, "unparsable report date ignored"),
        }
    }

    parsed.sort();
    let skip = parsed.len().saturating_sub(n);
    Ok(parsed.into_iter().skip(skip).map(|(_, d)| d).collect())
}

fn empty_selection() -> Result<DataFrame> {
    Ok(df!(
        STOCK_CODE => Vec::<String>::new(),
        STOCK_NAME => Vec::<String>::new(),
    )?)
}

/// Run the screen over the income, balance sheet and dividend analysis tables.
pub fn select_stocks(
    income: &DataFrame,
    balance: &DataFrame,
    dividend: &DataFrame,
    config: &ScreenConfig,
) -> Result<Selection> {
    require(income, &[REVENUE], "income analysis")?;
    require(balance, &[ASSETS], "balance analysis")?;
    require(dividend, &[DIVIDEND_YIELD, PAYOUT_RATIO], "dividend analysis")?;

    let joined = income
        .clone()
        .lazy()
        .join(
            balance.clone().lazy(),
            key_exprs(),
            key_exprs(),
            JoinArgs::new(JoinType::Inner),
        )
        .join(
            dividend.clone().lazy(),
            key_exprs(),
            key_exprs(),
            JoinArgs::new(JoinType::Inner),
        )
        .collect()?;

    let periods = recent_periods(&joined, config.periods)?;
    if periods.is_empty() {
        warn!("no report periods in joined tables, nothing selected");
        return Ok(Selection {
            periods,
            counts: Vec::new(),
            selected: empty_selection()?,
        });
    }
    debug!(periods = ?periods, "screening periods");

    let period_frame = df!(REPORT_DATE => periods.clone())?;
    let recent = joined.lazy().join(
        period_frame.lazy(),
        [col(REPORT_DATE)],
        [col(REPORT_DATE)],
        JoinArgs::new(JoinType::Inner),
    );

    let screened = recent.with_columns([col(REVENUE)
        .gt_eq(
            col(REVENUE)
                .quantile(lit(config.revenue_quantile), QuantileMethod::Linear)
                .over([col(REPORT_DATE)]),
        )
        .and(
            col(ASSETS).gt_eq(
                col(ASSETS)
                    .quantile(lit(config.assets_quantile), QuantileMethod::Linear)
                    .over([col(REPORT_DATE)]),
            ),
        )
        .and(col(DIVIDEND_YIELD).gt_eq(lit(config.min_dividend_yield)))
        .and(col(PAYOUT_RATIO).gt_eq(lit(config.min_payout_ratio)))
        .alias(PASSED)]);

    let counts_df = screened
        .clone()
        .group_by([col(STOCK_CODE)])
        .agg([col(PASSED).cast(DataType::Int64).sum().alias(PASS_COUNT)])
        .sort([STOCK_CODE], SortMultipleOptions::default())
        .collect()?;

    let selected = screened
        .select([col(STOCK_CODE), col(STOCK_NAME)])
        .unique_stable(None, UniqueKeepStrategy::First)
        .join(
            counts_df
                .clone()
                .lazy()
                .filter(col(PASS_COUNT).gt_eq(lit(i64::from(config.min_passing)))),
            [col(STOCK_CODE)],
            [col(STOCK_CODE)],
            JoinArgs::new(JoinType::Inner),
        )
        .select([col(STOCK_CODE), col(STOCK_NAME)])
        .sort(
            [STOCK_CODE, STOCK_NAME],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    let codes = counts_df.column(STOCK_CODE)?.as_materialized_series().str()?;
    let passes = counts_df.column(PASS_COUNT)?.as_materialized_series().i64()?;
    let counts = codes
        .into_iter()
        .zip(passes)
        .map(|(code, passes)| PassCount {
            code: code.unwrap_or_default().to_string(),
            passes: u32::try_from(passes.unwrap_or(0)).unwrap_or(0),
        })
        .collect();

    info!(periods = periods.len(), selected = selected.height(), "stock screen done");
    Ok(Selection {
        periods,
        counts,
        selected,
    })
}
