//! Indicator rankings over one report period.

use crate::chart::BarChart;
use crate::error::{OutputError, Result};
use caibao_data::StatementKind;
use caibao_data::columns::{REPORT_DATE, STOCK_CODE, STOCK_NAME};
use caibao_data::table::has_column;
use caibao_indicators::columns::*;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of companies shown per ranking.
pub const DEFAULT_TOP_N: usize = 10;

/// An indicator and the direction in which it ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndicatorView {
    /// Analysis column
    pub column: &'static str,
    /// Whether smaller values rank first
    pub ascending: bool,
}

impl IndicatorView {
    /// Rank largest values first.
    pub const fn highest(column: &'static str) -> Self {
        Self {
            column,
            ascending: false,
        }
    }

    /// Rank smallest values first.
    pub const fn lowest(column: &'static str) -> Self {
        Self {
            column,
            ascending: true,
        }
    }

    /// Chart title for the top `n` companies.
    pub fn title(&self, n: usize) -> String {
        let direction = if self.ascending { "最低" } else { "最高" };
        format!("{}{direction}的前{n}家公司", self.column)
    }
}

const INCOME_VIEWS: &[IndicatorView] = &[
    IndicatorView::highest(REVENUE),
    IndicatorView::highest(GROSS_MARGIN),
    IndicatorView::lowest(EXPENSE_RATIO),
    IndicatorView::highest(OPERATING_MARGIN),
    IndicatorView::lowest(EXPENSE_TO_GROSS_PROFIT),
];

const CASH_FLOW_VIEWS: &[IndicatorView] = &[
    IndicatorView::highest(OPERATING_CASH_NET),
    IndicatorView::highest(OWN_OPERATING_CASH_NET),
];

const BALANCE_VIEWS: &[IndicatorView] = &[
    IndicatorView::highest(ASSETS),
    IndicatorView::lowest(DEBT_RATIO),
    IndicatorView::highest(CURRENT_RATIO),
    IndicatorView::highest(QUICK_RATIO),
];

const DIVIDEND_VIEWS: &[IndicatorView] = &[
    IndicatorView::highest(DIVIDEND_YIELD),
    IndicatorView::highest(PAYOUT_RATIO),
    IndicatorView::highest(DIVIDEND_GROWTH),
];

/// The indicators charted by default for `kind`.
pub const fn default_views(kind: StatementKind) -> &'static [IndicatorView] {
    match kind {
        StatementKind::Income => INCOME_VIEWS,
        StatementKind::CashFlow => CASH_FLOW_VIEWS,
        StatementKind::Balance => BALANCE_VIEWS,
        StatementKind::Dividend => DIVIDEND_VIEWS,
    }
}

/// Look up the view for `column`, ranking largest first when it is not a default.
pub fn view_for(kind: StatementKind, column: &str) -> Option<IndicatorView> {
    default_views(kind)
        .iter()
        .find(|v| v.column == column)
        .copied()
        .or_else(|| {
            caibao_indicators::output_columns(kind)
                .iter()
                .find(|&&c| c == column)
                .map(|&c| IndicatorView::highest(c))
        })
}

/// One ranked company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Company code
    pub code: String,
    /// Company short name
    pub name: String,
    /// Indicator value
    pub value: f64,
}

/// Top companies for one indicator in one report period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    /// Indicator ranked
    pub view: IndicatorView,
    /// Report period ranked
    pub report_date: String,
    /// Entries, best first
    pub entries: Vec<RankedEntry>,
}

impl Ranking {
    /// Bar chart of the ranking, labelled by company name.
    pub fn to_chart(&self) -> BarChart {
        let mut chart = BarChart::new(
            format!("{} ({})", self.view.title(self.entries.len()), self.report_date),
            self.view.column,
        );
        for entry in &self.entries {
            chart.push(entry.name.clone(), entry.value);
        }
        chart
    }
}

/// Most recent report date in `table`.
pub fn latest_report_date(table: &DataFrame) -> Result<Option<String>> {
    let dates = table.column(REPORT_DATE)?.as_materialized_series().str()?;
    Ok(dates.into_iter().flatten().max().map(str::to_string))
}

/// Rank the top `top_n` companies of `table` on `view`.
///
/// Uses `report_date`, or the latest period of the table when `None`.
/// Returns `None` when the table has no rows for that period.
pub fn rank_indicator(
    table: &DataFrame,
    view: &IndicatorView,
    report_date: Option<&str>,
    top_n: usize,
) -> Result<Option<Ranking>> {
    for column in [STOCK_CODE, STOCK_NAME, REPORT_DATE, view.column] {
        if !has_column(table, column) {
            return Err(OutputError::MissingColumn(column.to_string()));
        }
    }

    let date = match report_date {
        Some(date) => date.to_string(),
        None => match latest_report_date(table)? {
            Some(date) => date,
            None => return Ok(None),
        },
    };

    let top = table
        .clone()
        .lazy()
        .filter(col(REPORT_DATE).eq(lit(date.clone())))
        .sort(
            [view.column],
            SortMultipleOptions::default()
                .with_order_descending(!view.ascending)
                .with_maintain_order(true),
        )
        .limit(top_n as IdxSize)
        .select([
            col(STOCK_CODE),
            col(STOCK_NAME),
            col(view.column).cast(DataType::Float64),
        ])
        .collect()?;

    if top.height() == 0 {
        debug!(column = view.column, report_date = %date, "no rows to rank");
        return Ok(None);
    }

    let codes = top.column(STOCK_CODE)?.as_materialized_series().str()?;
    let names = top.column(STOCK_NAME)?.as_materialized_series().str()?;
    let values = top.column(view.column)?.as_materialized_series().f64()?;

    let entries = codes
        .into_iter()
        .zip(names)
        .zip(values)
        .map(|((code, name), value)| RankedEntry {
            code: code.unwrap_or_default().to_string(),
            name: name.unwrap_or_default().to_string(),
            value: value.unwrap_or(0.0),
        })
        .collect();

    Ok(Some(Ranking {
        view: *view,
        report_date: date,
        entries,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn table() -> DataFrame {
        df!(
            STOCK_CODE => ["000001", "000002", "000003", "000001"],
            STOCK_NAME => ["甲", "乙", "丙", "甲"],
            REPORT_DATE => ["20231231", "20231231", "20231231", "20221231"],
            EXPENSE_RATIO => [0.3, 0.1, 0.2, 0.05],
        )
        .unwrap()
    }

    fn names(ranking: &Ranking) -> Vec<&str> {
        ranking.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_lowest_first_in_latest_period() {
        let ranking = rank_indicator(&table(), &IndicatorView::lowest(EXPENSE_RATIO), None, 2)
            .unwrap()
            .unwrap();

        assert_eq!(ranking.report_date, "20231231");
        assert_eq!(names(&ranking), vec!["乙", "丙"]);
    }

    #[test]
    fn test_highest_first_in_given_period() {
        let ranking = rank_indicator(
            &table(),
            &IndicatorView::highest(EXPENSE_RATIO),
            Some("20231231"),
            DEFAULT_TOP_N,
        )
        .unwrap()
        .unwrap();

        assert_eq!(names(&ranking), vec!["甲", "丙", "乙"]);
        assert_eq!(ranking.entries[0].value, 0.3);
    }

    #[test]
    fn test_period_without_rows() {
        let ranking = rank_indicator(
            &table(),
            &IndicatorView::highest(EXPENSE_RATIO),
            Some("20201231"),
            5,
        )
        .unwrap();
        assert!(ranking.is_none());
    }

    #[test]
    fn test_missing_indicator() {
        let err = rank_indicator(&table(), &IndicatorView::highest(REVENUE), None, 5).unwrap_err();
        assert!(matches!(err, OutputError::MissingColumn(_)));
    }

    #[test]
    fn test_chart_title() {
        let ranking = rank_indicator(&table(), &IndicatorView::lowest(EXPENSE_RATIO), None, 3)
            .unwrap()
            .unwrap();
        let chart = ranking.to_chart();

        assert_eq!(chart.title, "费用率最低的前3家公司 (20231231)");
        assert_eq!(chart.len(), 3);
    }

    #[rstest]
    #[case(StatementKind::Income, REVENUE, false)]
    #[case(StatementKind::Income, EXPENSE_RATIO, true)]
    #[case(StatementKind::Balance, EQUITY_RATIO, false)]
    fn test_view_for(#[case] kind: StatementKind, #[case] column: &str, #[case] ascending: bool) {
        let view = view_for(kind, column).unwrap();
        assert_eq!(view.column, column);
        assert_eq!(view.ascending, ascending);
    }

    #[test]
    fn test_view_for_unknown_column() {
        assert!(view_for(StatementKind::Income, "不存在").is_none());
    }

    #[test]
    fn test_income_default_views() {
        let views = default_views(StatementKind::Income);
        assert_eq!(views.len(), 5);
        assert!(views[2].ascending);
        assert_eq!(views[4].column, EXPENSE_TO_GROSS_PROFIT);
    }

    #[rstest]
    #[case(StatementKind::Income, 5)]
    #[case(StatementKind::CashFlow, 2)]
    #[case(StatementKind::Balance, 4)]
    #[case(StatementKind::Dividend, 3)]
    fn test_default_views_are_analysis_columns(#[case] kind: StatementKind, #[case] n: usize) {
        let views = default_views(kind);
        assert_eq!(views.len(), n);
        for view in views {
            assert!(caibao_indicators::output_columns(kind).contains(&view.column));
        }
    }
}
