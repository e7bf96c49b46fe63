//! Dividend indicators
//!
//! The cash dividend is quoted per 10 shares. Dividend growth compares each
//! period with the same company's previous report period.

use super::{StatementAnalysis, guarded};
use crate::columns::*;
use caibao_data::StatementKind;
use caibao_data::columns::{CASH_DIVIDEND_RATIO, CASH_DIVIDEND_YIELD, EPS, REPORT_DATE, STOCK_CODE};
use polars::prelude::*;

/// Numeric columns of the dividend analysis table.
pub const OUTPUT_COLUMNS: &[&str] = &[
    DIVIDEND_PER_SHARE,
    EPS,
    DIVIDEND_YIELD,
    PAYOUT_RATIO,
    DIVIDEND_COVER,
    DIVIDEND_GROWTH,
];

/// Dividend analysis.
#[derive(Debug, Clone, Copy, Default)]
pub struct DividendAnalysis;

impl StatementAnalysis for DividendAnalysis {
    fn kind(&self) -> StatementKind {
        StatementKind::Dividend
    }

    fn derive(&self, data: LazyFrame) -> LazyFrame {
        data.sort(
            [STOCK_CODE, REPORT_DATE],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .with_columns([
            (col(CASH_DIVIDEND_RATIO) / lit(10.0)).alias(DIVIDEND_PER_SHARE),
            col(CASH_DIVIDEND_YIELD).alias(DIVIDEND_YIELD),
        ])
        .with_columns([
            (col(DIVIDEND_PER_SHARE) / guarded(col(EPS))).alias(PAYOUT_RATIO),
            (col(EPS) / guarded(col(DIVIDEND_PER_SHARE))).alias(DIVIDEND_COVER),
            col(DIVIDEND_PER_SHARE)
                .shift(lit(1))
                .over([col(STOCK_CODE)])
                .alias("dividend_prev"),
        ])
        // The first period has no predecessor; the null quotient becomes 0.
        .with_columns([((col(DIVIDEND_PER_SHARE) - col("dividend_prev"))
            / guarded(col("dividend_prev")))
        .alias(DIVIDEND_GROWTH)])
    }

    fn output_columns(&self) -> &'static [&'static str] {
        OUTPUT_COLUMNS
    }
}

#[cfg(test)]
mod tests {
    use super::super::analyze;
    use super::super::test_support::{strings, values};
    use super::*;
    use approx::assert_relative_eq;
    use caibao_data::columns::STOCK_NAME;

    #[test]
    fn test_dividend_ratios() {
        let df = df!(
            STOCK_CODE => ["600519"],
            STOCK_NAME => ["贵州茅台"],
            REPORT_DATE => ["20231231"],
            CASH_DIVIDEND_RATIO => [250.0],
            CASH_DIVIDEND_YIELD => [0.035],
            EPS => [50.0],
        )
        .unwrap();

        let out = analyze(StatementKind::Dividend, df).unwrap();

        assert_relative_eq!(values(&out, DIVIDEND_PER_SHARE)[0], 25.0);
        assert_relative_eq!(values(&out, PAYOUT_RATIO)[0], 0.5);
        assert_relative_eq!(values(&out, DIVIDEND_COVER)[0], 2.0);
        assert_relative_eq!(values(&out, DIVIDEND_YIELD)[0], 0.035);
    }

    #[test]
    fn test_dividend_growth_per_company() {
        // Rows arrive out of order; growth follows report date within each code.
        let df = df!(
            STOCK_CODE => ["600519", "000858", "600519", "000858", "600519"],
            STOCK_NAME => ["贵州茅台", "五粮液", "贵州茅台", "五粮液", "贵州茅台"],
            REPORT_DATE => ["20221231", "20231231", "20211231", "20221231", "20231231"],
            CASH_DIVIDEND_RATIO => [200.0, 40.0, 100.0, 0.0, 100.0],
            CASH_DIVIDEND_YIELD => [0.0, 0.0, 0.0, 0.0, 0.0],
            EPS => [1.0, 1.0, 1.0, 1.0, 1.0],
        )
        .unwrap();

        let out = analyze(StatementKind::Dividend, df).unwrap();

        assert_eq!(
            strings(&out, STOCK_CODE),
            vec!["000858", "000858", "600519", "600519", "600519"]
        );
        let growth = values(&out, DIVIDEND_GROWTH);
        // 000858: first period, then growth from a zero dividend
        assert_eq!(growth[0], 0.0);
        assert_eq!(growth[1], 0.0);
        // 600519: first period, doubling, halving
        assert_eq!(growth[2], 0.0);
        assert_relative_eq!(growth[3], 1.0);
        assert_relative_eq!(growth[4], -0.5);
    }

    #[test]
    fn test_zero_eps_and_dividend() {
        let df = df!(
            STOCK_CODE => ["000001"],
            STOCK_NAME => ["平安银行"],
            REPORT_DATE => ["20231231"],
            CASH_DIVIDEND_RATIO => [0.0],
            EPS => [0.0],
        )
        .unwrap();

        let out = analyze(StatementKind::Dividend, df).unwrap();

        assert_eq!(values(&out, PAYOUT_RATIO), vec![0.0]);
        assert_eq!(values(&out, DIVIDEND_COVER), vec![0.0]);
        assert_eq!(values(&out, DIVIDEND_YIELD), vec![0.0]);
    }
}
