//! Cash flow statement indicators.

use super::{StatementAnalysis, TEN_THOUSAND};
use crate::columns::*;
use caibao_data::StatementKind;
use caibao_data::columns::{FINANCING_CASH_FLOW, INVESTING_CASH_FLOW, OPERATING_CASH_FLOW};
use polars::prelude::*;

/// Numeric columns of the cash flow analysis table.
pub const OUTPUT_COLUMNS: &[&str] = &[
    OPERATING_CASH_NET,
    INVESTING_CASH_NET,
    FINANCING_CASH_NET,
    OWN_OPERATING_CASH_NET,
];

/// Cash flow analysis: net flows by activity, in units of 10,000.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashFlowAnalysis;

impl StatementAnalysis for CashFlowAnalysis {
    fn kind(&self) -> StatementKind {
        StatementKind::CashFlow
    }

    fn derive(&self, data: LazyFrame) -> LazyFrame {
        data.with_columns([
            (col(OPERATING_CASH_FLOW) / lit(TEN_THOUSAND)).alias(OPERATING_CASH_NET),
            (col(INVESTING_CASH_FLOW) / lit(TEN_THOUSAND)).alias(INVESTING_CASH_NET),
            (col(FINANCING_CASH_FLOW) / lit(TEN_THOUSAND)).alias(FINANCING_CASH_NET),
            ((col(OPERATING_CASH_FLOW) + col(INVESTING_CASH_FLOW) + col(FINANCING_CASH_FLOW))
                / lit(TEN_THOUSAND))
            .alias(OWN_OPERATING_CASH_NET),
        ])
    }

    fn output_columns(&self) -> &'static [&'static str] {
        OUTPUT_COLUMNS
    }
}

#[cfg(test)]
mod tests {
    use super::super::analyze;
    use super::super::test_support::values;
    use super::*;
    use approx::assert_relative_eq;
    use caibao_data::columns::{REPORT_DATE, STOCK_CODE, STOCK_NAME};

    #[test]
    fn test_cash_flow_in_ten_thousands() {
        let df = df!(
            STOCK_CODE => ["000858"],
            STOCK_NAME => ["五粮液"],
            REPORT_DATE => ["20231231"],
            OPERATING_CASH_FLOW => [3_000_000.0],
            INVESTING_CASH_FLOW => [-1_000_000.0],
            FINANCING_CASH_FLOW => [-500_000.0],
        )
        .unwrap();

        let out = analyze(StatementKind::CashFlow, df).unwrap();

        assert_relative_eq!(values(&out, OPERATING_CASH_NET)[0], 300.0);
        assert_relative_eq!(values(&out, INVESTING_CASH_NET)[0], -100.0);
        assert_relative_eq!(values(&out, FINANCING_CASH_NET)[0], -50.0);
        assert_relative_eq!(values(&out, OWN_OPERATING_CASH_NET)[0], 150.0);
    }
}
