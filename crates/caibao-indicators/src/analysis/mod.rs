//! Per-statement indicator derivation.
//!
//! Each statement kind has one [`StatementAnalysis`] that adds its derived
//! columns to the clean table. [`analyze`] dispatches on the kind, applies the
//! fixed output projection and resets every non-finite numeric value to 0.

pub mod balance;
pub mod cash_flow;
pub mod dividend;
pub mod income;

pub use balance::BalanceAnalysis;
pub use cash_flow::CashFlowAnalysis;
pub use dividend::DividendAnalysis;
pub use income::IncomeAnalysis;

use crate::error::{IndicatorError, Result};
use caibao_data::columns::{KEY_COLUMNS, REPORT_DATE, STOCK_CODE};
use caibao_data::table::{coerce_numeric, has_column, read_table, write_table, zero_non_finite};
use caibao_data::{DataLayout, StatementKind};
use polars::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

/// Amounts reported in yuan are presented in units of 10,000.
pub const TEN_THOUSAND: f64 = 10_000.0;

/// Indicator derivation for one statement kind.
pub trait StatementAnalysis {
    /// Statement kind this analysis reads.
    fn kind(&self) -> StatementKind;

    /// Add the derived columns to a clean table.
    fn derive(&self, data: LazyFrame) -> LazyFrame;

    /// Numeric columns of the analysis table, after the key columns.
    fn output_columns(&self) -> &'static [&'static str];
}

/// Replace a zero divisor with NaN so the quotient is undefined, not infinite.
pub fn guarded(divisor: Expr) -> Expr {
    when(divisor.clone().eq(lit(0.0)))
        .then(lit(f64::NAN))
        .otherwise(divisor)
}

/// Run `analysis` over a clean table.
pub fn run_analysis<A: StatementAnalysis>(analysis: &A, clean: DataFrame) -> Result<DataFrame> {
    for key in KEY_COLUMNS {
        if !has_column(&clean, key) {
            return Err(IndicatorError::MissingColumn {
                column: key.to_string(),
                table: analysis.kind().clean_file_name(),
            });
        }
    }

    let clean = coerce_numeric(clean, analysis.kind().numeric_columns())?;
    let outputs = analysis.output_columns();
    let projection: Vec<Expr> = KEY_COLUMNS
        .iter()
        .chain(outputs)
        .map(|&name| col(name))
        .collect();

    let df = analysis
        .derive(clean.lazy())
        .select(projection)
        .sort(
            [STOCK_CODE, REPORT_DATE],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    Ok(zero_non_finite(df, outputs)?)
}

/// Derive the analysis table of `kind` from its clean table.
pub fn analyze(kind: StatementKind, clean: DataFrame) -> Result<DataFrame> {
    match kind {
        StatementKind::Income => run_analysis(&IncomeAnalysis, clean),
        StatementKind::CashFlow => run_analysis(&CashFlowAnalysis, clean),
        StatementKind::Balance => run_analysis(&BalanceAnalysis, clean),
        StatementKind::Dividend => run_analysis(&DividendAnalysis, clean),
    }
}

/// Numeric columns of the analysis table of `kind`.
pub const fn output_columns(kind: StatementKind) -> &'static [&'static str] {
    match kind {
        StatementKind::Income => income::OUTPUT_COLUMNS,
        StatementKind::CashFlow => cash_flow::OUTPUT_COLUMNS,
        StatementKind::Balance => balance::OUTPUT_COLUMNS,
        StatementKind::Dividend => dividend::OUTPUT_COLUMNS,
    }
}

/// Outcome of analyzing one statement kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSummary {
    /// Statement kind
    pub kind: StatementKind,
    /// Analysis table path
    pub path: PathBuf,
    /// Rows in the analysis table
    pub rows: usize,
}

/// Reads clean tables and persists analysis tables.
#[derive(Debug, Clone)]
pub struct Analyzer {
    layout: DataLayout,
}

impl Analyzer {
    /// Create an analyzer over `layout`.
    pub const fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    /// Analyze `kind` and write its analysis table.
    ///
    /// Returns `None` when the clean table has not been produced.
    pub fn analyze(&self, kind: StatementKind) -> Result<Option<AnalysisSummary>> {
        let clean_path = self.layout.clean_path(kind);
        if !clean_path.exists() {
            warn!(kind = %kind, path = %clean_path.display(), "clean table missing, skipping analysis");
            return Ok(None);
        }

        let clean = read_table(&clean_path, kind.numeric_columns())?;
        let mut df = analyze(kind, clean)?;
        let path = self.layout.analysis_path(kind);
        write_table(&mut df, &path)?;
        info!(kind = %kind, rows = df.height(), path = %path.display(), "analysis table written");

        Ok(Some(AnalysisSummary {
            kind,
            path,
            rows: df.height(),
        }))
    }

    /// Load the analysis table of `kind` with its numeric columns typed.
    pub fn load(&self, kind: StatementKind) -> Result<DataFrame> {
        let path = self.layout.analysis_path(kind);
        if !path.exists() {
            return Err(IndicatorError::MissingTable {
                kind,
                stage: "analysis",
            });
        }
        Ok(read_table(&path, output_columns(kind))?)
    }

    /// Load the analysis table of `kind` if it exists.
    pub fn load_optional(&self, kind: StatementKind) -> Result<Option<DataFrame>> {
        match self.load(kind) {
            Ok(df) => Ok(Some(df)),
            Err(IndicatorError::MissingTable { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use caibao_data::columns::{STOCK_NAME, TOTAL_REVENUE};
    use rstest::rstest;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_guarded_divisor() {
        let df = df!("a" => [1.0, 1.0], "b" => [0.0, 4.0]).unwrap();
        let out = df
            .lazy()
            .select([(col("a") / guarded(col("b"))).alias("q")])
            .collect()
            .unwrap();

        let q = values(&out, "q");
        assert!(q[0].is_nan());
        assert_eq!(q[1], 0.25);
    }

    #[test]
    fn test_missing_key_column_is_an_error() {
        let df = df!(STOCK_CODE => ["000001"], TOTAL_REVENUE => [1.0]).unwrap();
        let err = analyze(StatementKind::Income, df).unwrap_err();
        assert!(matches!(err, IndicatorError::MissingColumn { .. }));
    }

    #[rstest]
    #[case(StatementKind::Income)]
    #[case(StatementKind::CashFlow)]
    #[case(StatementKind::Balance)]
    #[case(StatementKind::Dividend)]
    fn test_projection_and_finiteness(#[case] kind: StatementKind) {
        // A clean table of zeros exercises every zero-denominator path.
        let df = df!(
            STOCK_CODE => ["600519", "000001"],
            STOCK_NAME => ["贵州茅台", "平安银行"],
            REPORT_DATE => ["20231231", "20231231"],
        )
        .unwrap();

        let out = analyze(kind, df).unwrap();

        let names: Vec<&str> = out.get_column_names().iter().map(|n| n.as_str()).collect();
        let expected: Vec<&str> = KEY_COLUMNS.iter().chain(output_columns(kind)).copied().collect();
        assert_eq!(names, expected);
        assert_eq!(strings(&out, STOCK_CODE), vec!["000001", "600519"]);
        for &name in output_columns(kind) {
            assert!(values(&out, name).iter().all(|v| v.is_finite()), "{name}");
        }
    }

    #[test]
    fn test_analyzer_round_trip() {
        let dir = tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let clean = layout.clean_path(StatementKind::Income);
        fs::create_dir_all(clean.parent().unwrap()).unwrap();
        fs::write(
            &clean,
            "股票代码,股票简称,报告期,营业总收入,营业成本\n000858,五粮液,20231231,200,50\n",
        )
        .unwrap();

        let analyzer = Analyzer::new(layout.clone());
        let summary = analyzer.analyze(StatementKind::Income).unwrap().unwrap();
        assert_eq!(summary.rows, 1);

        let loaded = analyzer.load(StatementKind::Income).unwrap();
        assert_eq!(strings(&loaded, STOCK_CODE), vec!["000858"]);
        assert_eq!(values(&loaded, crate::columns::GROSS_MARGIN), vec![0.75]);
    }

    #[test]
    fn test_analyzer_skips_missing_clean_table() {
        let dir = tempdir().unwrap();
        let analyzer = Analyzer::new(DataLayout::new(dir.path()));

        assert!(analyzer.analyze(StatementKind::Balance).unwrap().is_none());
        assert!(matches!(
            analyzer.load(StatementKind::Balance),
            Err(IndicatorError::MissingTable { .. })
        ));
        assert!(
            analyzer
                .load_optional(StatementKind::Balance)
                .unwrap()
                .is_none()
        );
    }
}
