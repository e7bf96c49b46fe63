//! Consolidation of raw per-date tables into one clean table per statement.
//!
//! Cleaning is best effort: a missing raw file is skipped, a missing column is
//! synthesized, an unparsable number becomes 0.0. Only I/O and parse failures
//! of files that do exist are errors.

use crate::code::normalize_code_column;
use crate::columns::*;
use crate::error::Result;
use crate::kind::StatementKind;
use crate::layout::DataLayout;
use crate::table::{coerce_numeric, has_column, read_text_table, write_table};
use polars::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Outcome of cleaning one statement kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    /// Statement kind
    pub kind: StatementKind,
    /// Clean table path
    pub path: PathBuf,
    /// Rows in the clean table
    pub rows: usize,
    /// Raw tables read
    pub files_read: usize,
    /// Report dates whose raw table was missing
    pub missing_dates: Vec<String>,
}

/// Builds clean tables from the raw layout.
#[derive(Debug, Clone)]
pub struct Cleaner {
    layout: DataLayout,
}

impl Cleaner {
    /// Create a cleaner over `layout`.
    pub const fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    /// Load and prepare the raw table of `kind` for one date.
    ///
    /// Returns `None` when the raw file does not exist.
    pub fn load_raw(&self, kind: StatementKind, report_date: &str) -> Result<Option<DataFrame>> {
        let path = self.layout.raw_path(kind, report_date);
        if !path.exists() {
            warn!(kind = %kind, report_date, path = %path.display(), "raw table missing, skipping");
            return Ok(None);
        }

        let df = read_text_table(&path)?;
        debug!(kind = %kind, report_date, rows = df.height(), "raw table loaded");
        Ok(Some(prepare_raw(df, report_date)?))
    }

    /// Clean `kind` over `report_dates` and write the clean table.
    ///
    /// Returns `None`, without writing, when no raw table exists for any date.
    pub fn clean(
        &self,
        kind: StatementKind,
        report_dates: &[String],
    ) -> Result<Option<CleanSummary>> {
        let mut frames = Vec::new();
        let mut missing_dates = Vec::new();

        for report_date in report_dates {
            match self.load_raw(kind, report_date)? {
                Some(df) => frames.push(df),
                None => missing_dates.push(report_date.clone()),
            }
        }

        if frames.is_empty() {
            warn!(kind = %kind, "no raw tables found, clean table not written");
            return Ok(None);
        }

        let files_read = frames.len();
        let mut clean = consolidate(kind, frames)?;
        let path = self.layout.clean_path(kind);
        write_table(&mut clean, &path)?;
        info!(kind = %kind, rows = clean.height(), files = files_read, path = %path.display(), "clean table written");

        Ok(Some(CleanSummary {
            kind,
            path,
            rows: clean.height(),
            files_read,
            missing_dates,
        }))
    }
}

/// Canonicalize one raw table fetched for `report_date`.
///
/// Legacy `代码`/`名称` headers are renamed, codes are normalized and the
/// report date column is stamped, replacing any value the source carried.
pub fn prepare_raw(df: DataFrame, report_date: &str) -> Result<DataFrame> {
    let renames: Vec<(&str, &str)> = [(LEGACY_CODE, STOCK_CODE), (LEGACY_NAME, STOCK_NAME)]
        .into_iter()
        .filter(|&(legacy, canonical)| has_column(&df, legacy) && !has_column(&df, canonical))
        .collect();

    let columns: Vec<Column> = df
        .take_columns()
        .into_iter()
        .map(|column| {
            match renames.iter().find(|(legacy, _)| column.name().as_str() == *legacy) {
                Some(&(_, canonical)) => column.with_name(canonical.into()),
                None => column,
            }
        })
        .collect();
    let mut df = DataFrame::new(columns)?;

    normalize_code_column(&mut df)?;

    let date_col: Column = Series::new(REPORT_DATE.into(), vec![report_date; df.height()]).into();
    df.with_column(date_col)?;
    Ok(df)
}

/// Merge prepared raw tables into the clean table of `kind`.
pub fn consolidate(kind: StatementKind, frames: Vec<DataFrame>) -> Result<DataFrame> {
    let combined = concat_union(frames)?;
    let cost_from_expense = kind == StatementKind::Income
        && !has_column(&combined, COST_OF_REVENUE)
        && has_column(&combined, OPERATING_EXPENSE);

    let projection: Vec<Expr> = combined
        .get_column_names()
        .iter()
        .map(|name| {
            let filled = col(name.as_str()).fill_null(lit("0"));
            if cost_from_expense && name.as_str() == OPERATING_EXPENSE {
                filled.alias(COST_OF_REVENUE)
            } else {
                filled
            }
        })
        .collect();

    let df = combined
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .select(projection)
        .collect()?;

    coerce_numeric(df, kind.numeric_columns())
}

/// Stack frames over the union of their columns, in first-appearance order.
fn concat_union(frames: Vec<DataFrame>) -> Result<DataFrame> {
    let mut columns: Vec<PlSmallStr> = Vec::new();
    for df in &frames {
        for name in df.get_column_names() {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
    }

    let aligned: Vec<LazyFrame> = frames
        .into_iter()
        .map(|df| {
            let exprs: Vec<Expr> = columns
                .iter()
                .map(|name| {
                    if has_column(&df, name.as_str()) {
                        col(name.clone())
                    } else {
                        lit(NULL).cast(DataType::String).alias(name.clone())
                    }
                })
                .collect();
            df.lazy().select(exprs)
        })
        .collect();

    Ok(concat(aligned, UnionArgs::default())?.collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::read_table;
    use rstest::rstest;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_raw(layout: &DataLayout, kind: StatementKind, date: &str, content: &str) {
        let path = layout.raw_path(kind, date);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn strings(df: &DataFrame, name: &str) -> Vec<String> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or("<null>").to_string())
            .collect()
    }

    fn floats(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect()
    }

    fn read_back(path: &Path) -> DataFrame {
        read_text_table(path).unwrap()
    }

    #[test]
    fn test_prepare_raw_renames_and_stamps() {
        let df = df!(
            "代码" => ["858", "600519"],
            "名称" => ["五粮液", "贵州茅台"],
            "报告期" => ["2020-12-31", "2020-12-31"],
        )
        .unwrap();

        let df = prepare_raw(df, "20231231").unwrap();

        assert_eq!(strings(&df, STOCK_CODE), vec!["000858", "600519"]);
        assert_eq!(strings(&df, STOCK_NAME), vec!["五粮液", "贵州茅台"]);
        assert_eq!(strings(&df, REPORT_DATE), vec!["20231231", "20231231"]);
        assert!(!has_column(&df, LEGACY_CODE));
    }

    #[test]
    fn test_consolidate_dedupes_and_fills() {
        let a = df!(
            STOCK_CODE => ["000001", "000001"],
            STOCK_NAME => ["平安银行", "平安银行"],
            REPORT_DATE => ["20231231", "20231231"],
            TOTAL_ASSETS => ["100", "100"],
        )
        .unwrap();
        let b = df!(
            STOCK_CODE => ["600519"],
            REPORT_DATE => ["20221231"],
            CASH => ["not a number"],
        )
        .unwrap();

        let df = consolidate(StatementKind::Balance, vec![a, b]).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(strings(&df, STOCK_NAME), vec!["平安银行", "0"]);
        assert_eq!(floats(&df, TOTAL_ASSETS), vec![100.0, 0.0]);
        assert_eq!(floats(&df, CASH), vec![0.0, 0.0]);
        for &name in StatementKind::Balance.numeric_columns() {
            let column = df.column(name).unwrap();
            assert_eq!(column.dtype(), &DataType::Float64);
            assert_eq!(column.null_count(), 0);
        }
    }

    #[test]
    fn test_income_uses_operating_expense_as_cost_of_revenue() {
        let df = df!(
            STOCK_CODE => ["000001"],
            REPORT_DATE => ["20231231"],
            TOTAL_REVENUE => ["100"],
            OPERATING_EXPENSE => ["60"],
        )
        .unwrap();

        let df = consolidate(StatementKind::Income, vec![df]).unwrap();

        assert_eq!(floats(&df, COST_OF_REVENUE), vec![60.0]);
        assert_eq!(floats(&df, OPERATING_EXPENSE), vec![0.0]);
    }

    #[test]
    fn test_income_keeps_existing_cost_of_revenue() {
        let df = df!(
            STOCK_CODE => ["000001"],
            REPORT_DATE => ["20231231"],
            COST_OF_REVENUE => ["40"],
            OPERATING_EXPENSE => ["60"],
        )
        .unwrap();

        let df = consolidate(StatementKind::Income, vec![df]).unwrap();

        assert_eq!(floats(&df, COST_OF_REVENUE), vec![40.0]);
        assert_eq!(floats(&df, OPERATING_EXPENSE), vec![60.0]);
    }

    #[rstest]
    #[case(StatementKind::Income)]
    #[case(StatementKind::CashFlow)]
    #[case(StatementKind::Balance)]
    #[case(StatementKind::Dividend)]
    fn test_clean_table_has_every_numeric_column(#[case] kind: StatementKind) {
        let df = df!(STOCK_CODE => ["1"], REPORT_DATE => ["20231231"]).unwrap();
        let df = consolidate(kind, vec![df]).unwrap();

        for &name in kind.numeric_columns() {
            assert_eq!(df.column(name).unwrap().dtype(), &DataType::Float64);
        }
    }

    #[test]
    fn test_clean_income_with_provider_headers() {
        let dir = tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        for (date, cost) in [("20221231", "50"), ("20231231", "60")] {
            write_raw(
                &layout,
                StatementKind::Income,
                date,
                &format!("股票代码,股票简称,营业总收入,营业总支出-营业支出\n858,五粮液,100,{cost}\n"),
            );
        }

        let cleaner = Cleaner::new(layout.clone());
        let dates = vec!["20221231".to_string(), "20231231".to_string()];
        let summary = cleaner
            .clean(StatementKind::Income, &dates)
            .unwrap()
            .unwrap();
        assert_eq!(summary.rows, 2);

        let clean = read_table(
            &layout.clean_path(StatementKind::Income),
            StatementKind::Income.numeric_columns(),
        )
        .unwrap();
        assert_eq!(strings(&clean, STOCK_CODE), vec!["000858", "000858"]);
        assert_eq!(floats(&clean, COST_OF_REVENUE), vec![50.0, 60.0]);
        assert_eq!(floats(&clean, OPERATING_EXPENSE), vec![0.0, 0.0]);
    }

    #[test]
    fn test_clean_skips_missing_dates() {
        let dir = tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        write_raw(
            &layout,
            StatementKind::Income,
            "20231231",
            "股票代码,股票简称,营业总收入\n1,平安银行,100\n",
        );

        let cleaner = Cleaner::new(layout.clone());
        let dates = vec!["20221231".to_string(), "20231231".to_string()];
        let summary = cleaner
            .clean(StatementKind::Income, &dates)
            .unwrap()
            .unwrap();

        assert_eq!(summary.rows, 1);
        assert_eq!(summary.files_read, 1);
        assert_eq!(summary.missing_dates, vec!["20221231".to_string()]);

        let clean = read_back(&layout.clean_path(StatementKind::Income));
        assert_eq!(strings(&clean, STOCK_CODE), vec!["000001"]);
        assert_eq!(strings(&clean, REPORT_DATE), vec!["20231231"]);
    }

    #[test]
    fn test_clean_without_inputs_writes_nothing() {
        let dir = tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let cleaner = Cleaner::new(layout.clone());

        let summary = cleaner
            .clean(StatementKind::Dividend, &["20231231".to_string()])
            .unwrap();

        assert!(summary.is_none());
        assert!(!layout.clean_path(StatementKind::Dividend).exists());
    }

    #[test]
    fn test_clean_is_byte_identical_on_rerun() {
        let dir = tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        write_raw(
            &layout,
            StatementKind::Dividend,
            "20221231",
            "代码,名称,现金分红-现金分红比例,每股收益\n600519,贵州茅台,259.11,49.93\n600519,贵州茅台,259.11,49.93\n",
        );
        write_raw(
            &layout,
            StatementKind::Dividend,
            "20231231",
            "代码,名称,现金分红-现金分红比例,现金分红-股息率\n858,五粮液,,0.031\n",
        );

        let cleaner = Cleaner::new(layout.clone());
        let dates = vec!["20221231".to_string(), "20231231".to_string()];
        let path = layout.clean_path(StatementKind::Dividend);

        cleaner.clean(StatementKind::Dividend, &dates).unwrap();
        let first = fs::read(&path).unwrap();
        cleaner.clean(StatementKind::Dividend, &dates).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);

        let clean = read_back(&path);
        assert_eq!(clean.height(), 2);
        assert_eq!(strings(&clean, STOCK_CODE), vec!["600519", "000858"]);
    }
}
