//! On-disk layout of the pipeline's tables.
//!
//! ```text
//! <root>/raw/<kind>/<date>/<kind>_<date>.csv
//! <root>/clean/<kind>_clean.csv
//! <root>/analysis/<kind>_analysis.csv
//! <root>/analysis/selected_stocks.csv
//! <root>/analysis/top_companies_<year>.csv
//! ```

use crate::kind::StatementKind;
use std::path::{Path, PathBuf};

/// Default data root, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Resolves every table path from a single data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Data root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding raw tables for one kind and date.
    pub fn raw_dir(&self, kind: StatementKind, report_date: &str) -> PathBuf {
        self.root.join("raw").join(kind.slug()).join(report_date)
    }

    /// Raw table fetched for one kind and date.
    pub fn raw_path(&self, kind: StatementKind, report_date: &str) -> PathBuf {
        self.raw_dir(kind, report_date)
            .join(kind.raw_file_name(report_date))
    }

    /// Directory holding clean tables.
    pub fn clean_dir(&self) -> PathBuf {
        self.root.join("clean")
    }

    /// Consolidated clean table for one kind.
    pub fn clean_path(&self, kind: StatementKind) -> PathBuf {
        self.clean_dir().join(kind.clean_file_name())
    }

    /// Directory holding analysis outputs.
    pub fn analysis_dir(&self) -> PathBuf {
        self.root.join("analysis")
    }

    /// Analysis table for one kind.
    pub fn analysis_path(&self, kind: StatementKind) -> PathBuf {
        self.analysis_dir().join(kind.analysis_file_name())
    }

    /// Multi-period screen output.
    pub fn selected_path(&self) -> PathBuf {
        self.analysis_dir().join("selected_stocks.csv")
    }

    /// Company-scale ranking output for one year.
    pub fn top_companies_path(&self, year: i32) -> PathBuf {
        self.analysis_dir()
            .join(format!("top_companies_{year}.csv"))
    }
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_path() {
        let layout = DataLayout::new("/tmp/caibao");
        assert_eq!(
            layout.raw_path(StatementKind::Income, "20231231"),
            PathBuf::from("/tmp/caibao/raw/income_statement/20231231/income_statement_20231231.csv")
        );
    }

    #[test]
    fn test_stage_paths() {
        let layout = DataLayout::default();
        assert_eq!(
            layout.clean_path(StatementKind::Dividend),
            PathBuf::from("data/clean/dividend_clean.csv")
        );
        assert_eq!(
            layout.analysis_path(StatementKind::CashFlow),
            PathBuf::from("data/analysis/cash_flow_statement_analysis.csv")
        );
        assert_eq!(
            layout.selected_path(),
            PathBuf::from("data/analysis/selected_stocks.csv")
        );
        assert_eq!(
            layout.top_companies_path(2023),
            PathBuf::from("data/analysis/top_companies_2023.csv")
        );
    }
}
