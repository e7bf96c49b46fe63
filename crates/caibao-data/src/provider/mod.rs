//! External statement providers.
//!
//! A provider answers one question: the table of a statement kind for one
//! report date. The pipeline treats its column set as a black box beyond the
//! columns named in [`StatementKind::numeric_columns`].

pub mod eastmoney;

pub use eastmoney::{EastmoneyProvider, EastmoneySettings};

use crate::code::normalize_stock_code;
use crate::columns::{LEGACY_CODE, STOCK_CODE};
use crate::error::Result;
use crate::kind::StatementKind;
use std::fs;
use std::future::Future;
use std::path::Path;

/// A provider table: a header plus text rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column names in output order.
    pub columns: Vec<String>,
    /// Rows, each holding one cell per column.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create an empty table with the given header.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; short rows are padded with empty cells.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Normalize the company code column (canonical or legacy header).
    pub fn normalize_codes(&mut self) {
        let Some(idx) = self
            .columns
            .iter()
            .position(|c| c == STOCK_CODE || c == LEGACY_CODE)
        else {
            return;
        };

        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(idx) {
                *cell = normalize_stock_code(cell);
            }
        }
    }

    /// Write the table as CSV, creating parent directories.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Source of per-date statement tables.
pub trait StatementProvider {
    /// Fetch the full cross-section of `kind` for `report_date` (`YYYYMMDD`).
    fn fetch(
        &self,
        kind: StatementKind,
        report_date: &str,
    ) -> impl Future<Output = Result<RawTable>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut table = RawTable::new(["股票代码", "股票简称", "净利润"]);
        table.push_row(vec!["1".to_string()]);

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0], vec!["1", "", ""]);
    }

    #[test]
    fn test_normalize_legacy_code_column() {
        let mut table = RawTable::new(["代码", "名称"]);
        table.push_row(vec!["858".to_string(), "五粮液".to_string()]);
        table.normalize_codes();

        assert_eq!(table.rows[0][0], "000858");
    }

    #[test]
    fn test_write_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw").join("t.csv");
        let mut table = RawTable::new(["股票代码", "净利润"]);
        table.push_row(vec!["000001".to_string(), "1.5".to_string()]);

        table.write_csv(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "股票代码,净利润\n000001,1.5\n");
    }
}
