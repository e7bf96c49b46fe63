//! Reading and writing statement tables.
//!
//! Tables are read with every column as text so company codes keep their
//! leading zeros; numeric columns are then coerced explicitly.

use crate::error::Result;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// Whether `df` has a column named `name`.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Read a CSV table with every column typed as text.
pub fn read_text_table(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Read a CSV table and coerce `numeric` columns to `Float64`.
pub fn read_table(path: &Path, numeric: &[&str]) -> Result<DataFrame> {
    coerce_numeric(read_text_table(path)?, numeric)
}

/// Best-effort numeric parse: unparsable, missing or NaN values become 0.0.
pub fn to_numeric(expr: Expr) -> Expr {
    expr.cast(DataType::Float64)
        .fill_nan(lit(0.0))
        .fill_null(lit(0.0))
}

/// Coerce `columns` to `Float64`, synthesizing absent columns as 0.0.
///
/// Present columns keep their position; synthesized columns are appended in
/// the order given.
pub fn coerce_numeric(df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    if columns.is_empty() {
        return Ok(df);
    }

    let exprs: Vec<Expr> = columns
        .iter()
        .map(|&name| {
            if has_column(&df, name) {
                to_numeric(col(name)).alias(name)
            } else {
                lit(0.0).alias(name)
            }
        })
        .collect();

    Ok(df.lazy().with_columns(exprs).collect()?)
}

/// Replace NaN, infinite and missing values in `columns` with 0.0.
pub fn zero_non_finite(df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let exprs: Vec<Expr> = columns
        .iter()
        .filter(|name| has_column(&df, name))
        .map(|&name| {
            when(col(name).is_finite())
                .then(col(name))
                .otherwise(lit(0.0))
                .alias(name)
        })
        .collect();

    if exprs.is_empty() {
        return Ok(df);
    }
    Ok(df.lazy().with_columns(exprs).collect()?)
}

/// Write `df` as CSV, creating parent directories and replacing any prior file.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn f64_values(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn test_read_keeps_leading_zeros() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        fs::write(&path, "股票代码,净利润\n000858,12.5\n600519,abc\n").unwrap();

        let df = read_table(&path, &["净利润"]).unwrap();

        let codes: Vec<&str> = df
            .column("股票代码")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(codes, vec!["000858", "600519"]);
        assert_eq!(f64_values(&df, "净利润"), vec![12.5, 0.0]);
    }

    #[test]
    fn test_coerce_synthesizes_missing_columns() {
        let df = df!("a" => ["1.5", "", "x"]).unwrap();
        let df = coerce_numeric(df, &["a", "b"]).unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(f64_values(&df, "a"), vec![1.5, 0.0, 0.0]);
        assert_eq!(f64_values(&df, "b"), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_zero_non_finite() {
        let df = df!(
            "ratio" => [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.25],
        )
        .unwrap();
        let df = zero_non_finite(df, &["ratio", "absent"]).unwrap();
        assert_eq!(f64_values(&df, "ratio"), vec![0.0, 0.0, 0.0, 0.25]);
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let mut df = df!("股票代码" => ["000001"], "值" => [1.0]).unwrap();

        write_table(&mut df, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("股票代码,值\n"));
        assert!(content.contains("000001"));
    }
}
