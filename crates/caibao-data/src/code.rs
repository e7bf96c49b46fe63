//! Company code normalization.

use crate::columns::STOCK_CODE;
use crate::error::Result;
use polars::prelude::*;

/// Width of a normalized company code.
pub const CODE_WIDTH: usize = 6;

/// Normalize a company code to exactly six digits.
///
/// Whitespace and any fractional part (`600519.0`) are dropped, non-digit
/// characters such as exchange prefixes are removed, and the result is
/// left-padded with zeros. Codes longer than six digits keep their last six.
pub fn normalize_stock_code(raw: &str) -> String {
    let integral = raw.trim().split('.').next().unwrap_or_default();
    let digits: String = integral.chars().filter(char::is_ascii_digit).collect();

    if digits.len() >= CODE_WIDTH {
        digits[digits.len() - CODE_WIDTH..].to_string()
    } else {
        format!("{digits:0>width$}", width = CODE_WIDTH)
    }
}

/// Rewrite the code column of `df` in place, if present.
///
/// Missing codes normalize to `000000` so the column never holds nulls.
pub fn normalize_code_column(df: &mut DataFrame) -> Result<()> {
    if df.get_column_index(STOCK_CODE).is_none() {
        return Ok(());
    }

    let text = df
        .column(STOCK_CODE)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let codes: Vec<String> = text
        .str()?
        .into_iter()
        .map(|code| normalize_stock_code(code.unwrap_or_default()))
        .collect();

    let code_col: Column = Series::new(STOCK_CODE.into(), codes).into();
    df.with_column(code_col)?;
    Ok(())
}
