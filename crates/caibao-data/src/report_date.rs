//! Report date parsing.

use crate::error::{DataError, Result};
use chrono::NaiveDate;

const REPORT_DATE_FORMAT: &str = "%Y%m%d";

/// Parse an eight-digit `YYYYMMDD` report date.
pub fn parse_report_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DataError::InvalidReportDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, REPORT_DATE_FORMAT)
        .map_err(|_| DataError::InvalidReportDate(value.to_string()))
}

/// Format a report date the way the provider filter expects (`YYYY-MM-DD`).
pub fn provider_date(value: &str) -> Result<String> {
    Ok(parse_report_date(value)?.format("%Y-%m-%d").to_string())
}

/// Year-end report date for `year`.
pub fn year_end(year: i32) -> String {
    format!("{year:04}1231")
}
