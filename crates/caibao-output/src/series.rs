//! Per-company indicator series
//!
//! Follows chosen companies, by code or by name, across every report period
//! of an analysis table.

use crate::error::{OutputError, Result};
use caibao_data::columns::{REPORT_DATE, STOCK_CODE, STOCK_NAME};
use caibao_data::normalize_stock_code;
use caibao_data::table::has_column;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Companies to follow, matched by code or by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyFilter {
    codes: Vec<String>,
    names: Vec<String>,
}

impl CompanyFilter {
    /// Create a filter; `None` when neither codes nor names are given.
    pub fn new(codes: Vec<String>, names: Vec<String>) -> Option<Self> {
        if codes.is_empty() && names.is_empty() {
            return None;
        }
        Some(Self {
            codes: codes.iter().map(|c| normalize_stock_code(c)).collect(),
            names,
        })
    }

    /// Whether a company matches.
    pub fn matches(&self, code: &str, name: &str) -> bool {
        self.codes.iter().any(|c| c == code) || self.names.iter().any(|n| n == name)
    }
}

/// One report period of a company series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Report date
    pub report_date: String,
    /// Indicator value
    pub value: f64,
}

/// An indicator over time for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySeries {
    /// Company code
    pub code: String,
    /// Company short name
    pub name: String,
    /// Points sorted by report date
    pub points: Vec<SeriesPoint>,
}

/// Collect the series of `column` for every company matched by `filter`.
///
/// Series are ordered by company code.
pub fn company_series(
    table: &DataFrame,
    filter: &CompanyFilter,
    column: &str,
) -> Result<Vec<CompanySeries>> {
    for required in [STOCK_CODE, STOCK_NAME, REPORT_DATE, column] {
        if !has_column(table, required) {
            return Err(OutputError::MissingColumn(required.to_string()));
        }
    }

    let values = table.column(column)?.cast(&DataType::Float64)?;
    let codes = table.column(STOCK_CODE)?.as_materialized_series().str()?;
    let names = table.column(STOCK_NAME)?.as_materialized_series().str()?;
    let dates = table.column(REPORT_DATE)?.as_materialized_series().str()?;
    let values = values.as_materialized_series().f64()?;

    let mut by_code: BTreeMap<String, CompanySeries> = BTreeMap::new();
    for (((code, name), date), value) in codes.into_iter().zip(names).zip(dates).zip(values) {
        let (Some(code), Some(name), Some(date)) = (code, name, date) else {
            continue;
        };
        if !filter.matches(code, name) {
            continue;
        }
        by_code
            .entry(code.to_string())
            .or_insert_with(|| CompanySeries {
                code: code.to_string(),
                name: name.to_string(),
                points: Vec::new(),
            })
            .points
            .push(SeriesPoint {
                report_date: date.to_string(),
                value: value.unwrap_or(0.0),
            });
    }

    let mut series: Vec<CompanySeries> = by_code.into_values().collect();
    for s in &mut series {
        s.points.sort_by(|a, b| a.report_date.cmp(&b.report_date));
    }
    Ok(series)
}

/// Render series as a text table, one row per report date, one column per company.
pub fn render_series(series: &[CompanySeries], column: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{column}\n"));
    output.push_str(&"=".repeat(12 + 16 * series.len()));
    output.push('\n');

    output.push_str(&format!("{:<12}", REPORT_DATE));
    for s in series {
        output.push_str(&format!("{:>16}", s.name));
    }
    output.push('\n');
    output.push_str(&"-".repeat(12 + 16 * series.len()));
    output.push('\n');

    let dates: BTreeSet<&str> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.report_date.as_str()))
        .collect();

    for date in dates {
        output.push_str(&format!("{date:<12}"));
        for s in series {
            match s.points.iter().find(|p| p.report_date == date) {
                Some(point) => output.push_str(&format!("{:>16.4}", point.value)),
                None => output.push_str(&format!("{:>16}", "-")),
            }
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUE: &str = "毛利率";

    fn table() -> DataFrame {
        df!(
            STOCK_CODE => ["600519", "000858", "600519", "000001"],
            STOCK_NAME => ["贵州茅台", "五粮液", "贵州茅台", "平安银行"],
            REPORT_DATE => ["20231231", "20231231", "20221231", "20231231"],
            VALUE => [0.9, 0.75, 0.91, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_filter_is_none() {
        assert!(CompanyFilter::new(vec![], vec![]).is_none());
    }

    #[test]
    fn test_filter_normalizes_codes() {
        let filter = CompanyFilter::new(vec!["858".to_string()], vec![]).unwrap();
        assert!(filter.matches("000858", "五粮液"));
        assert!(!filter.matches("600519", "贵州茅台"));
    }

    #[test]
    fn test_series_by_code_and_name() {
        let filter =
            CompanyFilter::new(vec!["600519".to_string()], vec!["五粮液".to_string()]).unwrap();
        let series = company_series(&table(), &filter, VALUE).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].code, "000858");
        assert_eq!(series[1].code, "600519");

        let dates: Vec<&str> = series[1]
            .points
            .iter()
            .map(|p| p.report_date.as_str())
            .collect();
        assert_eq!(dates, vec!["20221231", "20231231"]);
        assert_eq!(series[1].points[0].value, 0.91);
    }

    #[test]
    fn test_render_series_marks_gaps() {
        let filter =
            CompanyFilter::new(vec!["600519".to_string(), "000858".to_string()], vec![]).unwrap();
        let series = company_series(&table(), &filter, VALUE).unwrap();
        let text = render_series(&series, VALUE);

        assert!(text.contains("贵州茅台"));
        let row_2022 = text.lines().find(|l| l.starts_with("20221231")).unwrap();
        assert!(row_2022.contains('-'));
        assert!(row_2022.contains("0.9100"));
    }

    #[test]
    fn test_missing_column() {
        let filter = CompanyFilter::new(vec!["600519".to_string()], vec![]).unwrap();
        assert!(matches!(
            company_series(&table(), &filter, "净利润"),
            Err(OutputError::MissingColumn(_))
        ));
    }
}
