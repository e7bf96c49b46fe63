//! Export of screen results.
//!
//! Selected stocks and company-scale rankings can be written as CSV or JSON.

use crate::error::{OutputError, Result};
use crate::ranking::Ranking;
use caibao_data::columns::{REPORT_DATE, STOCK_CODE, STOCK_NAME};
use caibao_indicators::SelectedStock;
use caibao_indicators::columns::{
    ASSET_RANK, ASSETS, COMPOSITE_RANK, EQUITY, EQUITY_RANK, REVENUE, REVENUE_RANK,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(OutputError::InvalidFormat(other.to_string())),
        }
    }
}

/// One row of the company-scale ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCompany {
    /// Company code
    pub code: String,
    /// Company short name
    pub name: String,
    /// Report date of the cross-section
    pub report_date: String,
    /// Total assets, in units of 10,000
    pub assets: f64,
    /// Net assets, in units of 10,000
    pub equity: f64,
    /// Revenue
    pub revenue: f64,
    /// Total assets rank
    pub asset_rank: i64,
    /// Net assets rank
    pub equity_rank: i64,
    /// Revenue rank
    pub revenue_rank: i64,
    /// Composite rank
    pub composite_rank: i64,
}

impl TopCompany {
    /// Read the rows of a company-scale table.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>> {
        let text = |name: &str| -> Result<StringChunked> {
            let column = df.column(name)?.cast(&DataType::String)?;
            Ok(column.as_materialized_series().str()?.clone())
        };
        let float = |name: &str| -> Result<Float64Chunked> {
            let column = df.column(name)?.cast(&DataType::Float64)?;
            Ok(column.as_materialized_series().f64()?.clone())
        };
        let int = |name: &str| -> Result<Int64Chunked> {
            let column = df.column(name)?.cast(&DataType::Int64)?;
            Ok(column.as_materialized_series().i64()?.clone())
        };

        let (codes, names, dates) = (text(STOCK_CODE)?, text(STOCK_NAME)?, text(REPORT_DATE)?);
        let (assets, equity, revenue) = (float(ASSETS)?, float(EQUITY)?, float(REVENUE)?);
        let ranks = [
            int(ASSET_RANK)?,
            int(EQUITY_RANK)?,
            int(REVENUE_RANK)?,
            int(COMPOSITE_RANK)?,
        ];

        let rows = (0..df.height())
            .map(|i| Self {
                code: codes.get(i).unwrap_or_default().to_string(),
                name: names.get(i).unwrap_or_default().to_string(),
                report_date: dates.get(i).unwrap_or_default().to_string(),
                assets: assets.get(i).unwrap_or(0.0),
                equity: equity.get(i).unwrap_or(0.0),
                revenue: revenue.get(i).unwrap_or(0.0),
                asset_rank: ranks[0].get(i).unwrap_or(0),
                equity_rank: ranks[1].get(i).unwrap_or(0),
                revenue_rank: ranks[2].get(i).unwrap_or(0),
                composite_rank: ranks[3].get(i).unwrap_or(0),
            })
            .collect();

        Ok(rows)
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<()> {
        let content = self.export_to_string(format)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn records_to_csv<T: Serialize>(records: &[T]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| OutputError::InvalidFormat(e.to_string()))
}

fn export_records<T: Serialize>(records: &[T], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => records_to_csv(records),
        ExportFormat::Json => Ok(serde_json::to_string(records)?),
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(records)?),
    }
}

impl Exporter for Vec<SelectedStock> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String> {
        export_records(self, format)
    }
}

impl Exporter for Vec<TopCompany> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String> {
        export_records(self, format)
    }
}

impl Exporter for Ranking {
    fn export_to_string(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Csv => records_to_csv(&self.entries),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
