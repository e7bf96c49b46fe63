//! Pipeline configuration
//!
//! The configuration is a TOML file; every key is optional. Lookup order is an
//! explicit path, then `./caibao.toml`, then `caibao/caibao.toml` under the
//! platform config directory, then built-in defaults.

use caibao_data::report_date::{parse_report_date, year_end};
use caibao_data::{DEFAULT_DATA_DIR, DataLayout, EastmoneySettings, normalize_stock_code};
use caibao_indicators::{ScaleConfig, ScreenConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "caibao.toml";

/// First and last year of the default report dates.
const DEFAULT_YEARS: (i32, i32) = (2010, 2023);

/// Companies of interest when none are configured.
const DEFAULT_COMPANIES: [&str; 3] = ["600519", "000858", "601318"];

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Configuration is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A report date is not an 8-digit calendar date.
    #[error("Invalid report date in config: {0}")]
    InvalidReportDate(String),

    /// A quantile lies outside [0, 1].
    #[error("Invalid quantile {name} = {value} (expected 0..=1)")]
    InvalidQuantile {
        /// Setting name
        name: &'static str,
        /// Configured value
        value: f64,
    },

    /// A screen period count or pass count is unusable.
    #[error("Invalid screen settings: {0}")]
    InvalidScreen(String),
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root of the data layout.
    pub data_dir: PathBuf,
    /// Report dates to fetch and clean (`YYYYMMDD`).
    pub report_dates: Vec<String>,
    /// Companies of interest, used for trend views.
    pub companies: Vec<String>,
    /// Provider connection settings.
    pub fetch: EastmoneySettings,
    /// Multi-period screen thresholds.
    pub screen: ScreenConfig,
    /// Company-scale screen settings.
    pub scale: ScaleConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            report_dates: default_report_dates(),
            companies: DEFAULT_COMPANIES.iter().map(|c| c.to_string()).collect(),
            fetch: EastmoneySettings::default(),
            screen: ScreenConfig::default(),
            scale: ScaleConfig::default(),
        }
    }
}

/// Year-end report dates of the default year range.
pub fn default_report_dates() -> Vec<String> {
    (DEFAULT_YEARS.0..=DEFAULT_YEARS.1).map(year_end).collect()
}

fn check_quantile(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidQuantile { name, value })
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validated()
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve the configuration using the standard lookup order.
    ///
    /// Returns the file used, if any.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let candidates = [
            Some(PathBuf::from(CONFIG_FILE_NAME)),
            dirs::config_dir().map(|dir| dir.join("caibao").join(CONFIG_FILE_NAME)),
        ];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                debug!(path = %path.display(), "using config file");
                return Ok((Self::load(&path)?, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Validate settings, normalizing company codes.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        for date in &self.report_dates {
            parse_report_date(date).map_err(|_| ConfigError::InvalidReportDate(date.clone()))?;
        }

        check_quantile("scale.quantile", self.scale.quantile)?;
        check_quantile("screen.revenue_quantile", self.screen.revenue_quantile)?;
        check_quantile("screen.assets_quantile", self.screen.assets_quantile)?;

        if self.screen.periods == 0 {
            return Err(ConfigError::InvalidScreen(
                "periods must be at least 1".to_string(),
            ));
        }
        if self.screen.min_passing as usize > self.screen.periods {
            return Err(ConfigError::InvalidScreen(format!(
                "min_passing {} exceeds periods {}",
                self.screen.min_passing, self.screen.periods
            )));
        }

        self.companies = self
            .companies
            .iter()
            .map(|c| normalize_stock_code(c))
            .collect();
        Ok(self)
    }

    /// Data layout rooted at `data_dir`.
    pub fn layout(&self) -> DataLayout {
        DataLayout::new(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.report_dates.len(), 14);
        assert_eq!(config.report_dates[0], "20101231");
        assert_eq!(config.report_dates[13], "20231231");
        assert_eq!(config.companies, vec!["600519", "000858", "601318"]);
        assert_eq!(config.screen.periods, 5);
        assert_eq!(config.scale.quantile, 0.7);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(
            PipelineConfig::from_toml_str("").unwrap(),
            PipelineConfig::default()
        );
    }

    #[test]
    fn test_partial_document() {
        let config = PipelineConfig::from_toml_str(
            r#"
data_dir = "/tmp/caibao"
report_dates = ["20221231", "20231231"]
companies = ["858", "600519.0"]

[fetch]
page_size = 100

[screen]
min_passing = 3
"#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/caibao"));
        assert_eq!(config.report_dates, vec!["20221231", "20231231"]);
        assert_eq!(config.companies, vec!["000858", "600519"]);
        assert_eq!(config.fetch.page_size, 100);
        assert_eq!(config.fetch.request_delay_ms, 500);
        assert_eq!(config.screen.min_passing, 3);
        assert_eq!(config.screen.periods, 5);
    }

    #[rstest]
    #[case("report_dates = [\"2023-12-31\"]")]
    #[case("report_dates = [\"20230231\"]")]
    fn test_invalid_report_date(#[case] doc: &str) {
        assert!(matches!(
            PipelineConfig::from_toml_str(doc),
            Err(ConfigError::InvalidReportDate(_))
        ));
    }

    #[rstest]
    #[case("[scale]\nquantile = 1.5")]
    #[case("[screen]\nrevenue_quantile = -0.1")]
    fn test_invalid_quantile(#[case] doc: &str) {
        assert!(matches!(
            PipelineConfig::from_toml_str(doc),
            Err(ConfigError::InvalidQuantile { .. })
        ));
    }

    #[test]
    fn test_min_passing_above_periods() {
        assert!(matches!(
            PipelineConfig::from_toml_str("[screen]\nperiods = 3\nmin_passing = 4"),
            Err(ConfigError::InvalidScreen(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            PipelineConfig::from_toml_str("data_dir = ["),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_discover_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "companies = [\"1\"]\n").unwrap();

        let (config, used) = PipelineConfig::discover(Some(&path)).unwrap();

        assert_eq!(used, Some(path));
        assert_eq!(config.companies, vec!["000001"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            PipelineConfig::load(&dir.path().join("absent.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
