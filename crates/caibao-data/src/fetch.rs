//! Raw table fetching.
//!
//! The fetcher walks (kind, report date) pairs in order, asks the provider for
//! each table, normalizes its company codes and persists it under the raw
//! layout. Existing raw files act as the cache: they are kept unless a refresh
//! is requested.

use crate::error::Result;
use crate::kind::StatementKind;
use crate::layout::DataLayout;
use crate::provider::StatementProvider;
use std::path::PathBuf;
use tracing::{info, warn};

/// Configuration for data fetching.
#[derive(Debug, Clone, Default)]
pub struct FetchConfig {
    /// Re-fetch tables whose raw file already exists.
    pub refresh: bool,
}

/// Outcome of fetching one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// The table was fetched and written.
    Written {
        /// Raw file path
        path: PathBuf,
        /// Number of rows written
        rows: usize,
    },
    /// A raw file already existed and was kept.
    Cached(PathBuf),
}

/// A (kind, date) pair that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Statement kind
    pub kind: StatementKind,
    /// Report date
    pub report_date: String,
    /// Error message
    pub reason: String,
}

/// Summary of a fetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Raw files written in this run.
    pub written: Vec<PathBuf>,
    /// Pairs served from existing raw files.
    pub cached: usize,
    /// Pairs that failed and were skipped.
    pub failed: Vec<FetchFailure>,
}

/// Fetches raw statement tables from a provider into the data layout.
#[derive(Debug)]
pub struct Fetcher<P> {
    provider: P,
    layout: DataLayout,
    config: FetchConfig,
}

impl<P: StatementProvider> Fetcher<P> {
    /// Create a fetcher.
    pub const fn new(provider: P, layout: DataLayout, config: FetchConfig) -> Self {
        Self {
            provider,
            layout,
            config,
        }
    }

    /// Fetch and persist one table.
    pub async fn fetch_one(&self, kind: StatementKind, report_date: &str) -> Result<FetchStatus> {
        let path = self.layout.raw_path(kind, report_date);
        if !self.config.refresh && path.exists() {
            return Ok(FetchStatus::Cached(path));
        }

        let mut table = self.provider.fetch(kind, report_date).await?;
        table.normalize_codes();
        table.write_csv(&path)?;
        info!(kind = %kind, report_date, rows = table.len(), path = %path.display(), "raw table written");

        Ok(FetchStatus::Written {
            path,
            rows: table.len(),
        })
    }

    /// Fetch every (kind, date) pair, skipping pairs that fail.
    ///
    /// `on_done` is called after each pair, whatever its outcome.
    pub async fn fetch_all<F>(
        &self,
        kinds: &[StatementKind],
        report_dates: &[String],
        mut on_done: F,
    ) -> FetchReport
    where
        F: FnMut(StatementKind, &str),
    {
        let mut report = FetchReport::default();

        for &kind in kinds {
            for report_date in report_dates {
                match self.fetch_one(kind, report_date).await {
                    Ok(FetchStatus::Written { path, .. }) => report.written.push(path),
                    Ok(FetchStatus::Cached(_)) => report.cached += 1,
                    Err(e) => {
                        warn!(kind = %kind, report_date = %report_date, error = %e, "fetch failed, skipping");
                        report.failed.push(FetchFailure {
                            kind,
                            report_date: report_date.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
                on_done(kind, report_date);
            }
        }

        report
    }
}
