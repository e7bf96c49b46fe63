//! Pipeline stages over one data layout.
//!
//! Each stage reads the outputs of the previous one from disk, so stages can
//! be run separately or in sequence through [`Pipeline::run`].

use crate::config::PipelineConfig;
use crate::error::Result;
use caibao_data::table::write_table;
use caibao_data::{
    CleanSummary, Cleaner, DataLayout, EastmoneyProvider, FetchConfig, FetchReport, Fetcher,
    StatementKind, StatementProvider,
};
use caibao_indicators::{AnalysisSummary, Analyzer, Selection, company_scale, select_stocks};
use polars::prelude::DataFrame;
use tracing::{info, warn};

/// Outcome of a full clean, analyze and select run.
#[derive(Debug)]
pub struct RunSummary {
    /// Clean tables written
    pub cleaned: Vec<CleanSummary>,
    /// Analysis tables written
    pub analyzed: Vec<AnalysisSummary>,
    /// Screen result, when every input table was available
    pub selection: Option<Selection>,
}

/// Runs the pipeline stages under a configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    layout: DataLayout,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: PipelineConfig) -> Self {
        let layout = config.layout();
        Self { config, layout }
    }

    /// Configuration in use.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Data layout in use.
    pub const fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Provider built from the configured connection settings.
    pub fn eastmoney_provider(&self) -> Result<EastmoneyProvider> {
        Ok(EastmoneyProvider::with_settings(self.config.fetch.clone())?)
    }

    /// Fetch raw tables of `kinds` for every configured report date.
    ///
    /// Failed pairs are recorded in the report and do not stop the run.
    pub async fn fetch<P, F>(
        &self,
        provider: P,
        kinds: &[StatementKind],
        refresh: bool,
        on_done: F,
    ) -> FetchReport
    where
        P: StatementProvider,
        F: FnMut(StatementKind, &str),
    {
        let fetcher = Fetcher::new(provider, self.layout.clone(), FetchConfig { refresh });
        let report = fetcher
            .fetch_all(kinds, &self.config.report_dates, on_done)
            .await;
        info!(
            written = report.written.len(),
            cached = report.cached,
            failed = report.failed.len(),
            "fetch finished"
        );
        report
    }

    /// Consolidate raw tables of `kinds` into clean tables.
    pub fn clean(&self, kinds: &[StatementKind]) -> Result<Vec<CleanSummary>> {
        let cleaner = Cleaner::new(self.layout.clone());
        let mut summaries = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            if let Some(summary) = cleaner.clean(kind, &self.config.report_dates)? {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }

    /// Derive analysis tables of `kinds` from their clean tables.
    pub fn analyze(&self, kinds: &[StatementKind]) -> Result<Vec<AnalysisSummary>> {
        let analyzer = Analyzer::new(self.layout.clone());
        let mut summaries = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            if let Some(summary) = analyzer.analyze(kind)? {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }

    /// Run the multi-period screen and write the selected companies.
    ///
    /// Returns `None` when an input analysis table is missing.
    pub fn select(&self) -> Result<Option<Selection>> {
        let analyzer = Analyzer::new(self.layout.clone());
        let tables = (
            analyzer.load_optional(StatementKind::Income)?,
            analyzer.load_optional(StatementKind::Balance)?,
            analyzer.load_optional(StatementKind::Dividend)?,
        );
        let (Some(income), Some(balance), Some(dividend)) = tables else {
            warn!("income, balance and dividend analysis tables are required, skipping screen");
            return Ok(None);
        };

        let mut selection = select_stocks(&income, &balance, &dividend, &self.config.screen)?;
        let path = self.layout.selected_path();
        write_table(&mut selection.selected, &path)?;
        info!(
            periods = selection.periods.len(),
            selected = selection.selected.height(),
            path = %path.display(),
            "selected stocks written"
        );

        Ok(Some(selection))
    }

    /// Rank companies by scale for `year` and write the ranking.
    ///
    /// Returns `None` when the income or balance analysis is missing, or when
    /// no report in `year` exists.
    pub fn scale(&self, year: i32) -> Result<Option<DataFrame>> {
        let analyzer = Analyzer::new(self.layout.clone());
        let (Some(income), Some(balance)) = (
            analyzer.load_optional(StatementKind::Income)?,
            analyzer.load_optional(StatementKind::Balance)?,
        ) else {
            warn!(year, "income and balance analysis tables are required, skipping scale ranking");
            return Ok(None);
        };
        let dividend = analyzer.load_optional(StatementKind::Dividend)?;

        let Some(mut ranked) = company_scale(
            &income,
            &balance,
            dividend.as_ref(),
            year,
            &self.config.scale,
        )?
        else {
            return Ok(None);
        };

        let path = self.layout.top_companies_path(year);
        write_table(&mut ranked, &path)?;
        info!(year, rows = ranked.height(), path = %path.display(), "top companies written");

        Ok(Some(ranked))
    }

    /// Load the analysis table of `kind`.
    pub fn load_analysis(&self, kind: StatementKind) -> Result<DataFrame> {
        Ok(Analyzer::new(self.layout.clone()).load(kind)?)
    }

    /// Clean and analyze every kind, then run the screen.
    pub fn run(&self) -> Result<RunSummary> {
        let cleaned = self.clean(&StatementKind::ALL)?;
        let analyzed = self.analyze(&StatementKind::ALL)?;
        let selection = self.select()?;
        Ok(RunSummary {
            cleaned,
            analyzed,
            selection,
        })
    }
}
