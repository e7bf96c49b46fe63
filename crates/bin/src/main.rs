//! Caibao CLI binary.
//!
//! Provides the command-line interface for the statement pipeline.

mod report;

use caibao::{Pipeline, PipelineConfig};
use caibao_data::StatementKind;
use caibao_indicators::output_columns;
use caibao_output::{
    BarChart, CompanyFilter, DEFAULT_BAR_WIDTH, DEFAULT_TOP_N, ExportFormat, Exporter, TopCompany,
    company_series, default_views, rank_indicator, render_series, view_for,
};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "caibao")]
#[command(about = "Caibao: A-share financial statement pipeline", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./caibao.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data root directory, overriding the configuration
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch raw statement tables for every configured report date
    Fetch {
        /// Statement kinds to fetch (default: all)
        #[arg(long = "kind")]
        kinds: Vec<StatementKind>,

        /// Re-fetch tables that are already on disk
        #[arg(long)]
        refresh: bool,
    },

    /// Consolidate raw tables into clean tables
    Clean {
        /// Statement kinds to clean (default: all)
        #[arg(long = "kind")]
        kinds: Vec<StatementKind>,
    },

    /// Derive analysis tables from clean tables
    Analyze {
        /// Statement kinds to analyze (default: all)
        #[arg(long = "kind")]
        kinds: Vec<StatementKind>,
    },

    /// Run the multi-period screen
    Select {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Also write the selection to this file (CSV unless --format json)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Rank companies by scale for one year
    Scale {
        /// Fiscal year
        #[arg(long)]
        year: i32,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Also write the ranking to this file (CSV unless --format json)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Chart the top companies of an analysis table
    Show {
        /// Statement kind
        #[arg(long)]
        kind: StatementKind,

        /// Indicator column (default: the standard views of the kind)
        #[arg(long)]
        indicator: Option<String>,

        /// Report date (default: latest)
        #[arg(long)]
        date: Option<String>,

        /// Number of companies shown
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        /// Chart format
        #[arg(long, value_enum, default_value = "text")]
        format: ChartFormat,
    },

    /// Follow an indicator over time for chosen companies
    Trend {
        /// Statement kind
        #[arg(long)]
        kind: StatementKind,

        /// Indicator column
        #[arg(long)]
        indicator: String,

        /// Company codes (default: configured companies)
        #[arg(long = "code")]
        codes: Vec<String>,

        /// Company short names
        #[arg(long = "name")]
        names: Vec<String>,
    },

    /// Clean, analyze and select in one pass
    Run,

    /// List statement kinds and their files
    Kinds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    /// Export format for machine-readable output.
    const fn export(self) -> Option<ExportFormat> {
        match self {
            Self::Text => None,
            Self::Json => Some(ExportFormat::PrettyJson),
            Self::Csv => Some(ExportFormat::Csv),
        }
    }

    /// Export format for `--output` files.
    const fn file_export(self) -> ExportFormat {
        match self.export() {
            Some(format) => format,
            None => ExportFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChartFormat {
    Text,
    Markdown,
}

fn render_chart(chart: &BarChart, format: ChartFormat) -> String {
    match format {
        ChartFormat::Text => chart.render_text(DEFAULT_BAR_WIDTH),
        ChartFormat::Markdown => format!("{}\n", chart.to_markdown()),
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Unknown indicator {column} for {kind}")]
    UnknownIndicator { kind: StatementKind, column: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn kinds_or_all(kinds: Vec<StatementKind>) -> Vec<StatementKind> {
    if kinds.is_empty() {
        StatementKind::ALL.to_vec()
    } else {
        kinds
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (mut config, source) = PipelineConfig::discover(cli.config.as_deref())?;
    match source {
        Some(path) => info!(path = %path.display(), "configuration loaded"),
        None => info!("no configuration file, using defaults"),
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let pipeline = Pipeline::new(config);

    match cli.command {
        Commands::Fetch { kinds, refresh } => {
            fetch(&pipeline, &kinds_or_all(kinds), refresh).await?;
        }
        Commands::Clean { kinds } => {
            let summaries = pipeline.clean(&kinds_or_all(kinds))?;
            report::print_cleaned(&summaries);
        }
        Commands::Analyze { kinds } => {
            let summaries = pipeline.analyze(&kinds_or_all(kinds))?;
            report::print_analyzed(&summaries);
        }
        Commands::Select { format, output } => select(&pipeline, format, output)?,
        Commands::Scale {
            year,
            format,
            output,
        } => scale(&pipeline, year, format, output)?,
        Commands::Show {
            kind,
            indicator,
            date,
            top,
            format,
        } => show(
            &pipeline,
            kind,
            indicator.as_deref(),
            date.as_deref(),
            top,
            format,
        )?,
        Commands::Trend {
            kind,
            indicator,
            codes,
            names,
        } => trend(&pipeline, kind, &indicator, codes, names)?,
        Commands::Run => {
            let summary = pipeline.run()?;
            report::print_cleaned(&summary.cleaned);
            report::print_analyzed(&summary.analyzed);
            if let Some(selection) = summary.selection {
                report::print_selection(&selection)?;
            }
        }
        Commands::Kinds => report::print_kinds(),
    }

    Ok(())
}

async fn fetch(
    pipeline: &Pipeline,
    kinds: &[StatementKind],
    refresh: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = pipeline.eastmoney_provider()?;
    let total = kinds.len() * pipeline.config().report_dates.len();

    report::banner("FETCH STATEMENT TABLES");
    println!("Data root: {}", pipeline.layout().root().display());
    println!("Report dates: {}", pipeline.config().report_dates.len());
    if refresh {
        println!("Mode: Force refresh (re-fetching all tables)");
    }
    println!();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = pipeline
        .fetch(provider, kinds, refresh, |kind, date| {
            pb.set_message(format!("{kind} {date}"));
            pb.inc(1);
        })
        .await;

    pb.finish_with_message(format!(
        "{} written, {} cached, {} failed",
        report.written.len(),
        report.cached,
        report.failed.len()
    ));

    if !report.failed.is_empty() {
        println!("\nFailed tables:");
        for failure in &report.failed {
            println!(
                "  {:<22} {}  {}",
                failure.kind.slug(),
                failure.report_date,
                failure.reason
            );
        }
    }

    Ok(())
}

fn select(
    pipeline: &Pipeline,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(selection) = pipeline.select()? else {
        return Ok(());
    };
    let stocks = selection.stocks()?;

    match format.export() {
        None => report::print_selection(&selection)?,
        Some(export) => println!("{}", stocks.export_to_string(export)?),
    }
    if let Some(path) = output {
        stocks.export_to_file(&path, format.file_export())?;
        info!(path = %path.display(), stocks = stocks.len(), "selection exported");
    }
    Ok(())
}

fn scale(
    pipeline: &Pipeline,
    year: i32,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(ranked) = pipeline.scale(year)? else {
        return Ok(());
    };
    let companies = TopCompany::from_frame(&ranked)?;

    match format.export() {
        None => report::print_top_companies(year, &companies),
        Some(export) => println!("{}", companies.export_to_string(export)?),
    }
    if let Some(path) = output {
        companies.export_to_file(&path, format.file_export())?;
        info!(path = %path.display(), year, companies = companies.len(), "top companies exported");
    }
    Ok(())
}

fn show(
    pipeline: &Pipeline,
    kind: StatementKind,
    indicator: Option<&str>,
    date: Option<&str>,
    top: usize,
    format: ChartFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = pipeline.load_analysis(kind)?;

    let views = match indicator {
        Some(column) => vec![view_for(kind, column).ok_or_else(|| CliError::UnknownIndicator {
            kind,
            column: column.to_string(),
        })?],
        None => default_views(kind).to_vec(),
    };

    for view in &views {
        match rank_indicator(&table, view, date, top)? {
            Some(ranking) => print!("{}", render_chart(&ranking.to_chart(), format)),
            None => warn!(kind = %kind, column = view.column, "no rows for report date"),
        }
    }
    Ok(())
}

fn trend(
    pipeline: &Pipeline,
    kind: StatementKind,
    indicator: &str,
    codes: Vec<String>,
    names: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !output_columns(kind).contains(&indicator) {
        return Err(CliError::UnknownIndicator {
            kind,
            column: indicator.to_string(),
        }
        .into());
    }

    let codes = if codes.is_empty() && names.is_empty() {
        pipeline.config().companies.clone()
    } else {
        codes
    };
    let Some(filter) = CompanyFilter::new(codes, names) else {
        warn!("no companies given or configured, nothing to show");
        return Ok(());
    };

    let table = pipeline.load_analysis(kind)?;
    let series = company_series(&table, &filter, indicator)?;
    if series.is_empty() {
        warn!(kind = %kind, indicator, "no matching companies in analysis table");
        return Ok(());
    }
    print!("{}", render_series(&series, indicator));
    Ok(())
}
