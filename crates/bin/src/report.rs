//! Terminal output of stage results.

use caibao_data::{CleanSummary, StatementKind};
use caibao_indicators::{AnalysisSummary, Selection};
use caibao_output::TopCompany;

pub(crate) fn banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", title);
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

fn section(title: &str) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", title);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

pub(crate) fn print_cleaned(summaries: &[CleanSummary]) {
    section("CLEAN TABLES");
    if summaries.is_empty() {
        println!("No raw tables found.\n");
        return;
    }
    for summary in summaries {
        println!(
            "  {:<22} {:>8} rows  {:>3} files  {}",
            summary.kind.slug(),
            summary.rows,
            summary.files_read,
            summary.path.display()
        );
        if !summary.missing_dates.is_empty() {
            println!("  {:<22} missing: {}", "", summary.missing_dates.join(", "));
        }
    }
    println!();
}

pub(crate) fn print_analyzed(summaries: &[AnalysisSummary]) {
    section("ANALYSIS TABLES");
    if summaries.is_empty() {
        println!("No clean tables found.\n");
        return;
    }
    for summary in summaries {
        println!(
            "  {:<22} {:>8} rows  {}",
            summary.kind.slug(),
            summary.rows,
            summary.path.display()
        );
    }
    println!();
}

pub(crate) fn print_selection(selection: &Selection) -> caibao_indicators::Result<()> {
    let stocks = selection.stocks()?;

    section("MULTI-PERIOD SCREEN");
    println!("Periods: {}", selection.periods.join(", "));
    println!("Companies screened: {}", selection.counts.len());
    println!("Selected: {}\n", stocks.len());

    println!("{:<10} {:<16} {:>8}", "代码", "简称", "达标期数");
    println!("─────────────────────────────────────────");
    for stock in &stocks {
        println!("{:<10} {:<16} {:>8}", stock.code, stock.name, stock.passes);
    }
    println!();
    Ok(())
}

pub(crate) fn print_top_companies(year: i32, companies: &[TopCompany]) {
    section(&format!("TOP COMPANIES BY SCALE: {year}"));
    if let Some(first) = companies.first() {
        println!("Report date: {}\n", first.report_date);
    }

    println!(
        "{:<8} {:<16} {:>14} {:>14} {:>16} {:>6} {:>6} {:>6} {:>6}",
        "代码", "简称", "资产总额", "股东权益", "营业收入", "资产", "净资产", "收入", "综合"
    );
    println!("────────────────────────────────────────────────────────────────────────────────────────────────");
    for c in companies {
        println!(
            "{:<8} {:<16} {:>14.2} {:>14.2} {:>16.2} {:>6} {:>6} {:>6} {:>6}",
            c.code,
            c.name,
            c.assets,
            c.equity,
            c.revenue,
            c.asset_rank,
            c.equity_rank,
            c.revenue_rank,
            c.composite_rank
        );
    }
    println!();
}

pub(crate) fn print_kinds() {
    section("STATEMENT KINDS");
    for kind in StatementKind::ALL {
        println!("{} ({})", kind.slug(), kind.title());
        println!("  provider report: {}", kind.provider_report());
        println!("  raw:      raw/{}/<date>/{}", kind.slug(), kind.raw_file_name("<date>"));
        println!("  clean:    clean/{}", kind.clean_file_name());
        println!("  analysis: analysis/{}", kind.analysis_file_name());
        println!();
    }
}
