//! The `rank` subcommand: the three ranked YTD tables for a reference date.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Args;
use indexrank_lib::analyze;

use crate::output::{
    print_json, print_report_csv, print_report_markdown, print_report_tables, OutputFormat,
};
use crate::workbook::load_workbook;

/// Arguments for the `rank` subcommand.
#[derive(Args)]
pub struct RankArgs {
    /// Workbook directory of per-sheet CSV files
    #[arg(long)]
    pub workbook: PathBuf,

    /// Reference date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Index subset to display: asean or all (default: asean)
    #[arg(long, default_value = "asean")]
    pub indices: String,

    /// Sheet names to exclude from processing (repeatable)
    #[arg(long, default_value = "Legend")]
    pub exclude: Vec<String>,
}

pub fn run(args: &RankArgs, format: &OutputFormat) -> Result<()> {
    let reference_date = NaiveDate::parse_from_str(args.date.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid --date '{}'. Expected format: YYYY-MM-DD", args.date))?;
    let selection = super::parse_selection(&args.indices)?;

    let sheets = load_workbook(&args.workbook, &args.exclude)?;
    if sheets.is_empty() {
        bail!(
            "every sheet in '{}' is excluded; nothing to rank",
            args.workbook.display()
        );
    }

    let analysis = analyze(&sheets, reference_date, &selection)?;

    for diagnostic in analysis.diagnostics.iter().filter(|d| d.is_error()) {
        eprintln!("Error processing sheet '{}': {}", diagnostic.index, diagnostic.message);
    }

    match format {
        OutputFormat::Table => print_report_tables(&analysis.report),
        OutputFormat::Markdown => print_report_markdown(&analysis.report),
        OutputFormat::Csv => print_report_csv(&analysis.report)?,
        OutputFormat::Json => print_json(&analysis.report),
    }

    Ok(())
}
