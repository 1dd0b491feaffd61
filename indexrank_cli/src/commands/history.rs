//! The `history` subcommand: the aligned closing-price matrix (chart feed).

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use indexrank_lib::{align, normalize_sheets};

use crate::output::{
    print_history_csv, print_history_markdown, print_history_table, print_json, OutputFormat,
};
use crate::workbook::load_workbook;

/// Arguments for the `history` subcommand.
#[derive(Args)]
pub struct HistoryArgs {
    /// Workbook directory of per-sheet CSV files
    #[arg(long)]
    pub workbook: PathBuf,

    /// Index subset to display: asean or all (default: all)
    #[arg(long, default_value = "all")]
    pub indices: String,

    /// Sheet names to exclude from processing (repeatable)
    #[arg(long, default_value = "Legend")]
    pub exclude: Vec<String>,
}

pub fn run(args: &HistoryArgs, format: &OutputFormat) -> Result<()> {
    let selection = super::parse_selection(&args.indices)?;

    let sheets = load_workbook(&args.workbook, &args.exclude)?;
    let (series, diagnostics) = normalize_sheets(&sheets);
    for diagnostic in diagnostics.iter().filter(|d| d.is_error()) {
        eprintln!("Error processing sheet '{}': {}", diagnostic.index, diagnostic.message);
    }
    if series.is_empty() {
        bail!("no usable sheets in '{}'", args.workbook.display());
    }

    let kept: Vec<_> = series
        .into_iter()
        .filter(|s| selection.includes(s.label()))
        .collect();
    let (aligned, _) = align(&kept);

    match format {
        OutputFormat::Table => print_history_table(&aligned),
        OutputFormat::Markdown => print_history_markdown(&aligned),
        OutputFormat::Csv => print_history_csv(&aligned)?,
        OutputFormat::Json => print_json(&aligned),
    }

    Ok(())
}
