mod commands;
mod output;
mod workbook;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "indexrank")]
#[command(about = "Rank stock-index YTD performance from a workbook of closing prices")]
struct Cli {
    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the three ranked YTD tables for a reference date
    Rank(commands::rank::RankArgs),
    /// Export the aligned closing-price history (chart feed)
    History(commands::history::HistoryArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("indexrank_lib=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Rank(args) => commands::rank::run(args, &format)?,
        Commands::History(args) => commands::history::run(args, &format)?,
    }

    Ok(())
}
