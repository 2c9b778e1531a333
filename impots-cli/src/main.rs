use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use impots_cli::app::{self, ComputeArgs};
use impots_cli::report::{OutputFormat, TablesSummary};
use impots_cli::{csv_loader, logging};
use impots_data::{TableSet, TablesConfig};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Estimates French income tax, social contributions and indirect taxes,
/// and shows where the money goes.
///
/// Uses the embedded 2026 tables unless a configuration file overrides them.
#[derive(Debug, Parser)]
#[command(name = "impots", version)]
struct Cli {
    /// Tables configuration file (TOML) overriding embedded tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `warn,impots_core=debug`. Overrides `RUST_LOG`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Report format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the full report for one household.
    Compute(ComputeArgs),

    /// Compute a summary line for every household in a CSV file.
    Batch {
        /// CSV file of households.
        #[arg(long)]
        file: PathBuf,

        /// Report household totals instead of the filer's share.
        #[arg(long)]
        household: bool,
    },

    /// Load, validate and summarize the configured tables.
    Tables,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref())?;
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let config = match &cli.config {
        Some(path) => TablesConfig::from_file(path)
            .with_context(|| format!("reading configuration '{}'", path.display()))?,
        None => TablesConfig::default(),
    };
    let set = TableSet::load(&config).context("loading tax tables")?;
    debug!(year = set.tables.rates.year, "tables loaded");

    match cli.command {
        Command::Compute(args) => {
            let report = app::compute(&set.tables, &args)?;
            match cli.format {
                OutputFormat::Text => print!("{report}"),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("serializing report")?
                ),
            }
        }
        Command::Batch { file, household } => {
            let households = csv_loader::load_from_file(&file)
                .with_context(|| format!("loading households from '{}'", file.display()))?;
            info!(rows = households.len(), file = %file.display(), "households loaded");

            let lines = app::batch(&set.tables, &households, household);
            match cli.format {
                OutputFormat::Text => {
                    for line in &lines {
                        println!("{line}");
                    }
                }
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&lines).context("serializing batch")?
                ),
            }
        }
        Command::Tables => match cli.format {
            OutputFormat::Text => println!("{}", TablesSummary(&set)),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&set.tables).context("serializing tables")?
            ),
        },
    }

    Ok(())
}
