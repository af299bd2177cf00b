//! CLI module - argument parsing and command dispatch

pub mod commands;
pub mod helpers;
pub mod viz;

use clap::{Parser, Subcommand, ValueEnum};

/// Raw Data Toolkit - engineering statistics over circuit-simulator raw files
#[derive(Parser, Debug)]
#[command(name = "rdt", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print decoding and analysis diagnostics
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show decoded header metadata
    Info(commands::info::InfoArgs),

    /// Per-parameter statistics with spec limits and process capability
    Stats(commands::stats::StatsArgs),

    /// Duty-cycle analysis of one column
    Duty(commands::duty::DutyArgs),

    /// Per-run RMS analysis of one column
    Rms(commands::rms::RmsArgs),

    /// Terminal histogram of one column
    Hist(commands::hist::HistArgs),

    /// Export the decoded matrix as CSV
    Export(commands::export::ExportArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

/// Output format for analysis commands
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}
