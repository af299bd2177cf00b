//! `rdt rms` command - Per-run RMS analysis of one column

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{format_opt, load_raw, resolve_column, smart_round};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::rms::{self, RmsSummary};
use crate::core::runs::RunSet;

#[derive(clap::Args, Debug)]
pub struct RmsArgs {
    /// Raw file to analyze (`-` for standard input)
    pub file: String,

    /// Column to analyze (index or variable name)
    #[arg(long, short = 'c')]
    pub column: String,

    /// Print the per-run RMS values instead of the summary
    #[arg(long)]
    pub data: bool,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct RmsReport<'a> {
    file: &'a str,
    column: &'a str,
    summary: &'a RmsSummary,
}

pub fn run(args: RmsArgs, verbose: bool) -> Result<()> {
    let config = Config::load().into_diagnostic()?;
    let raw = load_raw(&args.file)?;
    let column = resolve_column(&raw, &args.column)?;
    let runs = RunSet::segment(raw.matrix.time());

    let summary =
        rms::analyze(raw.matrix.column(column), runs.count()).into_diagnostic()?;

    if verbose {
        let dropped = raw.matrix.point_count() - summary.samples_per_run * summary.run_count;
        eprintln!(
            "{} {} samples framed into {} blocks of {}, {} dropped",
            style("info:").cyan(),
            raw.matrix.point_count(),
            summary.run_count,
            summary.samples_per_run,
            dropped
        );
    }

    if args.data {
        for value in &summary.per_run {
            println!("{value}");
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => {
            let report = RmsReport {
                file: &args.file,
                column: &raw.header.variables[column],
                summary: &summary,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).into_diagnostic()?
            );
        }
        OutputFormat::Csv => write_csv(&summary).into_diagnostic()?,
        OutputFormat::Table => {
            print_summary(&raw.header.variables[column], &summary, config.display_digits)
        }
    }

    Ok(())
}

fn print_summary(name: &str, summary: &RmsSummary, digits: usize) {
    println!("{} RMS  {}", style("◆").cyan(), style(name).bold());
    println!("  runs:        {}", summary.run_count);
    println!("  samples/run: {}", summary.samples_per_run);
    println!();
    println!("  mean: {}", smart_round(summary.mean, digits));
    println!("  sdev: {}", format_opt(summary.std_dev, digits));
    println!("  min:  {}", smart_round(summary.min, digits));
    println!("  max:  {}", smart_round(summary.max, digits));
    println!(
        "  tol:  +{} -{} (±{}%)",
        smart_round(summary.tol_plus, digits),
        smart_round(summary.tol_minus, digits),
        smart_round(summary.tol_symmetric * 100.0, digits)
    );
}

fn write_csv(summary: &RmsSummary) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record([
        "runs",
        "samples_per_run",
        "mean",
        "sdev",
        "min",
        "max",
        "tol_plus",
        "tol_minus",
        "tol_symmetric",
    ])?;
    writer.write_record([
        summary.run_count.to_string(),
        summary.samples_per_run.to_string(),
        summary.mean.to_string(),
        summary
            .std_dev
            .map(|v| v.to_string())
            .unwrap_or_default(),
        summary.min.to_string(),
        summary.max.to_string(),
        summary.tol_plus.to_string(),
        summary.tol_minus.to_string(),
        summary.tol_symmetric.to_string(),
    ])?;
    writer.flush()?;
    Ok(())
}
