//! `rdt duty` command - Duty-cycle analysis of one column

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{load_raw, report_diagnostics, resolve_column, smart_round};
use crate::cli::OutputFormat;
use crate::core::capability::{self, Capability};
use crate::core::config::Config;
use crate::core::runs::RunSet;
use crate::core::stats::{self, StatsError};
use crate::core::{duty, DutyCycleSummary};

#[derive(clap::Args, Debug)]
pub struct DutyArgs {
    /// Raw file to analyze (`-` for standard input)
    pub file: String,

    /// Column to analyze (index or variable name)
    #[arg(long, short = 'c')]
    pub column: String,

    /// Threshold overriding the observed mid level
    #[arg(long, short = 't')]
    pub threshold: Option<f64>,

    /// Lower spec limit applied to the duty-cycle samples
    #[arg(long)]
    pub min: Option<f64>,

    /// Upper spec limit applied to the duty-cycle samples
    #[arg(long)]
    pub max: Option<f64>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct DutyReport<'a> {
    file: &'a str,
    column: &'a str,
    summary: &'a DutyCycleSummary,
    capability: Option<Capability>,
}

pub fn run(args: DutyArgs, verbose: bool) -> Result<()> {
    let config = Config::load().into_diagnostic()?;
    let raw = load_raw(&args.file)?;
    let column = resolve_column(&raw, &args.column)?;
    let runs = RunSet::segment(raw.matrix.time());

    let summary = duty::analyze(&raw.matrix, column, &runs, args.threshold).into_diagnostic()?;

    if verbose {
        eprintln!(
            "{} {} samples collected, {} discarded by the one-sigma clip",
            style("info:").cyan(),
            summary.sample_count + summary.discarded,
            summary.discarded
        );
    }

    // Capability over the duty-cycle samples themselves, with the same
    // run-count bias correction the parameter table applies
    let cap = if args.min.is_some() || args.max.is_some() {
        let mut diagnostics = Vec::new();
        let corrected = match stats::c4(summary.run_count) {
            Ok(factor) => summary.std_dev / factor,
            Err(err) => {
                diagnostics.push(err);
                summary.std_dev
            }
        };
        let cap = match capability::capability(summary.mean, corrected, args.min, args.max) {
            Ok(cap) => Some(cap),
            Err(err) => {
                diagnostics.push(StatsError::InvalidNormal {
                    name: raw.header.variables[column].clone(),
                    mean: err.mean,
                    std_dev: err.std_dev,
                });
                None
            }
        };
        report_diagnostics(&diagnostics);
        cap
    } else {
        None
    };

    match args.format {
        OutputFormat::Json => {
            let report = DutyReport {
                file: &args.file,
                column: &raw.header.variables[column],
                summary: &summary,
                capability: cap,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).into_diagnostic()?
            );
        }
        OutputFormat::Csv => write_csv(&summary, cap).into_diagnostic()?,
        OutputFormat::Table => print_summary(
            &raw.header.variables[column],
            &summary,
            cap,
            config.display_digits,
        ),
    }

    Ok(())
}

fn print_summary(name: &str, summary: &DutyCycleSummary, cap: Option<Capability>, digits: usize) {
    println!("{} Duty cycle  {}", style("◆").cyan(), style(name).bold());
    println!(
        "  threshold: {}",
        smart_round(summary.threshold, digits)
    );
    println!(
        "  runs: {}   samples: {} ({} discarded)",
        summary.run_count, summary.sample_count, summary.discarded
    );
    println!();
    println!("  mean: {}", smart_round(summary.mean, digits));
    println!("  sdev: {}", smart_round(summary.std_dev, digits));
    println!("  min:  {}", smart_round(summary.min, digits));
    println!("  max:  {}", smart_round(summary.max, digits));

    if let Some(cap) = cap {
        println!();
        println!("  cpk:  {}", smart_round(cap.cpk, digits));
        println!(
            "  %ok:  {}",
            smart_round(cap.yield_fraction * 100.0, digits)
        );
        println!("  ppm:  {}", smart_round(cap.ppm, digits));
    }
}

fn write_csv(summary: &DutyCycleSummary, cap: Option<Capability>) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record([
        "threshold",
        "runs",
        "samples",
        "discarded",
        "mean",
        "sdev",
        "min",
        "max",
        "cpk",
        "yield",
        "ppm",
    ])?;
    writer.write_record([
        summary.threshold.to_string(),
        summary.run_count.to_string(),
        summary.sample_count.to_string(),
        summary.discarded.to_string(),
        summary.mean.to_string(),
        summary.std_dev.to_string(),
        summary.min.to_string(),
        summary.max.to_string(),
        cap.map(|c| c.cpk.to_string()).unwrap_or_default(),
        cap.map(|c| c.yield_fraction.to_string()).unwrap_or_default(),
        cap.map(|c| c.ppm.to_string()).unwrap_or_default(),
    ])?;
    writer.flush()?;
    Ok(())
}
