//! `rdt stats` command - Per-parameter statistics and process capability

use chrono::{DateTime, Utc};
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::{format_opt, load_raw, report_diagnostics, smart_round};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::runs::RunSet;
use crate::core::stats::{Parameter, ParameterTable};

#[derive(clap::Args, Debug)]
pub struct StatsArgs {
    /// Raw file to analyze (`-` for standard input)
    pub file: String,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// One row of the parameter table
#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "PARAMETER")]
    name: String,
    #[tabled(rename = "MEAN")]
    mean: String,
    #[tabled(rename = "SDEV")]
    std_dev: String,
    #[tabled(rename = "MIN")]
    observed_min: String,
    #[tabled(rename = "MAX")]
    observed_max: String,
    #[tabled(rename = "SPEC MIN")]
    spec_min: String,
    #[tabled(rename = "SPEC MAX")]
    spec_max: String,
    #[tabled(rename = "CPK")]
    cpk: String,
    #[tabled(rename = "%OK")]
    yield_percent: String,
    #[tabled(rename = "PPM")]
    ppm: String,
    #[tabled(rename = "N>MAX")]
    above: String,
    #[tabled(rename = "N<MIN")]
    below: String,
}

#[derive(Serialize)]
struct StatsReport<'a> {
    file: &'a str,
    analyzed_at: DateTime<Utc>,
    runs: usize,
    parameters: &'a [Parameter],
}

pub fn run(args: StatsArgs, verbose: bool) -> Result<()> {
    let config = Config::load().into_diagnostic()?;
    let raw = load_raw(&args.file)?;
    let runs = RunSet::segment(raw.matrix.time());
    let table = ParameterTable::build(&raw.matrix, &raw.header.variables, &runs);

    if verbose {
        eprintln!(
            "{} {} runs, {} points, c4 = {}",
            style("info:").cyan(),
            table.run_count(),
            raw.matrix.point_count(),
            format_opt(table.correction(), config.display_digits),
        );
    }
    report_diagnostics(table.diagnostics());

    match args.format {
        OutputFormat::Table => print_table(&table, config.display_digits),
        OutputFormat::Csv => write_csv(&table).into_diagnostic()?,
        OutputFormat::Json => {
            let report = StatsReport {
                file: &args.file,
                analyzed_at: Utc::now(),
                runs: table.run_count(),
                parameters: table.measurements(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).into_diagnostic()?
            );
        }
    }

    Ok(())
}

fn print_table(table: &ParameterTable, digits: usize) {
    if table.measurements().is_empty() {
        println!("No data columns found");
        return;
    }

    let rows: Vec<StatsRow> = table
        .measurements()
        .iter()
        .enumerate()
        .map(|(i, p)| StatsRow {
            index: i + 1,
            name: p.name.clone(),
            mean: smart_round(p.mean, digits),
            std_dev: format_opt(p.std_dev, digits),
            observed_min: smart_round(p.observed_min, digits),
            observed_max: smart_round(p.observed_max, digits),
            spec_min: format_opt(p.spec_min, digits),
            spec_max: format_opt(p.spec_max, digits),
            cpk: format_opt(p.cpk, digits),
            yield_percent: format_opt(p.yield_fraction.map(|y| y * 100.0), digits),
            ppm: format_opt(p.ppm, digits),
            above: p.above_spec_count.to_string(),
            below: p.below_spec_count.to_string(),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::sharp()));
}

fn write_csv(table: &ParameterTable) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record([
        "parameter",
        "mean",
        "sdev_unbiased",
        "min_found",
        "max_found",
        "spec_min",
        "spec_max",
        "cpk",
        "yield",
        "ppm",
        "n_above",
        "n_below",
    ])?;

    for p in table.measurements() {
        writer.write_record([
            p.name.clone(),
            p.mean.to_string(),
            csv_opt(p.std_dev),
            p.observed_min.to_string(),
            p.observed_max.to_string(),
            csv_opt(p.spec_min),
            csv_opt(p.spec_max),
            csv_opt(p.cpk),
            csv_opt(p.yield_fraction),
            csv_opt(p.ppm),
            p.above_spec_count.to_string(),
            p.below_spec_count.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn csv_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
