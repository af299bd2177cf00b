//! `rdt hist` command - Terminal histogram of one column
//!
//! Bins one column and renders it as a braille canvas. Spec limits paired
//! from the variable names widen the range when they fall outside the
//! observed extremes.

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    format_opt, load_raw, report_diagnostics, resolve_column, smart_round,
};
use crate::cli::viz;
use crate::core::config::Config;
use crate::core::histogram;
use crate::core::runs::RunSet;
use crate::core::stats::ParameterTable;

#[derive(clap::Args, Debug)]
pub struct HistArgs {
    /// Raw file to analyze (`-` for standard input)
    pub file: String,

    /// Column to analyze (index or variable name)
    #[arg(long, short = 'c')]
    pub column: String,

    /// Number of bins (defaults to the configured bin count)
    #[arg(long, short = 'b')]
    pub bins: Option<usize>,
}

pub fn run(args: HistArgs, verbose: bool) -> Result<()> {
    let config = Config::load().into_diagnostic()?;
    let raw = load_raw(&args.file)?;
    let column = resolve_column(&raw, &args.column)?;
    let runs = RunSet::segment(raw.matrix.time());

    // Spec limits come from the paired `_min)` / `_max)` columns
    let table = ParameterTable::build(&raw.matrix, &raw.header.variables, &runs);
    report_diagnostics(table.diagnostics());
    let parameter = &table.parameters()[column];

    let bins = args.bins.unwrap_or(config.histogram_bins);
    let hist = histogram::build(
        raw.matrix.column(column),
        bins,
        parameter.spec_min,
        parameter.spec_max,
    )
    .into_diagnostic()?;

    if verbose {
        eprintln!(
            "{} {} bins of width {}",
            style("info:").cyan(),
            bins,
            smart_round(hist.bin_width, config.display_digits)
        );
    }

    println!(
        "{} Histogram  {}",
        style("◆").cyan(),
        style(&parameter.name).bold()
    );
    println!(
        "{}",
        viz::render_histogram(&hist, config.histogram_width, config.histogram_height)
    );
    println!(
        "  min={}  max={}  spec min={}  spec max={}",
        smart_round(hist.min, config.display_digits),
        smart_round(hist.max, config.display_digits),
        format_opt(parameter.spec_min, config.display_digits),
        format_opt(parameter.spec_max, config.display_digits),
    );

    Ok(())
}
