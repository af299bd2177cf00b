//! `rdt export` command - Decoded matrix as CSV on stdout

use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::load_raw;

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Raw file to export (`-` for standard input)
    pub file: String,
}

pub fn run(args: ExportArgs) -> Result<()> {
    let raw = load_raw(&args.file)?;

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer
        .write_record(&raw.header.variables)
        .into_diagnostic()?;

    let columns = raw.header.variable_count;
    for row in 0..raw.matrix.point_count() {
        let record: Vec<String> = (0..columns)
            .map(|col| raw.matrix.column(col)[row].to_string())
            .collect();
        writer.write_record(&record).into_diagnostic()?;
    }

    writer.flush().into_diagnostic()?;
    Ok(())
}
