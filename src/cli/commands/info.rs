//! `rdt info` command - Decoded header metadata

use console::style;
use miette::Result;

use crate::cli::helpers::load_raw;
use crate::core::runs::RunSet;

#[derive(clap::Args, Debug)]
pub struct InfoArgs {
    /// Raw file to inspect (`-` for standard input)
    pub file: String,
}

pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    let raw = load_raw(&args.file)?;
    let header = &raw.header;
    let runs = RunSet::segment(raw.matrix.time());

    println!("{} {}", style("◆").cyan(), style(&args.file).bold());
    if let Some(title) = &header.title {
        println!("  title:     {title}");
    }
    if let Some(plotname) = &header.plotname {
        println!("  plot:      {plotname}");
    }
    if let Some(date) = &header.date {
        println!("  date:      {date}");
    }
    println!("  encoding:  {}", header.encoding);
    println!("  samples:   {}", header.sample_width);
    println!("  variables: {}", header.variable_count);
    println!("  points:    {}", header.point_count);
    println!("  runs:      {}", runs.count());

    println!();
    for (i, name) in header.variables.iter().enumerate() {
        println!("  {:>4}  {}", style(i).dim(), name);
    }

    if verbose {
        for (i, (start, end)) in runs.iter().enumerate() {
            eprintln!(
                "{} run {} covers rows {}..{}",
                style("info:").cyan(),
                i,
                start,
                end
            );
        }
    }

    Ok(())
}
