use clap::Parser;
use miette::Result;
use rdt::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Info(args) => rdt::cli::commands::info::run(args, cli.verbose),
        Commands::Stats(args) => rdt::cli::commands::stats::run(args, cli.verbose),
        Commands::Duty(args) => rdt::cli::commands::duty::run(args, cli.verbose),
        Commands::Rms(args) => rdt::cli::commands::rms::run(args, cli.verbose),
        Commands::Hist(args) => rdt::cli::commands::hist::run(args, cli.verbose),
        Commands::Export(args) => rdt::cli::commands::export::run(args),
        Commands::Completions(args) => rdt::cli::commands::completions::run(args),
    }
}
