//! edgerecipe CLI - build-variant resolution for edgerunner

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use edgerecipe::util::diagnostic;
use edgerecipe::ResolveError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        match e.downcast_ref::<ResolveError>() {
            Some(err) => diagnostic::emit(&err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("edgerecipe=debug")
    } else {
        EnvFilter::new("edgerecipe=info")
    };

    // Logs go to stderr so `--json` output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Matrix(args) => commands::matrix::execute(args, color),
        Commands::Stage(args) => commands::stage::execute(args),
        Commands::Inspect(args) => commands::inspect::execute(args),
        Commands::Version(args) => commands::version::execute(args),
    }
}
