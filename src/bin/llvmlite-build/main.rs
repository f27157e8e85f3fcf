//! llvmlite-build CLI - builds llvmlite's native LLVM bridge

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use llvmlite_build::util::Shell;
use llvmlite_build::BuildError;

mod cli;
mod commands;

use cli::{Cli, Commands};

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "LLVMLITE_BUILD_LOG";

fn main() {
    if let Err(e) = run() {
        report(e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let default_filter = if cli.verbose {
        "llvmlite_build=debug"
    } else if cli.quiet {
        "llvmlite_build=warn"
    } else {
        "llvmlite_build=info"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color);

    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &shell),
        Commands::Plan(args) => commands::plan::execute(args, &shell),
        Commands::Clean(args) => commands::clean::execute(args, &shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Render a fatal error. Build failures get a full diagnostic naming the
/// stage that failed.
fn report(e: anyhow::Error) {
    match e.downcast::<BuildError>() {
        Ok(err) => {
            let stage = err.stage();
            let report = miette::Report::new(err).wrap_err(format!("{} failed", stage));
            eprintln!("{:?}", report);
        }
        Err(e) => eprintln!("error: {:#}", e),
    }
}
