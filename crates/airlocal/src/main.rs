//! airlocal CLI - local Docker environments for WordPress development
//!
//! This is the main entry point for the airlocal command-line interface.

mod cli;
mod commands;
mod output;
mod prompt;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Create(args) => commands::create::run(args).await,
        Commands::Start(args) => commands::environment::start(args).await,
        Commands::Stop(args) => commands::environment::stop(args).await,
        Commands::Restart(args) => commands::environment::restart(args).await,
        Commands::Delete(args) => commands::environment::delete(args).await,
        Commands::List => commands::list::run(),
        Commands::Configure(args) => commands::configure::run(args),
        Commands::Hosts(args) => commands::hosts::run(args),
        Commands::Cache(args) => commands::cache::run(args).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Progress is reported through the output helpers; logs only
            // surface problems unless asked for
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
