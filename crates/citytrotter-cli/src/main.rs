//! CityTrotter CLI - Command-line interface
//!
//! Places a hypothetical building, runs it through the impact analysis
//! service, and inspects the reference data layers.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod output;
mod output_types;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use errors::CliError;
use output::OutputWriter;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("citytrotter=info")),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    // Create async runtime
    let runtime = tokio::runtime::Runtime::new()?;

    match runtime.block_on(commands::execute(cli, &output)) {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<CliError>() {
            Some(cli_err) => {
                if output.is_json() {
                    output.error(cli_err);
                } else {
                    cli_err.display();
                }
                std::process::exit(1);
            }
            None => Err(err),
        },
    }
}
