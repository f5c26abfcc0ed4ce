//! Command implementations

mod analyze;
mod config;
mod footprint;
mod health;
mod layers;

use crate::cli::{Cli, Commands};
use crate::config_loader;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use citytrotter_client::HttpAnalysisClient;
use citytrotter_core::config::LayeredConfig;

/// Execute a CLI command
pub async fn execute(cli: Cli, output: &OutputWriter) -> Result<()> {
    let config = config_loader::load_config(&cli)?;

    match cli.command {
        Commands::Analyze(args) => analyze::execute(args, &config, output).await,
        Commands::Footprint(args) => footprint::execute(args, output),
        Commands::Layers(args) => layers::execute(args, &config, output).await,
        Commands::Health => health::execute(&config, output).await,
        Commands::Config => config::execute(cli.config.as_deref(), &config, output),
    }
}

/// Client for the read-only endpoints, bounded by the configured timeout
fn data_client(config: &LayeredConfig) -> Result<HttpAnalysisClient> {
    let client = HttpAnalysisClient::new(config.api_url.value.as_str());
    match config.request_timeout() {
        Some(timeout) => client.with_timeout(timeout).context("Failed to create HTTP client"),
        None => Ok(client),
    }
}
