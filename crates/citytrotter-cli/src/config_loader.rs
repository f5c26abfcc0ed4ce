//! Configuration loading utilities for CLI commands

use crate::cli::Cli;
use anyhow::{Context, Result};
use citytrotter_core::config::{parse_api_url, CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "citytrotter.toml";

/// Load layered configuration with the global CLI flags applied
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let overrides = CliConfigOverrides {
        api_url: cli.api_url.as_deref().map(parse_api_url).transpose()?,
        debounce_ms: None,
        request_timeout_secs: cli.timeout,
    };

    let mut config = load_layers(config_file(cli.config.as_deref()))?;
    config.update_from_cli(overrides);
    Ok(config)
}

/// Path of the config file to read, if any
pub fn config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.is_file().then_some(local)
        }
    }
}

fn load_layers(file: Option<PathBuf>) -> Result<LayeredConfig> {
    let config = match file {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => LayeredConfig::with_defaults(),
    };

    Ok(config.load_from_env())
}
