use crate::error::{CitytrotterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Quiet period before a parameter change triggers re-analysis
pub const DEFAULT_DEBOUNCE_MS: u64 = 1500;

/// Per-request timeout for analysis calls
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for a CityTrotter session
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub api_url: ConfigValue<String>,
    pub debounce_ms: ConfigValue<u64>,
    /// Zero disables the timeout
    pub request_timeout_secs: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            api_url: ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default),
            debounce_ms: ConfigValue::new(DEFAULT_DEBOUNCE_MS, ConfigSource::Default),
            request_timeout_secs: ConfigValue::new(
                DEFAULT_REQUEST_TIMEOUT_SECS,
                ConfigSource::Default,
            ),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| CitytrotterError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| CitytrotterError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(api_url) = file_config.api_url {
            self.api_url.update(parse_api_url(&api_url)?, ConfigSource::File);
        }

        if let Some(debounce_ms) = file_config.debounce_ms {
            self.debounce_ms.update(debounce_ms, ConfigSource::File);
        }

        if let Some(timeout) = file_config.request_timeout_secs {
            self.request_timeout_secs.update(timeout, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // CITYTROTTER_API_URL, falling back to the frontend's VITE_API_URL
        let api_url = env::var("CITYTROTTER_API_URL")
            .map(|v| ("CITYTROTTER_API_URL", v))
            .or_else(|_| env::var("VITE_API_URL").map(|v| ("VITE_API_URL", v)));
        if let Ok((var, url_str)) = api_url {
            match parse_api_url(&url_str) {
                Ok(url) => self.api_url.update(url, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid {} value '{}': expected an http:// or https:// URL",
                    var,
                    url_str
                ),
            }
        }

        // CITYTROTTER_DEBOUNCE_MS
        if let Ok(ms_str) = env::var("CITYTROTTER_DEBOUNCE_MS") {
            match ms_str.parse::<u64>() {
                Ok(ms) => self.debounce_ms.update(ms, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid CITYTROTTER_DEBOUNCE_MS value '{}': expected milliseconds",
                    ms_str
                ),
            }
        }

        // CITYTROTTER_REQUEST_TIMEOUT_SECS
        if let Ok(secs_str) = env::var("CITYTROTTER_REQUEST_TIMEOUT_SECS") {
            match secs_str.parse::<u64>() {
                Ok(secs) => self.request_timeout_secs.update(secs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid CITYTROTTER_REQUEST_TIMEOUT_SECS value '{}': expected seconds",
                    secs_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(api_url) = overrides.api_url {
            self.api_url.update(api_url, ConfigSource::Cli);
        }

        if let Some(debounce_ms) = overrides.debounce_ms {
            self.debounce_ms.update(debounce_ms, ConfigSource::Cli);
        }

        if let Some(timeout) = overrides.request_timeout_secs {
            self.request_timeout_secs.update(timeout, ConfigSource::Cli);
        }
    }

    /// Quiet period before a parameter change fires a re-analysis
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.value)
    }

    /// Per-request timeout, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs.value {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("api_url".to_string(), (self.api_url.value.clone(), self.api_url.source));

        map.insert(
            "debounce_ms".to_string(),
            (self.debounce_ms.value.to_string(), self.debounce_ms.source),
        );

        let timeout = match self.request_timeout() {
            Some(t) => format!("{}s", t.as_secs()),
            None => "disabled".to_string(),
        };
        map.insert("request_timeout".to_string(), (timeout, self.request_timeout_secs.source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    api_url: Option<String>,
    debounce_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub api_url: Option<String>,
    pub debounce_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

/// Parse and normalize a service base URL
pub fn parse_api_url(s: &str) -> Result<String> {
    let trimmed = s.trim().trim_end_matches('/');
    let host = trimmed.strip_prefix("https://").or_else(|| trimmed.strip_prefix("http://"));
    match host {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(CitytrotterError::ConfigInvalid {
            key: "api_url".to_string(),
            reason: format!("Invalid API URL: {}. Use an http:// or https:// URL", s),
        }),
    }
}
