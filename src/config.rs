// src/config.rs

//! Manages client configuration: loading from TOML, defaults, and validation.

use crate::connection::Endpoint;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Settings for one logical connection to the daemon.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// The daemon's address. Defaults to TCP `localhost:6600`.
    #[serde(default)]
    pub endpoint: Endpoint,
    /// How long opening the socket may take, e.g. `"5s"`.
    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    pub connect_timeout: Duration,
    /// Capacity of the change-notification channel. Slow subscribers that
    /// fall further behind than this miss events.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// Suggested `tracing` filter for applications embedding the client.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}
fn default_event_capacity() -> usize {
    64
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            connect_timeout: default_connect_timeout(),
            event_capacity: default_event_capacity(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from a TOML file and validates it.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config in '{path}'"))
    }

    /// Parses and validates a configuration held in memory.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: ClientConfig =
            toml::from_str(contents).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        match &self.endpoint {
            Endpoint::Tcp { host, port } => {
                if host.trim().is_empty() {
                    return Err(anyhow!("endpoint host cannot be empty"));
                }
                if *port == 0 {
                    return Err(anyhow!("endpoint port cannot be 0"));
                }
            }
            Endpoint::Unix { path } => {
                if path.trim().is_empty() {
                    return Err(anyhow!("endpoint path cannot be empty"));
                }
            }
        }
        if self.connect_timeout.is_zero() {
            return Err(anyhow!("connect_timeout must be greater than zero"));
        }
        if self.event_capacity == 0 {
            return Err(anyhow!("event_capacity must be greater than zero"));
        }
        Ok(())
    }
}
