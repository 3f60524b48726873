//! Configuration management for the CLI

use crate::output::OutputFormat;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Cluster-api group used when neither --capi-group nor CAPI_GROUP is set
    pub capi_group: Option<String>,
    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let Some(config_path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config file")
    }

    /// Output format from the config file, falling back to the table view
    pub fn output_format(&self) -> OutputFormat {
        self.default_format
            .as_deref()
            .and_then(|s| OutputFormat::from_str(s, true).ok())
            .unwrap_or_default()
    }

    /// Get the configuration file path
    fn config_path() -> Option<PathBuf> {
        let home = dirs_next::home_dir()?;
        Some(home.join(".config").join("capi-ng").join("config.json"))
    }
}
