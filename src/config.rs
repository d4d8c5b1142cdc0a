//! Configuration file handling.
//!
//! This module provides loading and saving of raystat configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/raystat/config.toml`
//! - macOS: `~/Library/Application Support/raystat/config.toml`
//! - Windows: `%APPDATA%\raystat\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! cache_ttl_hours = 1
//! default_format = "table"
//! default_limit = 30
//! compact_numbers = false
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use raystat::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Cache TTL: {} hours", config.cache_ttl_hours);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How long the cached listing set stays fresh, in hours.
    ///
    /// Default: 1 hour
    pub cache_ttl_hours: u64,

    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json"
    /// Default: "table"
    pub default_format: String,

    /// How many rows list commands print by default. 0 means all.
    ///
    /// Default: 30
    pub default_limit: usize,

    /// Abbreviate install counts in tables (12.3K instead of 12345).
    ///
    /// Default: false
    pub compact_numbers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_hours: 1,
            default_format: "table".to_string(),
            default_limit: 30,
            compact_numbers: false,
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("raystat")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    ///
    /// This is useful for showing users what the default config looks like.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
