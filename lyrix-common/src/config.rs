//! TOML bootstrap configuration
//!
//! Settings sources, highest priority first:
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Built-in defaults
//!
//! This module owns tier 3 only. A missing TOML file is not an error: the
//! harvester starts with defaults and logs where it looked.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file name searched for in the platform config directory
pub const CONFIG_FILE_NAME: &str = "lyrix.toml";

/// Bootstrap configuration loaded from TOML
///
/// Every field is optional so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Artist whose catalog is harvested
    #[serde(default)]
    pub artist: Option<String>,

    /// Corpus text file (append-only)
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,

    /// Progress snapshot file (JSON array of ids)
    #[serde(default)]
    pub progress_path: Option<PathBuf>,

    /// Maximum number of catalog items to walk
    #[serde(default)]
    pub max_songs: Option<usize>,

    /// Catalog page size
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Song listing order: "popularity" or "title"
    #[serde(default)]
    pub sort: Option<String>,

    /// Fixed pause after each processed item, in milliseconds
    #[serde(default)]
    pub item_delay_ms: Option<u64>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default config file location (`~/.config/lyrix/lyrix.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lyrix").join(CONFIG_FILE_NAME))
}

/// Load TOML configuration from `path`
///
/// Returns defaults when the file does not exist. A file that exists but
/// cannot be read or parsed is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load configuration from an explicit path, or the default location if none
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    match explicit {
        Some(path) => load_toml_config(path),
        None => match default_config_path() {
            Some(path) => load_toml_config(&path),
            None => Ok(TomlConfig::default()),
        },
    }
}
