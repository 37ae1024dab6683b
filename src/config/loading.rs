//! Configuration loading functionality.
//!
//! Handles locating the configuration file, creating a default one on first
//! run, and parsing either TOML or Capacitor-style JSON documents.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::Config;
use super::validation::validate_config;
use crate::common::constants::*;
use crate::common::utils::private_path;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
/// Returns an error if already set.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the custom configuration directory if one was set.
/// Returns None if using the default directory.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Get the configuration file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration using automatic path detection.
///
/// This function will create a default configuration file if none exists.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        super::builder::create_default_config(&config_path)
            .context("Failed to create default config during load")?;
    }

    load_from_path(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            private_path(&config_path)
        )
    })
}

/// Load configuration from a specific path.
///
/// `.json` files are read as Capacitor configuration documents; anything else
/// is parsed as TOML. This version does NOT create a default config if the
/// path doesn't exist.
pub fn load_from_path(path: &PathBuf) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!(
            "Configuration file not found at specified path: {}",
            private_path(path)
        );
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let config = if is_json(path) {
        from_json_str(&content)
    } else {
        from_toml_str(&content)
    }
    .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    validate_config(&config)?;

    Ok(config)
}

/// Parse a TOML document of plugin options.
pub fn from_toml_str(content: &str) -> Result<Config> {
    toml::from_str(content).context("Invalid TOML configuration")
}

/// Parse a JSON document of plugin options.
///
/// Accepts a full `capacitor.config.json` (options under
/// `plugins.LottieSplashscreen`), a bare `{"LottieSplashscreen": {...}}`
/// wrapper, or the option object itself.
pub fn from_json_str(content: &str) -> Result<Config> {
    let document: serde_json::Value =
        serde_json::from_str(content).context("Invalid JSON configuration")?;

    let section = document
        .get("plugins")
        .and_then(|plugins| plugins.get(PLUGIN_CONFIG_SECTION))
        .or_else(|| document.get(PLUGIN_CONFIG_SECTION))
        .cloned()
        .unwrap_or(document);

    if !section.is_object() {
        anyhow::bail!("{PLUGIN_CONFIG_SECTION} configuration must be a JSON object");
    }

    serde_json::from_value(section).context("Invalid LottieSplashscreen options")
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
