// Configuration loading functionality
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::types::{AppConfig, ConfigError};
use log::{debug, warn};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "PSTATECTL_CONFIG";

/// Candidate configuration files, most specific first.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut config_paths: Vec<PathBuf> = Vec::new();

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        config_paths.push(PathBuf::from(path));
    }

    // User-specific path
    if let Some(config_dir) = dirs::config_dir() {
        config_paths.push(config_dir.join("pstatectl/config.toml"));
    } else {
        warn!("Could not determine config directory. User-specific config will not be loaded.");
    }

    // System-wide paths
    config_paths.push(PathBuf::from("/etc/xdg/pstatectl/config.toml"));
    config_paths.push(PathBuf::from("/etc/pstatectl.toml"));

    config_paths
}

/// Load configuration from `specific_path`, or search the standard locations.
///
/// An explicit path that cannot be read or parsed is an error. Files found
/// while searching are skipped with a warning when broken, and defaults are
/// used if none of them loads.
pub fn load_config_from_path(specific_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = specific_path {
        return load_and_parse_config(path);
    }

    for path in config_search_paths() {
        if !path.exists() {
            continue;
        }
        debug!("Attempting to load config from: {}", path.display());
        match load_and_parse_config(&path) {
            Ok(config) => return Ok(config),
            Err(e) => warn!("Error loading config file {}: {e}", path.display()),
        }
    }

    debug!("No configuration file found or all failed to parse. Using default configuration.");
    Ok(AppConfig::default())
}

fn load_and_parse_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
