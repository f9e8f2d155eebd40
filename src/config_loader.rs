//! Configuration file lookup and loading.
//!
//! Loading happens before the logger exists, because the file may set the
//! log level, so nothing here logs. The binary reports what was loaded once
//! logging is up.

use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "lansim.yaml";

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    // Open the configuration file
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file '{}'", config_path.display()))?;

    // Parse the YAML content
    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse config file '{}'", config_path.display()))?;

    // Validate the configuration
    config.validate()?;

    Ok(config)
}

/// Pick the config file to read: the explicit one, else `lansim.yaml` in
/// `dir` if it exists, else none
pub fn resolve_config_path(explicit: Option<&Path>, dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let default_path = dir.join(DEFAULT_CONFIG_FILE);
    default_path.exists().then_some(default_path)
}

/// Load the resolved config file, or defaults when there is none
pub fn load_optional(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}
