use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::orchestrator::DEFAULT_MAX_PACKETS;

/// Upper bound for `max_packets`, keeps send reports a sane size
pub const PACKET_LIMIT_CEILING: usize = 10_000;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Simulator configuration, read from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding network.json and saved_networks.json
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Largest packet count a single send may request
    #[serde(default = "default_max_packets")]
    pub max_packets: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".lansim")
}

fn default_max_packets() -> usize {
    DEFAULT_MAX_PACKETS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            max_packets: default_max_packets(),
            log_level: None,
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.state_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidStateDir("state_dir cannot be empty".to_string()));
        }

        if self.max_packets == 0 || self.max_packets > PACKET_LIMIT_CEILING {
            return Err(ConfigError::InvalidMaxPackets(format!(
                "max_packets must be between 1 and {}, got {}",
                PACKET_LIMIT_CEILING, self.max_packets
            )));
        }

        if let Some(level) = &self.log_level {
            if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(ConfigError::InvalidLogLevel(format!(
                    "'{}' is not one of {}",
                    level,
                    LOG_LEVELS.join(", ")
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid state directory: {0}")]
    InvalidStateDir(String),
    #[error("Invalid packet limit: {0}")]
    InvalidMaxPackets(String),
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
