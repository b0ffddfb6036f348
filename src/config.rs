// Client configuration: JSON file, environment overrides, defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{debug, info};

pub const ENV_BACKEND_URL: &str = "METADICT_BACKEND_URL";
pub const ENV_STORAGE_PATH: &str = "METADICT_STORAGE_PATH";
pub const ENV_TIMEOUT_SECS: &str = "METADICT_TIMEOUT_SECS";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error types for configuration loading
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {message}")]
    Read { path: String, message: String },
    /// The configuration file is not valid JSON
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
    /// An override carried a value of the wrong type
    #[error("Invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings of the command line client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL of the Metadict REST API
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Local storage file; the platform data directory is used when unset
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            storage_path: None,
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Load the configuration file (if any) and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(|name| std::env::var(name).ok())
    }

    /// Read a JSON configuration file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if config.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "requestTimeoutSecs".to_string(),
                value: "0".to_string(),
            });
        }
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply overrides looked up by environment variable name; empty values are ignored.
    ///
    /// Timeouts must be at least one second.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_BACKEND_URL) {
            debug!("{} overrides backend URL", ENV_BACKEND_URL);
            self.backend_url = url;
        }
        if let Some(path) = lookup(ENV_STORAGE_PATH) {
            self.storage_path = Some(PathBuf::from(path));
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            let invalid = || ConfigError::InvalidValue {
                name: ENV_TIMEOUT_SECS.to_string(),
                value: timeout.clone(),
            };
            // A zero timeout would make every request fail
            self.request_timeout_secs = match timeout.trim().parse() {
                Ok(0) | Err(_) => return Err(invalid()),
                Ok(secs) => secs,
            };
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
