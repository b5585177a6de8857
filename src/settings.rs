//! Configuration for the queue keyspace.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

/// Keyspace configuration. The scheme has exactly one knob: the prefix the
/// storage client prepends to every key it writes.
#[derive(Debug, Deserialize, Clone)]
pub struct KeyspaceConfig {
    /// Global key prefix. Built keys do not include it; scan patterns do.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    "runqueue:".to_string()
}

impl Default for KeyspaceConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

/// Errors from loading keyspace configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl KeyspaceConfig {
    /// Load configuration from a TOML file, falling back to defaults when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let data = fs::read_to_string(path)?;
                let config: Self = toml::from_str(&data)?;
                debug!(path = %path.display(), prefix = %config.prefix, "loaded keyspace config");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}
