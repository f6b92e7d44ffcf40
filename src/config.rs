//! Configuration loading and management.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// WHOX query type reserved for replies this tracker consumes.
pub const DEFAULT_WHOX_QUERY_TYPE: &str = "735";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for this config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tracker configuration.
///
/// ```toml
/// name = "libera"
/// whox_query_type = "735"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Label for the connection, used in log output.
    pub name: String,
    /// Query type token sent with `WHO` and required on `RPL_WHOSPCRPL`.
    pub whox_query_type: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            name: "irc".to_string(),
            whox_query_type: DEFAULT_WHOX_QUERY_TYPE.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Create a config with the given connection name and default settings.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TrackerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // WHOX tokens are one to three digits
        let token = &self.whox_query_type;
        if token.is_empty() || token.len() > 3 || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::Invalid(format!(
                "whox_query_type must be 1-3 digits, got {:?}",
                token
            )));
        }
        Ok(())
    }
}
