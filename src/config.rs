//! Model configuration
//!
//! Loaded from a JSON file. Every field is optional:
//!
//! ```json
//! {
//!   "strict_chunk_count": false,
//!   "max_path_len": 1023,
//!   "attribute_prefix": "user.",
//!   "log_level": "warn"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::content::MAX_PATH_LEN;
use crate::observability::{log_event, Event, Logger, Severity};

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid configuration: {0}")]
pub struct ConfigError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Return a declared/actual chunk count mismatch as an error instead of an advisory
    pub strict_chunk_count: bool,
    /// Longest content path accepted, at most `MAX_PATH_LEN`
    pub max_path_len: usize,
    /// Namespace prefix of extended attribute keys
    pub attribute_prefix: String,
    /// Minimum log severity: trace, info, warn, error or fatal
    pub log_level: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            strict_chunk_count: false,
            max_path_len: MAX_PATH_LEN,
            attribute_prefix: "user.".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl ModelConfig {
    /// Strict variant: count mismatches are errors.
    pub fn strict() -> Self {
        Self {
            strict_chunk_count: true,
            ..Self::default()
        }
    }

    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("Failed to read config: {}", e)))?;
        let config = Self::from_json(&content)?;
        log_event(
            Severity::Info,
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ModelConfig = serde_json::from_str(json)
            .map_err(|e| ConfigError(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_path_len == 0 {
            return Err(ConfigError("max_path_len must be > 0".to_string()));
        }
        if self.max_path_len > MAX_PATH_LEN {
            return Err(ConfigError(format!(
                "max_path_len {} exceeds hard limit {}",
                self.max_path_len, MAX_PATH_LEN
            )));
        }
        self.severity()?;
        Ok(())
    }

    pub fn severity(&self) -> Result<Severity, ConfigError> {
        self.log_level.parse::<Severity>().map_err(ConfigError)
    }

    /// Applies the configured log level to the process-wide logger.
    pub fn apply_logging(&self) -> Result<(), ConfigError> {
        Logger::set_min_severity(self.severity()?);
        Ok(())
    }
}
