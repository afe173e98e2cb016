//! Configuration management for CloudStore.
//!
//! This module provides TOML-based configuration file loading and saving.
//! The default configuration path is `~/.config/cloudstore/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the durable storage entry that holds the file snapshot.
pub const DEFAULT_ENTRY_NAME: &str = "file-storage";

/// Cosmetic storage limit shown by the stats panel (5 GiB).
pub const DEFAULT_STORAGE_LIMIT_BYTES: u64 = 5 * 1024 * 1024 * 1024;

/// Simulated network latency before an upload is committed.
pub const DEFAULT_COMMIT_DELAY_MS: u64 = 1000;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("entry_name must be non-empty and use only [A-Za-z0-9_-], got {0:?}")]
    InvalidEntryName(String),

    #[error("entry_name {0:?} is reserved for the login session")]
    ReservedEntryName(String),

    #[error("commit_delay_ms must be at most 60000, got {0}")]
    InvalidCommitDelay(u64),

    #[error("storage_limit_bytes must be greater than 0, got {0}")]
    InvalidStorageLimit(u64),

    #[error("log_level must be one of: trace, debug, info, warn, error; got {0}")]
    InvalidLogLevel(String),
}

/// Valid log level values for tracing configuration.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for CloudStore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Durable storage settings.
    pub storage: StorageConfig,

    /// Upload collector settings.
    pub upload: UploadConfig,

    /// Presentation settings.
    pub display: DisplayConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Durable storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the durable storage entries.
    pub data_dir: PathBuf,

    /// Entry name of the file snapshot.
    pub entry_name: String,
}

/// Upload collector configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UploadConfig {
    /// Simulated latency before committing drafts, in milliseconds.
    pub commit_delay_ms: u64,
}

/// Presentation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Limit drawn by the storage bar. Never enforced.
    pub storage_limit_bytes: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            entry_name: DEFAULT_ENTRY_NAME.to_string(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            commit_delay_ms: DEFAULT_COMMIT_DELAY_MS,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            storage_limit_bytes: DEFAULT_STORAGE_LIMIT_BYTES,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cloudstore")
        .join("config.toml")
}

/// Returns the default data directory path.
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cloudstore")
}

impl Config {
    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables take precedence over config file values.
    /// Supported variables:
    /// - CLOUDSTORE_DATA_DIR: Override the storage directory
    /// - CLOUDSTORE_LOG_LEVEL: Override log level (trace, debug, info, warn, error)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("CLOUDSTORE_DATA_DIR") {
            if !dir.is_empty() {
                tracing::info!("Overriding data_dir from environment: {}", dir);
                self.storage.data_dir = PathBuf::from(dir);
            }
        }

        if let Ok(level) = std::env::var("CLOUDSTORE_LOG_LEVEL") {
            if !level.is_empty() {
                tracing::info!("Overriding log_level from environment: {}", level);
                self.logging.log_level = level;
            }
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.storage.entry_name;
        if !crate::storage::is_valid_key(name) {
            return Err(ConfigError::InvalidEntryName(name.clone()));
        }
        if name == crate::auth::AUTH_ENTRY_NAME {
            return Err(ConfigError::ReservedEntryName(name.clone()));
        }

        if self.upload.commit_delay_ms > 60_000 {
            return Err(ConfigError::InvalidCommitDelay(self.upload.commit_delay_ms));
        }

        if self.display.storage_limit_bytes == 0 {
            return Err(ConfigError::InvalidStorageLimit(
                self.display.storage_limit_bytes,
            ));
        }

        let level = self.logging.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.logging.log_level.clone()));
        }

        Ok(())
    }

    /// Load configuration from a file.
    ///
    /// If the file does not exist, returns the default configuration.
    /// If the file exists but is invalid TOML, returns an error with
    /// a helpful message.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| anyhow::anyhow!("Invalid TOML configuration: {}", format_toml_error(&e)))
    }

    /// Save configuration to a file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }
}

/// Format a TOML deserialization error for user-friendly display.
fn format_toml_error(error: &toml::de::Error) -> String {
    let mut msg = error.message().to_string();

    if let Some(span) = error.span() {
        msg.push_str(&format!(" (at position {}..{})", span.start, span.end));
    }

    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.entry_name, "file-storage");
        assert!(config.storage.data_dir.to_string_lossy().contains("cloudstore"));
        assert_eq!(config.upload.commit_delay_ms, 1000);
        assert_eq!(config.display.storage_limit_bytes, 5 * 1024 * 1024 * 1024);
        assert_eq!(config.logging.log_level, "info");
    }

    #[test]
    fn test_from_toml_empty() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_toml_partial() {
        let toml = r#"
[upload]
commit_delay_ms = 0

[logging]
log_level = "debug"
"#;
        let config = Config::from_toml(toml).unwrap();

        assert_eq!(config.upload.commit_delay_ms, 0);
        assert_eq!(config.logging.log_level, "debug");
        assert_eq!(config.storage.entry_name, DEFAULT_ENTRY_NAME);
    }

    #[test]
    fn test_from_toml_full() {
        let toml = r#"
[storage]
data_dir = "/custom/data"
entry_name = "my-files"

[upload]
commit_delay_ms = 250

[display]
storage_limit_bytes = 1073741824

[logging]
log_level = "trace"
"#;
        let config = Config::from_toml(toml).unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.storage.entry_name, "my-files");
        assert_eq!(config.upload.commit_delay_ms, 250);
        assert_eq!(config.display.storage_limit_bytes, 1073741824);
        assert_eq!(config.logging.log_level, "trace");
    }

    #[test]
    fn test_from_toml_invalid_syntax() {
        let toml = r#"
[storage
entry_name = "x"
"#;
        let err = Config::from_toml(toml).unwrap_err().to_string();
        assert!(err.contains("Invalid TOML"));
    }

    #[test]
    fn test_from_toml_wrong_type() {
        let toml = r#"
[upload]
commit_delay_ms = "soon"
"#;
        assert!(Config::from_toml(toml).is_err());
    }

    #[test]
    fn test_roundtrip_custom() {
        let mut original = Config::default();
        original.storage.entry_name = "other".to_string();
        original.upload.commit_delay_ms = 5;
        original.logging.log_level = "warn".to_string();

        let loaded = Config::from_toml(&original.to_toml().unwrap()).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_to_toml_sections() {
        let toml = Config::default().to_toml().unwrap();
        assert!(toml.contains("[storage]"));
        assert!(toml.contains("[upload]"));
        assert!(toml.contains("[display]"));
        assert!(toml.contains("[logging]"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.upload.commit_delay_ms = 42;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.upload.commit_delay_ms, 42);
    }

    #[test]
    fn test_load_nonexistent_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_entry_name() {
        let mut config = Config::default();
        config.storage.entry_name = "../escape".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidEntryName("../escape".to_string()))
        );

        config.storage.entry_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_entry_name_reserved() {
        let mut config = Config::default();
        config.storage.entry_name = crate::auth::AUTH_ENTRY_NAME.to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::ReservedEntryName("auth-user".to_string()))
        );
    }

    #[test]
    fn test_validate_commit_delay() {
        let mut config = Config::default();
        config.upload.commit_delay_ms = 60_001;
        assert_eq!(config.validate(), Err(ConfigError::InvalidCommitDelay(60_001)));

        config.upload.commit_delay_ms = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_storage_limit() {
        let mut config = Config::default();
        config.display.storage_limit_bytes = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidStorageLimit(0)));
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = Config::default();
        config.logging.log_level = "WARN".to_string();
        assert!(config.validate().is_ok());

        config.logging.log_level = "loud".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidLogLevel("loud".to_string()))
        );
    }

    #[test]
    #[serial]
    fn test_env_override_data_dir() {
        std::env::set_var("CLOUDSTORE_DATA_DIR", "/tmp/cloudstore-test");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/cloudstore-test"));

        std::env::remove_var("CLOUDSTORE_DATA_DIR");
    }

    #[test]
    #[serial]
    fn test_env_override_log_level() {
        std::env::remove_var("CLOUDSTORE_DATA_DIR");
        std::env::set_var("CLOUDSTORE_LOG_LEVEL", "debug");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.logging.log_level, "debug");

        std::env::remove_var("CLOUDSTORE_LOG_LEVEL");
    }

    #[test]
    #[serial]
    fn test_env_override_empty_does_not_override() {
        std::env::set_var("CLOUDSTORE_DATA_DIR", "");
        std::env::set_var("CLOUDSTORE_LOG_LEVEL", "");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config, Config::default());

        std::env::remove_var("CLOUDSTORE_DATA_DIR");
        std::env::remove_var("CLOUDSTORE_LOG_LEVEL");
    }
}
