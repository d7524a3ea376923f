//! Configuration management for gpac-complete
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration files (TOML format)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Environment variable overriding the target binary
pub const ENV_BINARY: &str = "GPAC_COMPLETE_BINARY";

/// Environment variable overriding the cache file location
pub const ENV_CACHE: &str = "GPAC_COMPLETE_CACHE";

/// Environment variable overriding the log level
pub const ENV_LOG: &str = "GPAC_COMPLETE_LOG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Target tool configuration
    #[serde(default)]
    pub gpac: GpacConfig,

    /// Schema cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Target tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpacConfig {
    /// Binary name or path used for every help query
    #[serde(default = "default_binary")]
    pub binary: String,
}

/// Schema cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Path to the persisted schema file
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,

    /// Persist the schema between invocations
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Path to log file (None for stderr)
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_binary() -> String {
    "gpac".to_string()
}

fn default_cache_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cache")
        .join("gpac")
        .join("gpac_autocomplete.json")
}

fn default_cache_enabled() -> bool {
    true
}

// Anything on stderr lands in the middle of the user's prompt during
// tab completion, so only errors are shown by default.
fn default_log_level() -> LogLevel {
    LogLevel::Error
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for GpacConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            enabled: default_cache_enabled(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file, then apply environment overrides
    ///
    /// # Arguments
    /// * `path` - Explicit config path; the default location is used when `None`
    ///
    /// A missing file is not an error: defaults are used instead.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);

        let mut config = if path.is_file() {
            Self::from_file(&path)?
        } else {
            tracing::debug!("no config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Apply environment overrides using the given variable lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(binary) = lookup(ENV_BINARY).filter(|v| !v.is_empty()) {
            self.gpac.binary = binary;
        }

        if let Some(cache) = lookup(ENV_CACHE).filter(|v| !v.is_empty()) {
            self.cache.path = PathBuf::from(cache);
        }

        if let Some(level) = lookup(ENV_LOG).and_then(|v| LogLevel::parse(&v)) {
            self.logging.level = level;
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gpac-complete")
            .join("config.toml")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.gpac.binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "gpac.binary".to_string(),
                value: self.gpac.binary.clone(),
            }
            .into());
        }

        if self.cache.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cache.path".to_string(),
                value: String::new(),
            }
            .into());
        }

        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }
}

impl LogLevel {
    /// Parse a level name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gpac.binary, "gpac");
        assert!(config.cache.enabled);
        assert!(config.cache.path.ends_with(".cache/gpac/gpac_autocomplete.json"));
        assert_eq!(config.logging.level, LogLevel::Error);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [gpac]
            binary = "/opt/gpac/bin/gpac"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.gpac.binary, "/opt/gpac/bin/gpac");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[gpac\nbinary = 1").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_BINARY, "gpac-dev"),
            (ENV_CACHE, "/tmp/schema.json"),
            (ENV_LOG, "WARN"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.gpac.binary, "gpac-dev");
        assert_eq!(config.cache.path, PathBuf::from("/tmp/schema.json"));
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_unknown_log_level_ignored() {
        let mut config = Config::default();
        config.apply_env(|key| (key == ENV_LOG).then(|| "loud".to_string()));
        assert_eq!(config.logging.level, LogLevel::Error);
    }

    #[test]
    fn test_validate_rejects_empty_binary() {
        let mut config = Config::default();
        config.gpac.binary = "  ".to_string();
        assert!(config.validate().is_err());

        config.gpac.binary = "gpac".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed.gpac.binary, config.gpac.binary);
        assert_eq!(parsed.cache.path, config.cache.path);
    }
}
