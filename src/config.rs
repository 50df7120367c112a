//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::device::{SerialSettings, DEFAULT_BAUD_RATE};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Serial device configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeviceConfig {
    #[serde(default = "default_device_path")]
    pub path: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Give up on a silent device after this many milliseconds (0 = wait forever)
    #[serde(default)]
    pub read_timeout_ms: u64,
}

fn default_device_path() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: default_device_path(),
            baud_rate: default_baud_rate(),
            read_timeout_ms: 0,
        }
    }
}

impl DeviceConfig {
    /// Serial settings for this device, optionally at another path
    pub fn serial_settings(&self, path_override: Option<&str>) -> SerialSettings {
        let timeout =
            (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms));
        SerialSettings::new(path_override.unwrap_or(&self.path))
            .baud_rate(self.baud_rate)
            .read_timeout(timeout)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Default output format: csv, json or text
    #[serde(default = "default_output_format")]
    pub format: String,
}

fn default_output_format() -> String {
    "csv".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// A broken config file is skipped with a warning.
    pub fn load_default() -> Self {
        let (config, skipped) = Self::load_default_reporting();
        for e in &skipped {
            tracing::warn!("{}", e);
        }
        config
    }

    /// Like [`load_default`](Self::load_default), returning the skipped files
    ///
    /// For callers that load the config before logging is set up.
    pub fn load_default_reporting() -> (Self, Vec<ConfigError>) {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("bm65").join("config.toml")),
            Some(PathBuf::from("./bm65.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// First loadable file among `paths`, else environment only
    fn load_first(paths: &[PathBuf]) -> (Self, Vec<ConfigError>) {
        let mut skipped = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    tracing::debug!("Loaded config from {:?}", path);
                    return (config, skipped);
                }
                Err(e) => skipped.push(e),
            }
        }

        (Self::from_env(), skipped)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Device overrides
        if let Some(path) = var("BM65_DEVICE") {
            self.device.path = path;
        }
        if let Some(baud) = var("BM65_BAUD_RATE") {
            if let Ok(b) = baud.parse() {
                self.device.baud_rate = b;
            }
        }
        if let Some(timeout) = var("BM65_READ_TIMEOUT_MS") {
            if let Ok(t) = timeout.parse() {
                self.device.read_timeout_ms = t;
            }
        }

        // Logging overrides
        if let Some(level) = var("BM65_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("BM65_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# bm65 Configuration
#
# Environment variables override these settings:
# - BM65_DEVICE
# - BM65_BAUD_RATE
# - BM65_READ_TIMEOUT_MS
# - BM65_LOG_LEVEL
# - BM65_LOG_FORMAT

[device]
# Serial device the monitor cable is attached to
path = "/dev/ttyUSB0"

# Line speed of the monitor
baud_rate = 4800

# Give up when the monitor stops answering (ms, 0 = wait forever)
read_timeout_ms = 0

[output]
# Default output format: csv, json or text
format = "csv"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_template_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [device]
            path = "/dev/ttyS1"
            read_timeout_ms = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.device.path, "/dev/ttyS1");
        assert_eq!(config.device.baud_rate, 4800);
        assert_eq!(config.output.format, "csv");
        assert_eq!(config.logging.level, "info");

        let settings = config.device.serial_settings(None);
        assert_eq!(settings.read_timeout, Some(Duration::from_millis(5000)));
    }

    #[test]
    fn test_serial_settings_override() {
        let config = Config::default();

        let settings = config.device.serial_settings(Some("/dev/ttyUSB1"));
        assert_eq!(settings.path, "/dev/ttyUSB1");
        assert!(settings.read_timeout.is_none());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("BM65_DEVICE", "/dev/ttyACM0"),
            ("BM65_BAUD_RATE", "not a number"),
            ("BM65_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.device.path, "/dev/ttyACM0");
        assert_eq!(config.device.baud_rate, 4800);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/bm65.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_first_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("bm65.toml");
        std::fs::write(&broken, "[device]\nbaud_rate = \"fast\"\n").unwrap();
        std::fs::write(&good, "[output]\nformat = \"json\"\n").unwrap();

        let missing = dir.path().join("missing.toml");
        let (config, skipped) = Config::load_first(&[missing, broken.clone(), good]);
        assert_eq!(config.output.format, "json");
        assert_eq!(skipped.len(), 1);
        assert!(matches!(&skipped[0], ConfigError::Parse { path, .. } if *path == broken));

        let (config, skipped) = Config::load_first(&[broken]);
        assert_eq!(config.output.format, "csv");
        assert_eq!(skipped.len(), 1);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bm65.toml");
        std::fs::write(&path, "[device]\nbaud_rate = \"fast\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
