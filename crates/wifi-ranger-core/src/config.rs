//! Settings storage.
//!
//! Settings live in a JSON file (default `~/.wifi-ranger/settings.json`,
//! overridable with `WIFI_RANGER_CONFIG`). Every field is optional; anything
//! missing falls back to the built-in default when the settings are resolved
//! into a [`RangerConfig`].
//!
//! ```json
//! { "referenceRssiDbm": -65, "pathLossExponent": 3, "scanIntervalMs": 500 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::SignalModelParams;
use crate::platform::DEFAULT_AIRPORT_DEVICE;

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV_VAR: &str = "WIFI_RANGER_CONFIG";

/// Polling interval when monitoring the connected access point.
pub const DEFAULT_MONITOR_INTERVAL_MS: u64 = 2000;

/// Polling interval when scanning all networks for a live chart.
pub const DEFAULT_SCAN_INTERVAL_MS: u64 = 1000;

/// Upper bound on a single OS command invocation.
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 10_000;

/// Errors that can occur during configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested configuration was not found.
    NotFound(String),
    /// Failed to read configuration.
    ReadError(String),
    /// Configuration data is invalid.
    InvalidData(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Configuration not found: {}", key),
            ConfigError::ReadError(msg) => write!(f, "Read error: {}", msg),
            ConfigError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Abstract settings storage.
///
/// `FileConfigStorage` reads from disk; tests substitute an in-memory source.
pub trait ConfigStorage {
    /// Load settings. Returns [`ConfigError::NotFound`] when none are stored.
    fn load_settings(&self) -> Result<Settings, ConfigError>;
}

/// Settings as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// RSSI expected at 1 meter, in dBm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_rssi_dbm: Option<f64>,

    /// Path-loss exponent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_loss_exponent: Option<f64>,

    /// Poll interval for the connected access point, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_interval_ms: Option<u64>,

    /// Poll interval for all-network scans, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_interval_ms: Option<u64>,

    /// Timeout for each OS command, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout_ms: Option<u64>,

    /// macOS hardware port for `networksetup`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airport_device: Option<String>,
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RangerConfig {
    pub model: SignalModelParams,
    pub monitor_interval: Duration,
    pub scan_interval: Duration,
    pub command_timeout: Duration,
    pub airport_device: String,
}

impl Default for RangerConfig {
    fn default() -> Self {
        Self {
            model: SignalModelParams::default(),
            monitor_interval: Duration::from_millis(DEFAULT_MONITOR_INTERVAL_MS),
            scan_interval: Duration::from_millis(DEFAULT_SCAN_INTERVAL_MS),
            command_timeout: Duration::from_millis(DEFAULT_COMMAND_TIMEOUT_MS),
            airport_device: DEFAULT_AIRPORT_DEVICE.to_string(),
        }
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidData(e.to_string()))
    }

    /// Load from `storage`, treating missing settings as all defaults.
    pub fn load_or_default<S: ConfigStorage>(storage: &S) -> Result<Self, ConfigError> {
        match storage.load_settings() {
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply defaults and validate.
    pub fn resolve(&self) -> Result<RangerConfig, ConfigError> {
        let defaults = RangerConfig::default();

        let reference_rssi_dbm = self
            .reference_rssi_dbm
            .unwrap_or(defaults.model.reference_rssi_dbm);
        if !reference_rssi_dbm.is_finite() {
            return Err(ConfigError::InvalidData(
                "referenceRssiDbm must be a finite number".to_string(),
            ));
        }

        let path_loss_exponent = self
            .path_loss_exponent
            .unwrap_or(defaults.model.path_loss_exponent);
        if !path_loss_exponent.is_finite() || path_loss_exponent == 0.0 {
            return Err(ConfigError::InvalidData(
                "pathLossExponent must be a finite, non-zero number".to_string(),
            ));
        }

        Ok(RangerConfig {
            model: SignalModelParams {
                reference_rssi_dbm,
                path_loss_exponent,
            },
            monitor_interval: positive_millis(
                "monitorIntervalMs",
                self.monitor_interval_ms,
                defaults.monitor_interval,
            )?,
            scan_interval: positive_millis(
                "scanIntervalMs",
                self.scan_interval_ms,
                defaults.scan_interval,
            )?,
            command_timeout: positive_millis(
                "commandTimeoutMs",
                self.command_timeout_ms,
                defaults.command_timeout,
            )?,
            airport_device: self
                .airport_device
                .clone()
                .unwrap_or(defaults.airport_device),
        })
    }
}

fn positive_millis(
    name: &str,
    value: Option<u64>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        None => Ok(default),
        Some(0) => Err(ConfigError::InvalidData(format!(
            "{} must be greater than zero",
            name
        ))),
        Some(ms) => Ok(Duration::from_millis(ms)),
    }
}

/// JSON settings file on disk.
#[derive(Debug, Clone)]
pub struct FileConfigStorage {
    path: PathBuf,
}

impl FileConfigStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$WIFI_RANGER_CONFIG`, else `settings.json` under `~/.wifi-ranger/`.
    pub fn default_location() -> Self {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::new(path);
        }
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_default();
        Self::new(home.join(".wifi-ranger").join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStorage for FileConfigStorage {
    fn load_settings(&self) -> Result<Settings, ConfigError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(self.path.display().to_string()))
            }
            Err(e) => {
                return Err(ConfigError::ReadError(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        Settings::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory storage for testing.
    struct MemoryConfigStorage {
        json: Option<String>,
    }

    impl ConfigStorage for MemoryConfigStorage {
        fn load_settings(&self) -> Result<Settings, ConfigError> {
            let json = self
                .json
                .as_ref()
                .ok_or_else(|| ConfigError::NotFound("settings".to_string()))?;
            Settings::from_json_str(json)
        }
    }

    #[test]
    fn test_defaults() {
        let config = Settings::default().resolve().unwrap();
        assert_eq!(config, RangerConfig::default());
        assert_eq!(config.model.reference_rssi_dbm, -69.0);
        assert_eq!(config.model.path_loss_exponent, 2.0);
        assert!(config.scan_interval < config.monitor_interval);
    }

    #[test]
    fn test_missing_settings_fall_back() {
        let storage = MemoryConfigStorage { json: None };
        let settings = Settings::load_or_default(&storage).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_settings() {
        let storage = MemoryConfigStorage {
            json: Some(r#"{"pathLossExponent": 3.5, "scanIntervalMs": 500}"#.to_string()),
        };
        let config = Settings::load_or_default(&storage)
            .unwrap()
            .resolve()
            .unwrap();

        assert_eq!(config.model.path_loss_exponent, 3.5);
        assert_eq!(config.model.reference_rssi_dbm, -69.0);
        assert_eq!(config.scan_interval, Duration::from_millis(500));
        assert_eq!(config.airport_device, "en0");
    }

    #[test]
    fn test_zero_exponent_rejected() {
        let settings = Settings {
            path_loss_exponent: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            settings.resolve(),
            Err(ConfigError::InvalidData(_))
        ));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let settings = Settings {
            monitor_interval_ms: Some(0),
            ..Default::default()
        };
        let err = settings.resolve().unwrap_err();
        assert!(err.to_string().contains("monitorIntervalMs"));
    }

    #[test]
    fn test_malformed_json() {
        let storage = MemoryConfigStorage {
            json: Some("{ not json".to_string()),
        };
        assert!(matches!(
            Settings::load_or_default(&storage),
            Err(ConfigError::InvalidData(_))
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let storage = FileConfigStorage::new("/nonexistent/wifi-ranger/settings.json");
        assert!(matches!(
            storage.load_settings(),
            Err(ConfigError::NotFound(_))
        ));
    }
}
