//! Platform detection and command lookup.
//!
//! The adapter is a pure table from (platform, intent) to the command line
//! that answers it. It never spawns anything; running the command is the
//! caller's job, which keeps the table testable without a wireless card.

use thiserror::Error;

use crate::model::{CommandLine, Intent, Platform};

/// Location of the `airport` utility on macOS. It is not on `PATH` by default.
pub const AIRPORT_PATH: &str =
    "/System/Library/PrivateFrameworks/Apple80211.framework/Versions/Current/Resources/airport";

/// Hardware port used by `networksetup` when none is configured.
pub const DEFAULT_AIRPORT_DEVICE: &str = "en0";

/// Errors from platform detection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlatformError {
    #[error("Unsupported operating system: {0}")]
    UnsupportedPlatform(String),
}

impl Platform {
    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os_name(os: &str) -> Result<Self, PlatformError> {
        match os.to_ascii_lowercase().as_str() {
            "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "macos" | "darwin" => Ok(Platform::MacOS),
            other => Err(PlatformError::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// Detect the platform this process runs on.
pub fn resolve_platform() -> Result<Platform, PlatformError> {
    Platform::from_os_name(std::env::consts::OS)
}

/// Builds command lines for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformAdapter {
    platform: Platform,
    /// macOS hardware port passed to `networksetup`.
    airport_device: String,
}

impl PlatformAdapter {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            airport_device: DEFAULT_AIRPORT_DEVICE.to_string(),
        }
    }

    /// Use a different macOS hardware port for connect commands.
    pub fn with_airport_device(mut self, device: &str) -> Self {
        self.airport_device = device.to_string();
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The command line answering `intent` on this platform.
    pub fn command_for(&self, intent: &Intent) -> CommandLine {
        match (self.platform, intent) {
            (Platform::Windows, Intent::CurrentStatus) => {
                CommandLine::new("netsh", ["wlan", "show", "interfaces"])
            }
            (Platform::Windows, Intent::ScanAll) => {
                CommandLine::new("netsh", ["wlan", "show", "networks", "mode=bssid"])
            }
            (Platform::Windows, Intent::Connect(ssid)) => CommandLine::new(
                "netsh",
                [
                    "wlan".to_string(),
                    "connect".to_string(),
                    format!("name={}", ssid),
                ],
            ),

            (Platform::Linux, Intent::CurrentStatus) => {
                CommandLine::new("iwconfig", Vec::<String>::new())
            }
            (Platform::Linux, Intent::ScanAll) => {
                CommandLine::new("nmcli", ["-f", "SSID,SIGNAL", "dev", "wifi"])
            }
            (Platform::Linux, Intent::Connect(ssid)) => {
                CommandLine::new("nmcli", ["dev", "wifi", "connect", ssid.as_str()])
            }

            (Platform::MacOS, Intent::CurrentStatus) => CommandLine::new(AIRPORT_PATH, ["-I"]),
            (Platform::MacOS, Intent::ScanAll) => CommandLine::new(AIRPORT_PATH, ["-s"]),
            (Platform::MacOS, Intent::Connect(ssid)) => CommandLine::new(
                "networksetup",
                [
                    "-setairportnetwork",
                    self.airport_device.as_str(),
                    ssid.as_str(),
                ],
            ),
        }
    }
}

/// Shorthand for [`PlatformAdapter::command_for`] with default settings.
pub fn command_for(platform: Platform, intent: &Intent) -> CommandLine {
    PlatformAdapter::new(platform).command_for(intent)
}
