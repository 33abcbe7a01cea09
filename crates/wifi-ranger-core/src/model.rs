//! wifi-ranger data model types.
//!
//! These types describe what flows between the pieces of the engine:
//! - Readings extracted from OS tool output
//! - The platform and intent that select a command line
//! - Signal model parameters and the resulting distance estimates

use serde::{Deserialize, Serialize};

use crate::signal::{percentage_to_dbm, ConversionError};

/// Unit of a raw signal value as reported by the OS tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalUnit {
    /// Signal quality, 0-100.
    Percentage,
    /// Received power in dBm, typically negative.
    #[serde(rename = "dBm")]
    DecibelMilliwatts,
}

impl SignalUnit {
    /// Short suffix for display.
    pub fn suffix(&self) -> &'static str {
        match self {
            SignalUnit::Percentage => "%",
            SignalUnit::DecibelMilliwatts => " dBm",
        }
    }
}

/// A single (SSID, signal) pair extracted from command output.
///
/// Multiple networks may share an SSID on different channels; readings are
/// never deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Network name, trimmed. May be empty for hidden networks.
    pub ssid: String,

    /// Signal value in `unit`.
    pub raw_signal: f64,

    /// Unit of `raw_signal`.
    pub unit: SignalUnit,
}

impl Reading {
    pub fn new(ssid: impl Into<String>, raw_signal: f64, unit: SignalUnit) -> Self {
        Self {
            ssid: ssid.into(),
            raw_signal,
            unit,
        }
    }

    /// The signal normalized to dBm.
    pub fn rssi_dbm(&self) -> Result<f64, ConversionError> {
        match self.unit {
            SignalUnit::Percentage => percentage_to_dbm(self.raw_signal),
            SignalUnit::DecibelMilliwatts if self.raw_signal.is_finite() => Ok(self.raw_signal),
            SignalUnit::DecibelMilliwatts => Err(ConversionError::NonFiniteInput(self.raw_signal)),
        }
    }
}

/// Operating system family. Determines both command set and parser grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    Linux,
    MacOS,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Windows => write!(f, "Windows"),
            Platform::Linux => write!(f, "Linux"),
            Platform::MacOS => write!(f, "macOS"),
        }
    }
}

/// What a poll cycle asks the OS about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Query {
    /// The access point the interface is associated with.
    CurrentStatus,
    /// Every visible network.
    ScanAll,
}

/// Anything the adapter knows how to build a command line for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    CurrentStatus,
    ScanAll,
    Connect(String),
}

impl From<Query> for Intent {
    fn from(query: Query) -> Self {
        match query {
            Query::CurrentStatus => Intent::CurrentStatus,
            Query::ScanAll => Intent::ScanAll,
        }
    }
}

/// A program and its argument vector. Never interpreted by a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Path-loss model constants. Supplied by configuration, never learned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalModelParams {
    /// Expected RSSI at 1 meter, in dBm.
    pub reference_rssi_dbm: f64,

    /// 2 for open air, 3-4 indoors or obstructed.
    pub path_loss_exponent: f64,
}

impl Default for SignalModelParams {
    fn default() -> Self {
        Self {
            reference_rssi_dbm: -69.0,
            path_loss_exponent: 2.0,
        }
    }
}

/// A reading run through the signal model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceEstimate {
    pub ssid: String,

    /// The raw signal value, in `unit`.
    pub signal: f64,

    pub unit: SignalUnit,

    /// The signal normalized to dBm.
    pub rssi_dbm: f64,

    /// `None` when the distance model could not produce a finite value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
}
