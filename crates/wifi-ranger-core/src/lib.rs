//! # wifi-ranger-core
//!
//! Core WiFi signal model and parsing for wifi-ranger.
//!
//! This crate provides:
//! - Data model types (Reading, Platform, Intent, DistanceEstimate, etc.)
//! - Per-platform command lookup (which OS tool to run for which intent)
//! - Reading parser with one grammar per platform
//! - Signal model (percentage to dBm, path-loss distance)
//! - Time series accumulation and strongest-network selection
//! - Settings loading
//!
//! This crate is intentionally runtime-agnostic and performs no process I/O,
//! so every piece can be tested against fixed text fixtures.

pub mod config;
pub mod model;
pub mod parser;
pub mod platform;
pub mod selector;
pub mod series;
pub mod signal;

pub use config::{ConfigError, ConfigStorage, FileConfigStorage, RangerConfig, Settings};
pub use model::*;
pub use parser::{parse, ParseError};
pub use platform::{command_for, resolve_platform, PlatformAdapter, PlatformError};
pub use selector::{strongest, SelectError};
pub use series::{Sample, TimeSeries};
pub use signal::{distance, estimate, percentage_to_dbm, ConversionError};
