//! # wifi-ranger-monitor
//!
//! Drives the core engine against the real OS tools.
//!
//! This crate provides:
//! - A command runner with a bounded wait per invocation
//! - A probe that turns a query into parsed readings
//! - The acquisition loop (polling, cancellation, time series)
//! - Sink traits for console output and live charts
//! - One-shot network discovery and connect-to-strongest flows
//!
//! Everything runs on a single task. Cancellation is observed between cycles
//! through a `tokio::sync::watch` flag.

pub mod acquisition;
pub mod connect;
pub mod probe;
pub mod runner;
pub mod sink;

pub use acquisition::{AcquisitionLoop, LoopState, LoopSummary};
pub use connect::{connect_strongest, discover, ConnectAttempt, ConnectReport, NetworkError};
pub use probe::{Probe, ProbeError};
pub use runner::{CommandOutput, CommandRunner, RunnerError, SystemRunner};
pub use sink::{ChartSink, ConsoleSink, Output};
pub use wifi_ranger_core::{DistanceEstimate, Query, RangerConfig, TimeSeries};
