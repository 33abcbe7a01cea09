//! One-shot network discovery and connect-to-strongest.
//!
//! Both flows start with a scan. An empty scan surfaces as
//! [`NetworkError::EmptyNetworkList`] and aborts only the current invocation.

use thiserror::Error;
use tracing::{info, warn};

use wifi_ranger_core::{
    estimate, strongest, DistanceEstimate, Intent, ParseError, Query, Reading, SelectError,
    SignalModelParams, SignalUnit,
};

use crate::probe::{Probe, ProbeError};
use crate::runner::{CommandRunner, RunnerError};

/// Errors from discovery and connect flows.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("No WiFi networks found")]
    EmptyNetworkList,

    #[error(transparent)]
    Probe(ProbeError),

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

impl From<SelectError> for NetworkError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::EmptyNetworkList => NetworkError::EmptyNetworkList,
        }
    }
}

/// The outcome of issuing a connect command.
///
/// The exit status is reported as-is; whether the interface actually joined
/// the network is not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectAttempt {
    pub ssid: String,
    pub signal: f64,
    pub unit: SignalUnit,
    pub exit_code: Option<i32>,
}

impl ConnectAttempt {
    /// The connect command exited with status 0.
    pub fn exited_cleanly(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Everything a connect-to-strongest run saw and did.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectReport {
    /// Estimates for every network in the scan.
    pub networks: Vec<DistanceEstimate>,
    pub attempt: ConnectAttempt,
}

async fn scan<R: CommandRunner>(probe: &Probe<R>) -> Result<Vec<Reading>, NetworkError> {
    match probe.read(Query::ScanAll).await {
        Ok(readings) => Ok(readings),
        Err(ProbeError::Parse(ParseError::NoDataFound { .. })) => {
            Err(NetworkError::EmptyNetworkList)
        }
        Err(e) => Err(NetworkError::Probe(e)),
    }
}

fn estimates(readings: &[Reading], params: &SignalModelParams) -> Vec<DistanceEstimate> {
    readings
        .iter()
        .filter_map(|reading| estimate(reading, params).ok())
        .collect()
}

/// Scan once and estimate the distance to every visible network.
pub async fn discover<R: CommandRunner>(
    probe: &Probe<R>,
    params: &SignalModelParams,
) -> Result<Vec<DistanceEstimate>, NetworkError> {
    let readings = scan(probe).await?;
    let networks = estimates(&readings, params);
    if networks.is_empty() {
        return Err(NetworkError::EmptyNetworkList);
    }
    Ok(networks)
}

/// Scan, pick the strongest network and ask the OS to join it.
pub async fn connect_strongest<R: CommandRunner>(
    probe: &Probe<R>,
    params: &SignalModelParams,
) -> Result<ConnectReport, NetworkError> {
    let readings = scan(probe).await?;
    let networks = estimates(&readings, params);
    let best = strongest(&readings)?;

    info!(
        "Attempting to connect to the strongest network: {} ({}{})",
        best.ssid,
        best.raw_signal,
        best.unit.suffix()
    );
    let output = probe.execute(&Intent::Connect(best.ssid.clone())).await?;
    if !output.success() {
        warn!(
            "Connect command for '{}' exited with {:?}: {}",
            best.ssid,
            output.exit_code,
            output.stderr_text()
        );
    }

    Ok(ConnectReport {
        networks,
        attempt: ConnectAttempt {
            ssid: best.ssid.clone(),
            signal: best.raw_signal,
            unit: best.unit,
            exit_code: output.exit_code,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use wifi_ranger_core::{CommandLine, Platform, PlatformAdapter};

    use crate::runner::CommandOutput;

    /// Replies to scans with fixed output and records every command.
    struct ScriptedRunner {
        scan_output: &'static str,
        connect_exit: i32,
        commands: Mutex<Vec<CommandLine>>,
    }

    impl ScriptedRunner {
        fn new(scan_output: &'static str, connect_exit: i32) -> Self {
            Self {
                scan_output,
                connect_exit,
                commands: Mutex::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for &ScriptedRunner {
        async fn run(&self, command: &CommandLine) -> Result<CommandOutput, RunnerError> {
            self.commands.lock().unwrap().push(command.clone());
            let is_connect = command.args.iter().any(|a| a == "connect");
            Ok(CommandOutput {
                stdout: if is_connect {
                    Vec::new()
                } else {
                    self.scan_output.as_bytes().to_vec()
                },
                stderr: Vec::new(),
                exit_code: Some(if is_connect { self.connect_exit } else { 0 }),
            })
        }
    }

    fn linux_probe(runner: &ScriptedRunner) -> Probe<&ScriptedRunner> {
        Probe::new(PlatformAdapter::new(Platform::Linux), runner)
    }

    #[tokio::test]
    async fn test_connects_to_first_strongest() {
        let runner = ScriptedRunner::new("SSID SIGNAL\nA 30\nB 90\nC 90\n", 0);
        let report = connect_strongest(&linux_probe(&runner), &SignalModelParams::default())
            .await
            .unwrap();

        assert_eq!(report.networks.len(), 3);
        assert_eq!(report.attempt.ssid, "B");
        assert_eq!(report.attempt.signal, 90.0);
        assert!(report.attempt.exited_cleanly());

        let commands = runner.commands.lock().unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].to_string(), "nmcli -f SSID,SIGNAL dev wifi");
        assert_eq!(commands[1].args, vec!["dev", "wifi", "connect", "B"]);
    }

    #[tokio::test]
    async fn test_numeric_word_in_ssid_is_not_a_signal() {
        let runner = ScriptedRunner::new(
            "SSID              SIGNAL\nRoom 101          64\nCafe              70\n",
            0,
        );
        let report = connect_strongest(&linux_probe(&runner), &SignalModelParams::default())
            .await
            .unwrap();

        assert_eq!(report.networks[0].ssid, "Room 101");
        assert_eq!(report.networks[0].signal, 64.0);
        assert_eq!(report.attempt.ssid, "Cafe");
        let commands = runner.commands.lock().unwrap();
        assert_eq!(commands[1].args, vec!["dev", "wifi", "connect", "Cafe"]);
    }

    #[tokio::test]
    async fn test_failed_connect_is_reported_not_raised() {
        let runner = ScriptedRunner::new("Cafe 70\n", 10);
        let report = connect_strongest(&linux_probe(&runner), &SignalModelParams::default())
            .await
            .unwrap();

        assert_eq!(report.attempt.exit_code, Some(10));
        assert!(!report.attempt.exited_cleanly());
    }

    #[tokio::test]
    async fn test_empty_scan_never_connects() {
        let runner = ScriptedRunner::new("SSID SIGNAL\n", 0);
        let err = connect_strongest(&linux_probe(&runner), &SignalModelParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, NetworkError::EmptyNetworkList));
        assert_eq!(runner.commands.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_discover_estimates_every_network() {
        let runner = ScriptedRunner::new("Cafe 100\nLibrary 0\n", 0);
        let networks = discover(&linux_probe(&runner), &SignalModelParams::default())
            .await
            .unwrap();

        assert_eq!(networks.len(), 2);
        assert_eq!(networks[0].rssi_dbm, -20.0);
        assert_eq!(networks[1].rssi_dbm, -85.0);
        assert!(networks[0].distance_meters.unwrap() < networks[1].distance_meters.unwrap());
    }

    #[tokio::test]
    async fn test_discover_empty() {
        let runner = ScriptedRunner::new("", 0);
        let err = discover(&linux_probe(&runner), &SignalModelParams::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No WiFi networks found");
    }
}
