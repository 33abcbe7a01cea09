//! The acquisition loop.
//!
//! Each cycle asks the probe for readings, runs them through the signal
//! model and hands the result to the configured [`Output`]. A failing cycle
//! is logged and skipped; nothing short of cancellation ends the loop.
//!
//! ```text
//!  Idle ──run()──▶ Polling ──shutdown──▶ Stopped
//! ```
//!
//! Cancellation is checked between cycles. A command already running is
//! allowed to finish (it is bounded by the runner's timeout); the sleep
//! between cycles is cut short.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use wifi_ranger_core::{
    estimate, DistanceEstimate, Query, RangerConfig, SignalModelParams, TimeSeries,
};

use crate::probe::{Probe, ProbeError};
use crate::runner::CommandRunner;
use crate::sink::Output;

/// Lifecycle of an acquisition loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Polling,
    Stopped,
}

/// Cycle counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub cycles: u64,
    pub successful_cycles: u64,
    pub failed_cycles: u64,
}

/// Polls one query on a fixed interval.
pub struct AcquisitionLoop<R> {
    probe: Probe<R>,
    query: Query,
    params: SignalModelParams,
    interval: Duration,
    state: LoopState,
    series: TimeSeries,
    summary: LoopSummary,
}

impl<R: CommandRunner> AcquisitionLoop<R> {
    /// Create a loop for `query`, taking the model and the query's interval
    /// from `config`.
    pub fn new(probe: Probe<R>, query: Query, config: &RangerConfig) -> Self {
        let interval = match query {
            Query::CurrentStatus => config.monitor_interval,
            Query::ScanAll => config.scan_interval,
        };
        Self {
            probe,
            query,
            params: config.model,
            interval,
            state: LoopState::Idle,
            series: TimeSeries::new(),
            summary: LoopSummary::default(),
        }
    }

    /// Override the pause between cycles.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Samples recorded so far. Only chart output records samples.
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn into_series(self) -> TimeSeries {
        self.series
    }

    /// Poll until `shutdown` turns true or its sender is dropped.
    pub async fn run(
        &mut self,
        mut output: Output<'_>,
        mut shutdown: watch::Receiver<bool>,
    ) -> LoopSummary {
        self.state = LoopState::Polling;
        let started = Instant::now();
        info!(
            "Polling {:?} on {} every {:?}",
            self.query,
            self.probe.platform(),
            self.interval
        );

        loop {
            let stop = *shutdown.borrow_and_update();
            if stop {
                break;
            }

            self.summary.cycles += 1;
            match self.cycle(&mut output, started).await {
                Ok(count) => {
                    self.summary.successful_cycles += 1;
                    debug!("Cycle {} emitted {} readings", self.summary.cycles, count);
                }
                Err(e) => {
                    self.summary.failed_cycles += 1;
                    warn!("Cycle {} skipped: {}", self.summary.cycles, e);
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        debug!("Shutdown sender dropped");
                        break;
                    }
                }
            }
        }

        self.state = LoopState::Stopped;
        info!(
            "Polling stopped after {} cycles ({} failed)",
            self.summary.cycles, self.summary.failed_cycles
        );
        self.summary
    }

    /// One poll. Nothing reaches the output unless the whole read succeeded.
    async fn cycle(
        &mut self,
        output: &mut Output<'_>,
        started: Instant,
    ) -> Result<usize, ProbeError> {
        let readings = self.probe.read(self.query).await?;
        let elapsed_seconds = started.elapsed().as_secs_f64();

        let estimates: Vec<DistanceEstimate> = readings
            .iter()
            .filter_map(|reading| match estimate(reading, &self.params) {
                Ok(estimate) => Some(estimate),
                Err(e) => {
                    debug!("Dropping reading for '{}': {}", reading.ssid, e);
                    None
                }
            })
            .collect();

        match output {
            Output::Console(sink) => sink.emit(&estimates),
            Output::Chart(sink) => {
                for estimate in &estimates {
                    self.series
                        .append(&estimate.ssid, elapsed_seconds, estimate.signal);
                    sink.sample(elapsed_seconds, &estimate.ssid, estimate.signal);
                }
                sink.redraw(&self.series);
            }
        }

        Ok(estimates.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CommandOutput, RunnerError};
    use wifi_ranger_core::{CommandLine, Platform, PlatformAdapter};

    struct StaticRunner(&'static str);

    impl CommandRunner for StaticRunner {
        async fn run(&self, _command: &CommandLine) -> Result<CommandOutput, RunnerError> {
            Ok(CommandOutput {
                stdout: self.0.as_bytes().to_vec(),
                stderr: Vec::new(),
                exit_code: Some(0),
            })
        }
    }

    fn scan_loop(stdout: &'static str) -> AcquisitionLoop<StaticRunner> {
        let probe = Probe::new(PlatformAdapter::new(Platform::Linux), StaticRunner(stdout));
        AcquisitionLoop::new(probe, Query::ScanAll, &RangerConfig::default())
    }

    #[test]
    fn test_interval_follows_query() {
        let config = RangerConfig::default();
        let probe = Probe::new(PlatformAdapter::new(Platform::Linux), StaticRunner(""));
        let monitor = AcquisitionLoop::new(probe, Query::CurrentStatus, &config);
        assert_eq!(monitor.interval(), config.monitor_interval);
        assert_eq!(monitor.state(), LoopState::Idle);

        assert_eq!(scan_loop("").interval(), config.scan_interval);
    }

    #[tokio::test]
    async fn test_already_cancelled_loop_never_polls() {
        let mut acquisition = scan_loop("Cafe 70\n");
        let (_tx, rx) = watch::channel(true);
        let mut cycles: Vec<Vec<DistanceEstimate>> = Vec::new();

        let summary = acquisition.run(Output::Console(&mut cycles), rx).await;

        assert_eq!(summary, LoopSummary::default());
        assert!(cycles.is_empty());
        assert_eq!(acquisition.state(), LoopState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_sender_stops_loop() {
        let mut acquisition = scan_loop("Cafe 70\n");
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let mut cycles: Vec<Vec<DistanceEstimate>> = Vec::new();

        let summary = acquisition.run(Output::Console(&mut cycles), rx).await;

        assert_eq!(summary.cycles, 1);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0][0].ssid, "Cafe");
    }
}
