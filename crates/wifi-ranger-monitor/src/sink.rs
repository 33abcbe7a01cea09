//! Where acquisition results go.
//!
//! Presentation lives outside this crate. The loop only needs two shapes:
//! - [`ConsoleSink`] receives one set of estimates per successful cycle
//! - [`ChartSink`] receives samples one by one, then a redraw request with
//!   read access to the whole series

use wifi_ranger_core::{DistanceEstimate, TimeSeries};

/// Receives the estimates of each successful cycle, in order.
pub trait ConsoleSink {
    fn emit(&mut self, estimates: &[DistanceEstimate]);
}

/// Collects every cycle's estimates.
impl ConsoleSink for Vec<Vec<DistanceEstimate>> {
    fn emit(&mut self, estimates: &[DistanceEstimate]) {
        self.push(estimates.to_vec());
    }
}

/// Receives time-series samples as they are recorded.
///
/// New SSIDs may show up at any point and the series never shrinks.
pub trait ChartSink {
    /// A sample was appended to the series.
    fn sample(&mut self, elapsed_seconds: f64, ssid: &str, signal: f64);

    /// A cycle finished; `series` holds everything recorded so far.
    fn redraw(&mut self, series: &TimeSeries);
}

/// The sink an acquisition loop feeds.
pub enum Output<'a> {
    Console(&'a mut dyn ConsoleSink),
    Chart(&'a mut dyn ChartSink),
}
