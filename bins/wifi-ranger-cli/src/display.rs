//! Terminal presentation: plain reading lines and a redrawn sparkline chart.

use std::io::Write;

use wifi_ranger_core::{DistanceEstimate, Sample, TimeSeries};
use wifi_ranger_monitor::{ChartSink, ConnectAttempt, ConsoleSink};

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Samples shown per SSID row.
const CHART_WIDTH: usize = 40;

fn distance_text(estimate: &DistanceEstimate) -> String {
    match estimate.distance_meters {
        Some(meters) => format!("{:.2} meters", meters),
        None => "unknown".to_string(),
    }
}

fn network_line(estimate: &DistanceEstimate) -> String {
    format!(
        "SSID: {}, Signal Strength: {}{}, Estimated Distance: {}",
        estimate.ssid,
        estimate.signal,
        estimate.unit.suffix(),
        distance_text(estimate)
    )
}

pub fn print_networks(networks: &[DistanceEstimate]) {
    for estimate in networks {
        println!("{}", network_line(estimate));
    }
}

pub fn print_attempt(attempt: &ConnectAttempt) {
    println!(
        "Attempting to connect to the strongest network: {} with Signal Strength: {}{}",
        attempt.ssid,
        attempt.signal,
        attempt.unit.suffix()
    );
    match attempt.exit_code {
        Some(0) => println!("Connecting to {}...", attempt.ssid),
        Some(code) => println!("Connect command for {} exited with status {}", attempt.ssid, code),
        None => println!("Connect command for {} was terminated", attempt.ssid),
    }
}

/// Prints each estimate on its own timestamped line.
pub struct ConsolePrinter;

impl ConsoleSink for ConsolePrinter {
    fn emit(&mut self, estimates: &[DistanceEstimate]) {
        let now = chrono::Local::now().format("%H:%M:%S");
        for estimate in estimates {
            println!("[{}] {}", now, network_line(estimate));
        }
    }
}

/// Redraws one sparkline row per SSID after every cycle.
pub struct TerminalChart {
    title: String,
    last_elapsed: f64,
}

impl TerminalChart {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            last_elapsed: 0.0,
        }
    }
}

/// Position of a signal on a 0..1 scale. Negative values are dBm.
fn level(signal: f64) -> f64 {
    let scaled = if signal < 0.0 {
        (signal + 100.0) / 80.0
    } else {
        signal / 100.0
    };
    scaled.clamp(0.0, 1.0)
}

fn sparkline(signals: impl Iterator<Item = f64>) -> String {
    signals
        .map(|signal| {
            let index = (level(signal) * (SPARKS.len() - 1) as f64).round() as usize;
            SPARKS[index]
        })
        .collect()
}

/// Widest SSID in characters; `{:<width$}` pads by characters too.
fn ssid_column_width(series: &TimeSeries) -> usize {
    series
        .iter()
        .map(|(ssid, _)| ssid.chars().count())
        .max()
        .unwrap_or(0)
}

/// One chart row. `width` counts characters, not bytes.
fn chart_row(ssid: &str, samples: &[Sample], width: usize) -> String {
    let start = samples.len().saturating_sub(CHART_WIDTH);
    let recent = &samples[start..];
    let latest = recent.last().map(|s| s.signal).unwrap_or_default();
    format!(
        "{:<width$}  {:>5}  {}",
        ssid,
        latest,
        sparkline(recent.iter().map(|s| s.signal)),
        width = width
    )
}

impl ChartSink for TerminalChart {
    fn sample(&mut self, elapsed_seconds: f64, _ssid: &str, _signal: f64) {
        self.last_elapsed = elapsed_seconds;
    }

    fn redraw(&mut self, series: &TimeSeries) {
        let width = ssid_column_width(series);
        let mut out = std::io::stdout().lock();

        // Clear screen, cursor home
        let _ = write!(out, "\x1b[2J\x1b[H");
        let _ = writeln!(out, "{}  (t = {:.0}s, Ctrl+C to stop)", self.title, self.last_elapsed);
        for (ssid, samples) in series.iter() {
            let _ = writeln!(out, "{}", chart_row(ssid, samples, width));
        }
        let _ = out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wifi_ranger_core::SignalUnit;

    #[test]
    fn test_level_scales() {
        assert_eq!(level(0.0), 0.0);
        assert_eq!(level(100.0), 1.0);
        assert_eq!(level(-100.0), 0.0);
        assert_eq!(level(-20.0), 1.0);
        assert_eq!(level(150.0), 1.0);
    }

    #[test]
    fn test_sparkline() {
        let line = sparkline([0.0, 50.0, 100.0].into_iter());
        assert_eq!(line, "▁▅█");
    }

    #[test]
    fn test_chart_rows_align_non_ascii_ssids() {
        let mut series = TimeSeries::new();
        series.append("Cafe", 0.0, 50.0);
        series.append("Café", 0.0, 50.0);
        let width = ssid_column_width(&series);
        assert_eq!(width, 4);

        let rows: Vec<String> = series
            .iter()
            .map(|(ssid, samples)| chart_row(ssid, samples, width))
            .collect();
        assert_eq!(rows[0].chars().count(), rows[1].chars().count());
        assert!(rows[1].starts_with("Café  "));
    }

    #[test]
    fn test_network_line() {
        let estimate = DistanceEstimate {
            ssid: "Cafe".to_string(),
            signal: 87.0,
            unit: SignalUnit::Percentage,
            rssi_dbm: -28.45,
            distance_meters: None,
        };
        assert_eq!(
            network_line(&estimate),
            "SSID: Cafe, Signal Strength: 87%, Estimated Distance: unknown"
        );
    }
}
