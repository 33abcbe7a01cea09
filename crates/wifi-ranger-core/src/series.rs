//! Signal history accumulated by a polling session.
//!
//! The series maps each SSID to its samples in arrival order. SSIDs are kept
//! in first-seen order so a chart legend stays stable as networks appear.

use std::collections::HashMap;

use serde::Serialize;

/// One signal observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Seconds since the session started.
    pub elapsed_seconds: f64,
    pub signal: f64,
}

/// Per-SSID signal history. Grows for as long as its owner keeps appending.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    /// SSID to position in `series`.
    index: HashMap<String, usize>,
    series: Vec<(String, Vec<Sample>)>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample for `ssid`, creating its series on first sight.
    pub fn append(&mut self, ssid: &str, elapsed_seconds: f64, signal: f64) {
        let sample = Sample {
            elapsed_seconds,
            signal,
        };
        match self.index.get(ssid) {
            Some(&i) => self.series[i].1.push(sample),
            None => {
                self.index.insert(ssid.to_string(), self.series.len());
                self.series.push((ssid.to_string(), vec![sample]));
            }
        }
    }

    /// Samples recorded for `ssid`.
    pub fn get(&self, ssid: &str) -> Option<&[Sample]> {
        self.index.get(ssid).map(|&i| self.series[i].1.as_slice())
    }

    /// All series in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Sample])> {
        self.series
            .iter()
            .map(|(ssid, samples)| (ssid.as_str(), samples.as_slice()))
    }

    /// Number of distinct SSIDs.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total samples across all SSIDs.
    pub fn sample_count(&self) -> usize {
        self.series.iter().map(|(_, samples)| samples.len()).sum()
    }
}
