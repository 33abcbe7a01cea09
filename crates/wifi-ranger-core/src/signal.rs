//! Signal strength to distance model.
//!
//! Two pure functions:
//! - [`percentage_to_dbm`] linearizes a 0-100 quality value onto a dBm range
//! - [`distance`] inverts the log-distance path-loss model
//!
//! Distance is `10 ^ ((P0 - Pr) / (10 * N))` meters, where `P0` is the RSSI
//! expected at 1 meter, `Pr` the measured RSSI and `N` the path-loss exponent.

use thiserror::Error;

use crate::model::{DistanceEstimate, Reading, SignalModelParams};

/// dBm assigned to 100% signal quality.
pub const PERCENT_MAX_DBM: f64 = -20.0;

/// dBm assigned to 0% signal quality.
pub const PERCENT_MIN_DBM: f64 = -85.0;

/// Errors raised by the signal model. Each one invalidates a single reading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Signal value is not a finite number: {0}")]
    NonFiniteInput(f64),

    #[error("Path-loss exponent must be non-zero")]
    ZeroExponent,

    #[error("Distance is not finite for P0={p0} dBm, Pr={pr} dBm, N={n}")]
    NonFiniteResult { p0: f64, pr: f64, n: f64 },
}

/// Map signal quality (0-100) linearly onto `[-85, -20]` dBm.
pub fn percentage_to_dbm(percentage: f64) -> Result<f64, ConversionError> {
    if !percentage.is_finite() {
        return Err(ConversionError::NonFiniteInput(percentage));
    }
    Ok(PERCENT_MAX_DBM - (PERCENT_MAX_DBM - PERCENT_MIN_DBM) * (1.0 - percentage / 100.0))
}

/// Estimated distance in meters from reference RSSI `p0`, measured RSSI `pr`
/// and path-loss exponent `n`.
pub fn distance(p0: f64, pr: f64, n: f64) -> Result<f64, ConversionError> {
    if n == 0.0 {
        return Err(ConversionError::ZeroExponent);
    }
    let meters = 10f64.powf((p0 - pr) / (10.0 * n));
    if !meters.is_finite() {
        return Err(ConversionError::NonFiniteResult { p0, pr, n });
    }
    Ok(meters)
}

/// Run a reading through the model.
///
/// Fails only when the reading cannot be normalized to dBm. A failing
/// distance computation yields an estimate with `distance_meters: None`.
pub fn estimate(
    reading: &Reading,
    params: &SignalModelParams,
) -> Result<DistanceEstimate, ConversionError> {
    let rssi_dbm = reading.rssi_dbm()?;
    let distance_meters = distance(
        params.reference_rssi_dbm,
        rssi_dbm,
        params.path_loss_exponent,
    )
    .ok();

    Ok(DistanceEstimate {
        ssid: reading.ssid.clone(),
        signal: reading.raw_signal,
        unit: reading.unit,
        rssi_dbm,
        distance_meters,
    })
}
