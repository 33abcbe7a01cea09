//! Strongest-network selection.

use thiserror::Error;

use crate::model::Reading;

/// Errors from network selection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectError {
    #[error("No WiFi networks found")]
    EmptyNetworkList,
}

/// The reading with the strongest signal. Ties go to the first one seen.
///
/// Readings are compared in dBm. Both units map monotonically onto dBm, so for
/// a percentage list this is the maximum raw value. Readings that cannot be
/// normalized are skipped.
pub fn strongest(readings: &[Reading]) -> Result<&Reading, SelectError> {
    let mut best: Option<(&Reading, f64)> = None;
    for reading in readings {
        let Ok(dbm) = reading.rssi_dbm() else {
            continue;
        };
        match best {
            Some((_, best_dbm)) if dbm <= best_dbm => {}
            _ => best = Some((reading, dbm)),
        }
    }
    best.map(|(reading, _)| reading)
        .ok_or(SelectError::EmptyNetworkList)
}
