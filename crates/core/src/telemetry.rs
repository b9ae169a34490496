//! Telemetry sample type and rounding helpers.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Round to two decimal places (meter display precision for V / A / W).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to three decimal places (cumulative kWh counter precision).
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// One timestamped electrical reading for a device.
///
/// Samples are created exclusively by the telemetry generators and are
/// immutable afterwards. `current` always equals `round2(power / voltage)`,
/// and `total_energy` never decreases across a device's successive samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub device_id: DbId,
    /// Line voltage (V).
    pub voltage: f64,
    /// Line current (A), derived as `I = P / U`.
    pub current: f64,
    /// Instantaneous power draw (W).
    pub power: f64,
    /// Cumulative energy counter (kWh).
    pub total_energy: f64,
    pub collected_at: Timestamp,
    /// Set when the sample was produced by the fault-injection generator.
    pub abnormal: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_keeps_display_precision() {
        assert_eq!(round2(5.906), 5.91);
        assert_eq!(round2(220.004), 220.0);
        assert_eq!(round2(219.996), 220.0);
        assert_eq!(round2(1.234), 1.23);
    }

    #[test]
    fn round3_keeps_energy_precision() {
        assert_eq!(round3(12.3456), 12.346);
        assert_eq!(round3(0.0004), 0.0);
    }
}
