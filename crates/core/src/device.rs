//! Smart-meter device registry types.
//!
//! Devices are owned by the external registry; the pipeline treats them as
//! read-only input.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Communication status of a metering device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    /// Device is reporting normally.
    Online,
    /// Device has lost its connection.
    Offline,
    /// Device is undergoing maintenance.
    Maintenance,
    /// Device has been retired.
    Decommissioned,
}

impl DeviceStatus {
    /// Canonical TEXT value stored in the `devices.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
            Self::Maintenance => "MAINTENANCE",
            Self::Decommissioned => "DECOMMISSIONED",
        }
    }
}

impl FromStr for DeviceStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ONLINE" => Ok(Self::Online),
            "OFFLINE" => Ok(Self::Offline),
            "MAINTENANCE" => Ok(Self::Maintenance),
            "DECOMMISSIONED" => Ok(Self::Decommissioned),
            other => Err(CoreError::Validation(format!(
                "Unknown device status: \"{other}\""
            ))),
        }
    }
}

/// A smart-meter device as seen by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DbId,
    /// Display name, e.g. `"Lab 3 Main Meter"`.
    pub name: String,
    /// Unique serial number, e.g. `"METER_2025_001"`.
    pub serial_number: String,
    pub status: DeviceStatus,
    /// Nameplate power rating (W); overload thresholds derive from it.
    pub rated_power_w: f64,
    /// Free-form placement description (building / room).
    pub location: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            DeviceStatus::Online,
            DeviceStatus::Offline,
            DeviceStatus::Maintenance,
            DeviceStatus::Decommissioned,
        ] {
            assert_eq!(status.as_str().parse::<DeviceStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("BROKEN".parse::<DeviceStatus>().is_err());
    }
}
