//! Alert event types for threshold violation notifications.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Category of a detected anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    /// Instantaneous power exceeded the device overload threshold.
    PowerOverload,
    /// Line voltage fell below the lower bound.
    VoltageLow,
    /// Line voltage rose above the upper bound.
    VoltageHigh,
    /// Device stopped reporting. Raised by registry tooling, never by the
    /// built-in rules.
    DeviceOffline,
}

impl AlertKind {
    /// Canonical TEXT value stored in the `alerts.kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PowerOverload => "POWER_OVERLOAD",
            Self::VoltageLow => "VOLTAGE_LOW",
            Self::VoltageHigh => "VOLTAGE_HIGH",
            Self::DeviceOffline => "DEVICE_OFFLINE",
        }
    }
}

impl FromStr for AlertKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POWER_OVERLOAD" => Ok(Self::PowerOverload),
            "VOLTAGE_LOW" => Ok(Self::VoltageLow),
            "VOLTAGE_HIGH" => Ok(Self::VoltageHigh),
            "DEVICE_OFFLINE" => Ok(Self::DeviceOffline),
            other => Err(CoreError::Validation(format!(
                "Unknown alert kind: \"{other}\""
            ))),
        }
    }
}

/// A detected anomaly for one device.
///
/// Created exclusively by the rule engine. The resolution fields are the
/// only mutable part and are updated later by an operator action, outside
/// the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub device_id: DbId,
    pub kind: AlertKind,
    /// The observed reading that triggered the alert.
    pub observed_value: f64,
    /// The configured threshold it breached.
    pub threshold_value: f64,
    /// Human-readable summary embedding device name, reading, and threshold.
    pub description: String,
    pub triggered_at: Timestamp,
    pub resolved: bool,
    pub resolved_at: Option<Timestamp>,
    pub resolve_note: Option<String>,
}

impl AlertEvent {
    /// Create a new, unresolved alert.
    pub fn new(
        device_id: DbId,
        kind: AlertKind,
        observed_value: f64,
        threshold_value: f64,
        description: impl Into<String>,
        triggered_at: Timestamp,
    ) -> Self {
        Self {
            device_id,
            kind,
            observed_value,
            threshold_value,
            description: description.into(),
            triggered_at,
            resolved: false,
            resolved_at: None,
            resolve_note: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn kind_round_trips_through_text() {
        for kind in [
            AlertKind::PowerOverload,
            AlertKind::VoltageLow,
            AlertKind::VoltageHigh,
            AlertKind::DeviceOffline,
        ] {
            assert_eq!(kind.as_str().parse::<AlertKind>().unwrap(), kind);
        }
    }

    #[test]
    fn new_alert_starts_unresolved() {
        let alert = AlertEvent::new(
            7,
            AlertKind::PowerOverload,
            1300.0,
            1200.0,
            "overload",
            Utc::now(),
        );
        assert!(!alert.resolved);
        assert!(alert.resolved_at.is_none());
        assert!(alert.resolve_note.is_none());
    }
}
