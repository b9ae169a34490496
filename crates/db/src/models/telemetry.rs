//! Telemetry sample row model.

use serde::Serialize;
use sqlx::FromRow;

use gridpulse_core::telemetry::TelemetrySample;
use gridpulse_core::types::{DbId, Timestamp};

/// A row from the `telemetry_samples` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TelemetryRow {
    pub id: DbId,
    pub device_id: DbId,
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    pub total_energy: f64,
    pub collected_at: Timestamp,
    pub abnormal: bool,
}

impl From<TelemetryRow> for TelemetrySample {
    fn from(row: TelemetryRow) -> Self {
        Self {
            device_id: row.device_id,
            voltage: row.voltage,
            current: row.current,
            power: row.power,
            total_energy: row.total_energy,
            collected_at: row.collected_at,
            abnormal: row.abnormal,
        }
    }
}
