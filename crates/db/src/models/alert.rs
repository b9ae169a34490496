//! Alert row model.

use serde::Serialize;
use sqlx::FromRow;

use gridpulse_core::alert::{AlertEvent, AlertKind};
use gridpulse_core::types::{DbId, Timestamp};

/// A row from the `alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertRow {
    pub id: DbId,
    pub device_id: DbId,
    pub kind: String,
    pub observed_value: f64,
    pub threshold_value: f64,
    pub description: String,
    pub triggered_at: Timestamp,
    pub resolved: bool,
    pub resolved_at: Option<Timestamp>,
    pub resolve_note: Option<String>,
}

impl AlertRow {
    /// Convert into the domain event type.
    pub fn into_event(self) -> Result<AlertEvent, sqlx::Error> {
        let kind: AlertKind = self
            .kind
            .parse()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(AlertEvent {
            device_id: self.device_id,
            kind,
            observed_value: self.observed_value,
            threshold_value: self.threshold_value,
            description: self.description,
            triggered_at: self.triggered_at,
            resolved: self.resolved,
            resolved_at: self.resolved_at,
            resolve_note: self.resolve_note,
        })
    }
}
