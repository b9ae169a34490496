//! Device registry row model.

use serde::Serialize;
use sqlx::FromRow;

use gridpulse_core::device::{Device, DeviceStatus};
use gridpulse_core::types::{DbId, Timestamp};

/// A row from the `devices` table.
///
/// `status` stays TEXT here; `into_device` parses it into the domain enum so
/// a corrupt value surfaces as a decode error instead of a silent default.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeviceRow {
    pub id: DbId,
    pub name: String,
    pub serial_number: String,
    pub status: String,
    pub rated_power_w: f64,
    pub location: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DeviceRow {
    /// Convert into the domain view consumed by the pipeline.
    pub fn into_device(self) -> Result<Device, sqlx::Error> {
        let status: DeviceStatus = self
            .status
            .parse()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Device {
            id: self.id,
            name: self.name,
            serial_number: self.serial_number,
            status,
            rated_power_w: self.rated_power_w,
            location: self.location,
        })
    }
}
