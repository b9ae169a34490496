//! Repository for the `devices` table.

use sqlx::PgPool;

use gridpulse_core::device::{Device, DeviceStatus};
use gridpulse_core::types::DbId;

use crate::models::device::DeviceRow;

/// Column list for `devices` queries.
const DEVICE_COLUMNS: &str =
    "id, name, serial_number, status, rated_power_w, location, created_at, updated_at";

/// Provides read/write operations for metering devices.
pub struct DeviceRepo;

impl DeviceRepo {
    /// List all devices with the given communication status, oldest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: DeviceStatus,
    ) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE status = $1 ORDER BY id");
        let rows = sqlx::query_as::<_, DeviceRow>(&query)
            .bind(status.as_str())
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(DeviceRow::into_device).collect()
    }

    /// Fetch a single device by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1");
        let row = sqlx::query_as::<_, DeviceRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(DeviceRow::into_device).transpose()
    }

    /// Insert a new device, returning the generated ID.
    pub async fn insert(
        pool: &PgPool,
        name: &str,
        serial_number: &str,
        status: DeviceStatus,
        rated_power_w: f64,
        location: Option<&str>,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO devices (name, serial_number, status, rated_power_w, location) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(name)
        .bind(serial_number)
        .bind(status.as_str())
        .bind(rated_power_w)
        .bind(location)
        .fetch_one(pool)
        .await
    }

    /// Update a device's communication status.
    ///
    /// Returns `false` if the device does not exist.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: DeviceStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE devices SET status = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
