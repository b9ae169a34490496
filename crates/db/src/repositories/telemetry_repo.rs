//! Repository for the `telemetry_samples` table.

use sqlx::PgPool;

use gridpulse_core::telemetry::TelemetrySample;
use gridpulse_core::types::DbId;

use crate::models::telemetry::TelemetryRow;

/// Column list for `telemetry_samples` queries.
const TELEMETRY_COLUMNS: &str =
    "id, device_id, voltage, current, power, total_energy, collected_at, abnormal";

/// Provides read/write operations for telemetry samples.
pub struct TelemetryRepo;

impl TelemetryRepo {
    /// Insert a new sample row, returning the generated ID.
    pub async fn insert(pool: &PgPool, sample: &TelemetrySample) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO telemetry_samples \
                (device_id, voltage, current, power, total_energy, collected_at, abnormal) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id",
        )
        .bind(sample.device_id)
        .bind(sample.voltage)
        .bind(sample.current)
        .bind(sample.power)
        .bind(sample.total_energy)
        .bind(sample.collected_at)
        .bind(sample.abnormal)
        .fetch_one(pool)
        .await
    }

    /// Latest cumulative-energy reading for a device.
    ///
    /// Returns `None` when the device has no samples yet; callers treat that
    /// as a counter of 0.0.
    pub async fn last_total_energy(
        pool: &PgPool,
        device_id: DbId,
    ) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT total_energy FROM telemetry_samples \
             WHERE device_id = $1 \
             ORDER BY collected_at DESC, id DESC \
             LIMIT 1",
        )
        .bind(device_id)
        .fetch_optional(pool)
        .await
    }

    /// List a device's samples newest-first.
    pub async fn list_for_device(
        pool: &PgPool,
        device_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TelemetryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {TELEMETRY_COLUMNS} FROM telemetry_samples \
             WHERE device_id = $1 \
             ORDER BY collected_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, TelemetryRow>(&query)
            .bind(device_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of stored samples for a device.
    pub async fn count_for_device(pool: &PgPool, device_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM telemetry_samples WHERE device_id = $1")
            .bind(device_id)
            .fetch_one(pool)
            .await
    }
}
