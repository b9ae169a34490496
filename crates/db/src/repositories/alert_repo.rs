//! Repository for the `alerts` table.

use sqlx::PgPool;

use gridpulse_core::alert::AlertEvent;
use gridpulse_core::types::DbId;

use crate::models::alert::AlertRow;

/// Column list for `alerts` queries.
const ALERT_COLUMNS: &str = "id, device_id, kind, observed_value, threshold_value, description, \
                             triggered_at, resolved, resolved_at, resolve_note";

/// Provides read/write operations for alert records.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert a new alert row, returning the generated ID.
    pub async fn insert(pool: &PgPool, alert: &AlertEvent) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO alerts \
                (device_id, kind, observed_value, threshold_value, description, triggered_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(alert.device_id)
        .bind(alert.kind.as_str())
        .bind(alert.observed_value)
        .bind(alert.threshold_value)
        .bind(&alert.description)
        .bind(alert.triggered_at)
        .fetch_one(pool)
        .await
    }

    /// List a device's alerts newest-first.
    pub async fn list_for_device(
        pool: &PgPool,
        device_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AlertRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ALERT_COLUMNS} FROM alerts \
             WHERE device_id = $1 \
             ORDER BY triggered_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, AlertRow>(&query)
            .bind(device_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List unresolved alerts across all devices, newest-first.
    pub async fn list_unresolved(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AlertRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ALERT_COLUMNS} FROM alerts \
             WHERE resolved = FALSE \
             ORDER BY triggered_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, AlertRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark an alert resolved with an optional operator note.
    ///
    /// Returns `false` if the alert does not exist or was already resolved.
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
        note: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE alerts \
             SET resolved = TRUE, resolved_at = now(), resolve_note = $2 \
             WHERE id = $1 AND resolved = FALSE",
        )
        .bind(id)
        .bind(note)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of unresolved alerts across all devices.
    pub async fn count_unresolved(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM alerts WHERE resolved = FALSE")
            .fetch_one(pool)
            .await
    }
}
