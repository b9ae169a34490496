//! Collaborator ports consumed by the scheduler.
//!
//! The scheduler talks to the device registry and the sample store through
//! these capabilities so tests can substitute in-memory fakes; the Postgres
//! adapters delegate to the repositories in `gridpulse-db`.

use async_trait::async_trait;

use gridpulse_core::device::{Device, DeviceStatus};
use gridpulse_core::telemetry::TelemetrySample;
use gridpulse_core::types::DbId;
use gridpulse_db::repositories::{DeviceRepo, TelemetryRepo};
use gridpulse_db::DbPool;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying database call failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other collaborator-specific failure.
    #[error("Store failure: {0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Read-only view of the device registry.
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Devices currently eligible for sampling.
    async fn list_online_devices(&self) -> Result<Vec<Device>, StoreError>;
}

/// Durable sample storage plus the per-device cumulative-energy counter.
#[async_trait]
pub trait SampleStore: Send + Sync {
    /// Last cumulative-energy reading for a device; 0.0 when absent.
    async fn last_total_energy(&self, device_id: DbId) -> Result<f64, StoreError>;

    /// Persist one sample.
    async fn save_sample(&self, sample: &TelemetrySample) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Postgres adapters
// ---------------------------------------------------------------------------

/// Postgres-backed device registry.
pub struct PgDeviceRegistry {
    pool: DbPool,
}

impl PgDeviceRegistry {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceRegistry for PgDeviceRegistry {
    async fn list_online_devices(&self) -> Result<Vec<Device>, StoreError> {
        Ok(DeviceRepo::list_by_status(&self.pool, DeviceStatus::Online).await?)
    }
}

/// Postgres-backed sample store.
pub struct PgSampleStore {
    pool: DbPool,
}

impl PgSampleStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SampleStore for PgSampleStore {
    async fn last_total_energy(&self, device_id: DbId) -> Result<f64, StoreError> {
        Ok(TelemetryRepo::last_total_energy(&self.pool, device_id)
            .await?
            .unwrap_or(0.0))
    }

    async fn save_sample(&self, sample: &TelemetrySample) -> Result<(), StoreError> {
        TelemetryRepo::insert(&self.pool, sample).await?;
        Ok(())
    }
}
