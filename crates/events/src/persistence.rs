//! Durable alert store sink.
//!
//! [`DatabaseSink`] writes every delivered [`AlertEvent`] to the `alerts`
//! table via [`AlertRepo`], giving operators a queryable alert history.

use async_trait::async_trait;

use gridpulse_core::alert::AlertEvent;
use gridpulse_db::repositories::AlertRepo;
use gridpulse_db::DbPool;

use crate::sink::{AlertSink, SinkError};

/// Sink that persists alerts to the database.
pub struct DatabaseSink {
    pool: DbPool,
}

impl DatabaseSink {
    /// Create a new sink writing through the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertSink for DatabaseSink {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn notify(&self, alert: &AlertEvent) -> Result<(), SinkError> {
        let id = AlertRepo::insert(&self.pool, alert).await?;
        tracing::debug!(
            alert_id = id,
            device_id = alert.device_id,
            kind = alert.kind.as_str(),
            "Alert persisted"
        );
        Ok(())
    }
}
