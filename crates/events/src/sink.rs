//! The alert notification capability.

use async_trait::async_trait;

use gridpulse_core::alert::AlertEvent;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for sink delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The durable store rejected the write.
    #[error("Alert store write failed: {0}")]
    Store(#[from] sqlx::Error),

    /// The outbound HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote endpoint returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),

    /// Any other sink-specific failure.
    #[error("Sink failure: {0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// AlertSink
// ---------------------------------------------------------------------------

/// A notification target for alert events.
///
/// Implementations must tolerate concurrent calls; the
/// [`AlertBus`](crate::bus::AlertBus) isolates their failures from each
/// other, so a sink only has to report its own outcome.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Stable sink name for logs.
    fn name(&self) -> &'static str;

    /// Deliver one alert.
    async fn notify(&self, alert: &AlertEvent) -> Result<(), SinkError>;
}
