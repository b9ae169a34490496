//! Diagnostic log sink.

use async_trait::async_trait;

use gridpulse_core::alert::AlertEvent;

use crate::sink::{AlertSink, SinkError};

/// Sink that writes every alert to the diagnostic log at WARN level.
pub struct LogSink;

#[async_trait]
impl AlertSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, alert: &AlertEvent) -> Result<(), SinkError> {
        tracing::warn!(
            device_id = alert.device_id,
            kind = alert.kind.as_str(),
            observed = alert.observed_value,
            threshold = alert.threshold_value,
            triggered_at = %alert.triggered_at,
            "{}",
            alert.description
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
