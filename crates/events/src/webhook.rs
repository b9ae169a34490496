//! Outbound webhook sink.
//!
//! [`WebhookSink`] sends a JSON-encoded alert to an external URL via HTTP
//! POST. Delivery is single-attempt: the pipeline's at-most-once guarantee
//! treats a failed push like any other sink failure, so there is no retry
//! loop here.

use std::time::Duration;

use async_trait::async_trait;

use gridpulse_core::alert::AlertEvent;

use crate::sink::{AlertSink, SinkError};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers alerts to an external webhook endpoint.
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    /// Create a sink posting to `url` with a pre-configured HTTP client.
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            url: url.into(),
        }
    }

    /// Read the target URL from `ALERT_WEBHOOK_URL`.
    ///
    /// Returns `None` when the variable is unset, signalling that no webhook
    /// sink should be registered.
    pub fn from_env() -> Option<Self> {
        std::env::var("ALERT_WEBHOOK_URL").ok().map(Self::new)
    }
}

#[async_trait]
impl AlertSink for WebhookSink {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn notify(&self, alert: &AlertEvent) -> Result<(), SinkError> {
        let payload = serde_json::json!({
            "device_id": alert.device_id,
            "kind": alert.kind.as_str(),
            "observed_value": alert.observed_value,
            "threshold_value": alert.threshold_value,
            "description": alert.description,
            "triggered_at": alert.triggered_at,
        });

        let response = self.client.post(&self.url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(SinkError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
