//! In-process fan-out alert bus.
//!
//! [`AlertBus`] keeps an ordered subscriber registry and delivers every
//! published [`AlertEvent`] to each registered [`AlertSink`] in registration
//! order, isolating sink failures from each other and from the publisher.
//! It is designed to be shared via `Arc<AlertBus>` across the application.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use gridpulse_core::alert::AlertEvent;

use crate::sink::AlertSink;

/// Upper bound on a single sink delivery, so one stalled sink cannot hold a
/// simulation round open.
const SINK_TIMEOUT: Duration = Duration::from_secs(10);

/// Ordered, concurrency-safe alert dispatcher.
///
/// Delivery is at-most-once per publish: a failed or timed-out sink call is
/// logged and dropped, never retried.
pub struct AlertBus {
    sinks: RwLock<Vec<Arc<dyn AlertSink>>>,
}

impl AlertBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            sinks: RwLock::new(Vec::new()),
        }
    }

    /// Register a sink at the end of the delivery order.
    ///
    /// Idempotent: re-registering the same instance (by identity) is a
    /// no-op, so startup wiring can be run twice without double delivery.
    pub fn register(&self, sink: Arc<dyn AlertSink>) {
        let mut sinks = self.sinks.write().expect("sink registry poisoned");
        if sinks.iter().any(|s| Arc::ptr_eq(s, &sink)) {
            tracing::debug!(sink = sink.name(), "Sink already registered, skipping");
            return;
        }
        tracing::info!(sink = sink.name(), "Registered alert sink");
        sinks.push(sink);
    }

    /// Remove a sink by identity.
    pub fn unregister(&self, sink: &Arc<dyn AlertSink>) {
        let mut sinks = self.sinks.write().expect("sink registry poisoned");
        let before = sinks.len();
        sinks.retain(|s| !Arc::ptr_eq(s, sink));
        if sinks.len() < before {
            tracing::info!(sink = sink.name(), "Unregistered alert sink");
        }
    }

    /// Number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.read().expect("sink registry poisoned").len()
    }

    /// Deliver an alert to every registered sink, in registration order.
    ///
    /// The registry is snapshotted before delivery, so concurrent
    /// register/unregister calls cannot skip or duplicate a sink
    /// mid-iteration. A failing or stalled sink is logged and never
    /// suppresses delivery to the remaining sinks.
    pub async fn publish(&self, alert: &AlertEvent) {
        let snapshot: Vec<Arc<dyn AlertSink>> =
            self.sinks.read().expect("sink registry poisoned").clone();

        for sink in snapshot {
            match tokio::time::timeout(SINK_TIMEOUT, sink.notify(alert)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!(
                        sink = sink.name(),
                        error = %e,
                        device_id = alert.device_id,
                        kind = alert.kind.as_str(),
                        "Alert sink delivery failed"
                    );
                }
                Err(_) => {
                    tracing::error!(
                        sink = sink.name(),
                        timeout_secs = SINK_TIMEOUT.as_secs(),
                        device_id = alert.device_id,
                        "Alert sink timed out"
                    );
                }
            }
        }
    }
}

impl Default for AlertBus {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
