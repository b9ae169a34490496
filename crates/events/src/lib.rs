//! GridPulse alert bus and notification sinks.
//!
//! This crate provides the fan-out half of the anomaly pipeline:
//!
//! - [`AlertBus`] — ordered, failure-isolating fan-out dispatcher.
//! - [`AlertSink`] — the one-method notification capability.
//! - [`DatabaseSink`] — durable alert store.
//! - [`LogSink`] — diagnostic trail.
//! - [`WebhookSink`] — optional outbound HTTP push.

pub mod bus;
pub mod log;
pub mod persistence;
pub mod sink;
pub mod webhook;

pub use bus::AlertBus;
pub use log::LogSink;
pub use persistence::DatabaseSink;
pub use sink::{AlertSink, SinkError};
pub use webhook::WebhookSink;
