//! GridPulse domain core.
//!
//! Pure domain logic for the telemetry pipeline: device and sample types,
//! alert events, the anomaly rule engine, and tariff policies. This crate
//! has zero internal dependencies and no database or runtime coupling —
//! callers fetch state and pass it in.

pub mod alert;
pub mod device;
pub mod error;
pub mod rules;
pub mod tariff;
pub mod telemetry;
pub mod types;

pub use alert::{AlertEvent, AlertKind};
pub use device::{Device, DeviceStatus};
pub use error::CoreError;
pub use rules::{AlertRule, PowerOverloadRule, RuleEngine, VoltageRangeRule};
pub use telemetry::TelemetrySample;
