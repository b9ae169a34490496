//! Row models.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! database row, plus a conversion into the corresponding domain type from
//! `gridpulse-core` where one exists.

pub mod alert;
pub mod device;
pub mod telemetry;

pub use alert::AlertRow;
pub use device::DeviceRow;
pub use telemetry::TelemetryRow;
