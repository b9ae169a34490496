//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod alert_repo;
pub mod device_repo;
pub mod telemetry_repo;

pub use alert_repo::AlertRepo;
pub use device_repo::DeviceRepo;
pub use telemetry_repo::TelemetryRepo;
