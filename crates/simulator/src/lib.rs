//! GridPulse telemetry simulator.
//!
//! Generates periodic smart-meter readings for every online device,
//! evaluates anomaly rules against each sample, and fans detected alerts
//! out through the alert bus:
//!
//! - [`generator`] — normal and fault-injection sample generators.
//! - [`scheduler`] — the round-driving [`Simulator`] service.
//! - [`store`] — collaborator ports (device registry, sample store) and
//!   their Postgres adapters.
//! - [`config`] — environment-driven configuration.

pub mod config;
pub mod generator;
pub mod scheduler;
pub mod store;

pub use config::SimulatorConfig;
pub use scheduler::{RoundOutcome, Simulator};
