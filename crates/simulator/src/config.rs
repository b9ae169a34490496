//! Simulator configuration.
//!
//! All knobs are environment variables with production defaults, validated
//! once at startup. Invalid values are fatal — the pipeline never re-reads
//! configuration at runtime.

use std::str::FromStr;
use std::time::Duration;

use gridpulse_core::error::CoreError;
use gridpulse_core::rules::{DEFAULT_MAX_VOLTAGE, DEFAULT_MIN_VOLTAGE, DEFAULT_OVERLOAD_RATIO};

/// Default seconds between generation rounds.
const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Default anomaly cadence: every Nth sample uses the fault generator.
const DEFAULT_ANOMALY_FREQUENCY: u64 = 30;

/// Runtime configuration for the simulator service.
///
/// | Variable                | Required | Default |
/// |-------------------------|----------|---------|
/// | `SIM_ENABLED`           | no       | `true`  |
/// | `SIM_INTERVAL_SECS`     | no       | `5`     |
/// | `SIM_ANOMALY_FREQUENCY` | no       | `30`    |
/// | `ALERT_OVERLOAD_RATIO`  | no       | `1.2`   |
/// | `ALERT_VOLTAGE_MIN`     | no       | `198`   |
/// | `ALERT_VOLTAGE_MAX`     | no       | `242`   |
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Whether rounds may start.
    pub enabled: bool,
    /// Time between rounds; also the sampling interval assumed by the
    /// energy-increment calculation.
    pub interval: Duration,
    /// Every Nth sample (global counter across all devices) is abnormal.
    pub anomaly_frequency: u64,
    /// Overload threshold as a multiple of rated power.
    pub overload_ratio: f64,
    /// Lower voltage bound (V).
    pub min_voltage: f64,
    /// Upper voltage bound (V).
    pub max_voltage: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            anomaly_frequency: DEFAULT_ANOMALY_FREQUENCY,
            overload_ratio: DEFAULT_OVERLOAD_RATIO,
            min_voltage: DEFAULT_MIN_VOLTAGE,
            max_voltage: DEFAULT_MAX_VOLTAGE,
        }
    }
}

impl SimulatorConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; set-but-unparsable values are
    /// a startup error, never a silent fallback.
    pub fn from_env() -> Result<Self, CoreError> {
        let config = Self {
            enabled: env_flag("SIM_ENABLED", true)?,
            interval: Duration::from_secs(env_parse("SIM_INTERVAL_SECS", DEFAULT_INTERVAL_SECS)?),
            anomaly_frequency: env_parse("SIM_ANOMALY_FREQUENCY", DEFAULT_ANOMALY_FREQUENCY)?,
            overload_ratio: env_parse("ALERT_OVERLOAD_RATIO", DEFAULT_OVERLOAD_RATIO)?,
            min_voltage: env_parse("ALERT_VOLTAGE_MIN", DEFAULT_MIN_VOLTAGE)?,
            max_voltage: env_parse("ALERT_VOLTAGE_MAX", DEFAULT_MAX_VOLTAGE)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the scheduler depends on.
    ///
    /// The rule thresholds get their own validation when the rule engine is
    /// constructed from them.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.interval.is_zero() {
            return Err(CoreError::Validation(
                "Simulation interval must be at least one second".to_string(),
            ));
        }
        if self.anomaly_frequency == 0 {
            return Err(CoreError::Validation(
                "Anomaly frequency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse an optional boolean environment variable.
fn env_flag(name: &str, default: bool) -> Result<bool, CoreError> {
    match std::env::var(name) {
        Ok(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(CoreError::Validation(format!(
                "{name} must be a boolean, got \"{raw}\""
            ))),
        },
        Err(_) => Ok(default),
    }
}

/// Parse an optional numeric environment variable.
fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T, CoreError> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            CoreError::Validation(format!("{name} must be a number, got \"{raw}\""))
        }),
        Err(_) => Ok(default),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimulatorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.enabled);
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.anomaly_frequency, 30);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = SimulatorConfig {
            interval: Duration::ZERO,
            ..SimulatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_anomaly_frequency_is_rejected() {
        let config = SimulatorConfig {
            anomaly_frequency: 0,
            ..SimulatorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
