//! Anomaly rule engine.
//!
//! Pure logic — no database access. Rules are stateless predicates built
//! once at startup from validated configuration; each inspects one sample
//! and may emit at most one alert. Invalid thresholds are rejected at
//! construction, so `check` itself never fails for well-formed input.

use crate::alert::{AlertEvent, AlertKind};
use crate::device::Device;
use crate::error::CoreError;
use crate::telemetry::TelemetrySample;

/// Nominal grid voltage (V); the configured bounds are expressed against it.
pub const STANDARD_VOLTAGE: f64 = 220.0;

/// Default overload threshold as a multiple of rated power.
pub const DEFAULT_OVERLOAD_RATIO: f64 = 1.2;

/// Default lower voltage bound (90% of standard).
pub const DEFAULT_MIN_VOLTAGE: f64 = 198.0;

/// Default upper voltage bound (110% of standard).
pub const DEFAULT_MAX_VOLTAGE: f64 = 242.0;

/// A stateless anomaly predicate over one telemetry sample.
pub trait AlertRule: Send + Sync {
    /// Stable rule name for logs.
    fn name(&self) -> &'static str;

    /// Check one sample, returning at most one alert.
    fn check(&self, device: &Device, sample: &TelemetrySample) -> Option<AlertEvent>;
}

// ---------------------------------------------------------------------------
// PowerOverloadRule
// ---------------------------------------------------------------------------

/// Fires when instantaneous power strictly exceeds `rated_power × ratio`.
pub struct PowerOverloadRule {
    overload_ratio: f64,
}

impl PowerOverloadRule {
    /// Create the rule; the ratio must be a positive, finite multiplier.
    pub fn new(overload_ratio: f64) -> Result<Self, CoreError> {
        if !overload_ratio.is_finite() || overload_ratio <= 0.0 {
            return Err(CoreError::Validation(format!(
                "Overload ratio must be positive, got {overload_ratio}"
            )));
        }
        Ok(Self { overload_ratio })
    }
}

impl AlertRule for PowerOverloadRule {
    fn name(&self) -> &'static str {
        "power_overload"
    }

    fn check(&self, device: &Device, sample: &TelemetrySample) -> Option<AlertEvent> {
        let threshold = device.rated_power_w * self.overload_ratio;

        // Boundary equality is still within rating; only strictly above fires.
        if sample.power <= threshold {
            return None;
        }

        let description = format!(
            "Power overload on device [{}]: measured {:.2} W exceeds threshold {:.2} W \
             (rated {:.2} W x {:.0}%)",
            device.name,
            sample.power,
            threshold,
            device.rated_power_w,
            self.overload_ratio * 100.0
        );

        Some(AlertEvent::new(
            device.id,
            AlertKind::PowerOverload,
            sample.power,
            threshold,
            description,
            sample.collected_at,
        ))
    }
}

// ---------------------------------------------------------------------------
// VoltageRangeRule
// ---------------------------------------------------------------------------

/// Fires `VoltageLow` below the lower bound, `VoltageHigh` above the upper.
///
/// The two conditions are mutually exclusive by construction: `new` enforces
/// `min < STANDARD_VOLTAGE < max`.
pub struct VoltageRangeRule {
    min_voltage: f64,
    max_voltage: f64,
}

impl VoltageRangeRule {
    pub fn new(min_voltage: f64, max_voltage: f64) -> Result<Self, CoreError> {
        if !min_voltage.is_finite()
            || !max_voltage.is_finite()
            || min_voltage >= STANDARD_VOLTAGE
            || max_voltage <= STANDARD_VOLTAGE
        {
            return Err(CoreError::Validation(format!(
                "Voltage bounds must satisfy min < {STANDARD_VOLTAGE} < max, \
                 got [{min_voltage}, {max_voltage}]"
            )));
        }
        Ok(Self {
            min_voltage,
            max_voltage,
        })
    }
}

impl AlertRule for VoltageRangeRule {
    fn name(&self) -> &'static str {
        "voltage_range"
    }

    fn check(&self, device: &Device, sample: &TelemetrySample) -> Option<AlertEvent> {
        let voltage = sample.voltage;

        if voltage < self.min_voltage {
            let description = format!(
                "Voltage low on device [{}]: measured {:.2} V below lower bound {:.2} V \
                 ({:.0}% of standard {:.0} V)",
                device.name,
                voltage,
                self.min_voltage,
                self.min_voltage / STANDARD_VOLTAGE * 100.0,
                STANDARD_VOLTAGE
            );
            return Some(AlertEvent::new(
                device.id,
                AlertKind::VoltageLow,
                voltage,
                self.min_voltage,
                description,
                sample.collected_at,
            ));
        }

        if voltage > self.max_voltage {
            let description = format!(
                "Voltage high on device [{}]: measured {:.2} V above upper bound {:.2} V \
                 ({:.0}% of standard {:.0} V)",
                device.name,
                voltage,
                self.max_voltage,
                self.max_voltage / STANDARD_VOLTAGE * 100.0,
                STANDARD_VOLTAGE
            );
            return Some(AlertEvent::new(
                device.id,
                AlertKind::VoltageHigh,
                voltage,
                self.max_voltage,
                description,
                sample.collected_at,
            ));
        }

        None
    }
}

// ---------------------------------------------------------------------------
// RuleEngine
// ---------------------------------------------------------------------------

/// Ordered, immutable set of anomaly rules built once at startup.
///
/// Rules are independent: the order never changes which alerts fire, only
/// the enumeration order of the returned events.
pub struct RuleEngine {
    rules: Vec<Box<dyn AlertRule>>,
}

impl RuleEngine {
    /// Build an engine from an explicit rule list.
    pub fn new(rules: Vec<Box<dyn AlertRule>>) -> Self {
        Self { rules }
    }

    /// Build the engine with both built-in rules from validated thresholds.
    pub fn with_thresholds(
        overload_ratio: f64,
        min_voltage: f64,
        max_voltage: f64,
    ) -> Result<Self, CoreError> {
        Ok(Self::new(vec![
            Box::new(PowerOverloadRule::new(overload_ratio)?),
            Box::new(VoltageRangeRule::new(min_voltage, max_voltage)?),
        ]))
    }

    /// Number of installed rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluate every rule against one sample.
    pub fn evaluate(&self, device: &Device, sample: &TelemetrySample) -> Vec<AlertEvent> {
        self.rules
            .iter()
            .filter_map(|rule| rule.check(device, sample))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
