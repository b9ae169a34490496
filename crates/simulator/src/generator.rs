//! Telemetry sample generators.
//!
//! Two variants over one capability: [`NormalGenerator`] produces readings
//! that follow the physical model of a healthy meter, and
//! [`AbnormalGenerator`] injects one of three fault envelopes to exercise
//! the alerting path. Randomness is injected so tests can pin outcomes with
//! a seeded source.

use std::time::Duration;

use chrono::{DateTime, Local, Timelike, Utc};
use rand::{Rng, RngCore};

use gridpulse_core::device::Device;
use gridpulse_core::rules::STANDARD_VOLTAGE;
use gridpulse_core::telemetry::{round2, round3, TelemetrySample};

/// Standard deviation of healthy voltage noise (V).
const VOLTAGE_STDEV: f64 = 7.5;

/// Healthy voltage clamp range (V).
const VOLTAGE_MIN: f64 = 210.0;
const VOLTAGE_MAX: f64 = 235.0;

/// First hour (inclusive) of the daytime load window.
const DAY_START_HOUR: u32 = 8;

/// First hour (exclusive) after the daytime load window.
const DAY_END_HOUR: u32 = 22;

/// Standby power range for the night window (W).
const NIGHT_POWER_MIN: f64 = 10.0;
const NIGHT_POWER_MAX: f64 = 100.0;

/// Produces one telemetry sample for a device.
pub trait TelemetryGenerator: Send + Sync {
    /// Generate a sample from the device's rating, its last cumulative
    /// energy reading, and the collection time.
    fn generate(
        &self,
        device: &Device,
        last_total_energy: f64,
        now: DateTime<Local>,
        rng: &mut dyn RngCore,
    ) -> TelemetrySample;
}

/// Sample one value from `Normal(mean, stdev)` via the Box–Muller transform
/// over two uniform draws. No distribution crate needed for a single shape.
fn sample_gaussian(rng: &mut dyn RngCore, mean: f64, stdev: f64) -> f64 {
    // Shift into (0, 1] so the logarithm stays finite.
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + stdev * z
}

/// Assemble a sample from raw voltage and power draws.
///
/// Applies the shared physics: `I = P / U`, the interval energy increment
/// `(P / 1000) * (interval / 3600)`, and the display rounding (2 decimals
/// for V/A/W, 3 for kWh).
fn assemble(
    device: &Device,
    last_total_energy: f64,
    now: DateTime<Local>,
    interval_secs: f64,
    voltage: f64,
    power: f64,
    abnormal: bool,
) -> TelemetrySample {
    let voltage = round2(voltage);
    let power = round2(power);
    let increment = (power / 1000.0) * (interval_secs / 3600.0);

    TelemetrySample {
        device_id: device.id,
        voltage,
        current: round2(power / voltage),
        power,
        total_energy: round3(last_total_energy + increment),
        collected_at: now.with_timezone(&Utc),
        abnormal,
    }
}

// ---------------------------------------------------------------------------
// NormalGenerator
// ---------------------------------------------------------------------------

/// Healthy-meter readings.
///
/// Voltage follows `Normal(220, 7.5)` clamped to `[210, 235]` V. Power
/// tracks the time of day: 20–90% of the rated power during the daytime
/// window (08:00–22:00 local), 10–100 W standby draw at night.
pub struct NormalGenerator {
    interval_secs: f64,
}

impl NormalGenerator {
    /// Create a generator assuming the given sampling interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_secs: interval.as_secs_f64(),
        }
    }
}

impl TelemetryGenerator for NormalGenerator {
    fn generate(
        &self,
        device: &Device,
        last_total_energy: f64,
        now: DateTime<Local>,
        rng: &mut dyn RngCore,
    ) -> TelemetrySample {
        let voltage =
            sample_gaussian(rng, STANDARD_VOLTAGE, VOLTAGE_STDEV).clamp(VOLTAGE_MIN, VOLTAGE_MAX);

        let hour = now.hour();
        let power = if (DAY_START_HOUR..DAY_END_HOUR).contains(&hour) {
            rng.random_range(0.2 * device.rated_power_w..0.9 * device.rated_power_w)
        } else {
            rng.random_range(NIGHT_POWER_MIN..NIGHT_POWER_MAX)
        };

        assemble(
            device,
            last_total_energy,
            now,
            self.interval_secs,
            voltage,
            power,
            false,
        )
    }
}

// ---------------------------------------------------------------------------
// AbnormalGenerator
// ---------------------------------------------------------------------------

/// The fault envelopes the abnormal generator can inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaultKind {
    /// Power at 120–150% of rating, voltage nominal.
    PowerOverload,
    /// Voltage sagged to 170–190 V, load at 30–60% of rating.
    Undervoltage,
    /// Voltage surged to 250–270 V, load at 30–60% of rating.
    Overvoltage,
}

/// Fault-injection readings for exercising the alert rules.
pub struct AbnormalGenerator {
    interval_secs: f64,
}

impl AbnormalGenerator {
    /// Create a generator assuming the given sampling interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_secs: interval.as_secs_f64(),
        }
    }
}

impl TelemetryGenerator for AbnormalGenerator {
    fn generate(
        &self,
        device: &Device,
        last_total_energy: f64,
        now: DateTime<Local>,
        rng: &mut dyn RngCore,
    ) -> TelemetrySample {
        let fault = match rng.random_range(0..3) {
            0 => FaultKind::PowerOverload,
            1 => FaultKind::Undervoltage,
            _ => FaultKind::Overvoltage,
        };

        let (voltage, power) = match fault {
            FaultKind::PowerOverload => (
                sample_gaussian(rng, STANDARD_VOLTAGE, 5.0),
                device.rated_power_w * rng.random_range(1.2..1.5),
            ),
            FaultKind::Undervoltage => (
                rng.random_range(170.0..190.0),
                device.rated_power_w * rng.random_range(0.3..0.6),
            ),
            FaultKind::Overvoltage => (
                rng.random_range(250.0..270.0),
                device.rated_power_w * rng.random_range(0.3..0.6),
            ),
        };

        assemble(
            device,
            last_total_energy,
            now,
            self.interval_secs,
            voltage,
            power,
            true,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
