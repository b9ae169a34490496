//! Simulation scheduler.
//!
//! [`Simulator`] drives periodic generation rounds across all online
//! devices: fetch the last cumulative reading, generate a sample (every Nth
//! sample across all devices comes from the fault generator), persist it,
//! evaluate the anomaly rules, and publish any alerts on the bus. The timer
//! loop and the manual trigger funnel into the same round path, which is
//! mutually exclusive — at most one round is in flight at a time, and a
//! colliding attempt is a no-op rather than queued.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use gridpulse_core::device::Device;
use gridpulse_core::rules::RuleEngine;
use gridpulse_events::AlertBus;

use crate::config::SimulatorConfig;
use crate::generator::{AbnormalGenerator, NormalGenerator, TelemetryGenerator};
use crate::store::{DeviceRegistry, SampleStore, StoreError};

/// Outcome of one round attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The round ran to completion.
    Completed {
        /// Samples generated and persisted this round.
        generated: usize,
        /// Alerts published this round.
        alerts: usize,
    },
    /// The simulator is disabled; nothing ran.
    SkippedDisabled,
    /// Another round was already in flight; this attempt was a no-op.
    SkippedBusy,
}

/// Background service generating telemetry for all online devices.
pub struct Simulator {
    registry: Arc<dyn DeviceRegistry>,
    samples: Arc<dyn SampleStore>,
    rules: RuleEngine,
    bus: Arc<AlertBus>,
    config: SimulatorConfig,
    normal: NormalGenerator,
    abnormal: AbnormalGenerator,
    enabled: AtomicBool,
    sample_counter: AtomicU64,
    /// Round-level mutual exclusion; `try_lock` makes a colliding attempt a
    /// no-op instead of queueing it.
    round_lock: Mutex<()>,
    rng: Mutex<StdRng>,
}

impl Simulator {
    /// Wire up the service. The rule engine and config must already be
    /// validated; nothing here can fail.
    pub fn new(
        registry: Arc<dyn DeviceRegistry>,
        samples: Arc<dyn SampleStore>,
        rules: RuleEngine,
        bus: Arc<AlertBus>,
        config: SimulatorConfig,
    ) -> Self {
        Self {
            normal: NormalGenerator::new(config.interval),
            abnormal: AbnormalGenerator::new(config.interval),
            enabled: AtomicBool::new(config.enabled),
            sample_counter: AtomicU64::new(0),
            round_lock: Mutex::new(()),
            rng: Mutex::new(StdRng::from_os_rng()),
            registry,
            samples,
            rules,
            bus,
            config,
        }
    }

    /// Replace the randomness source with a seeded one for reproducible
    /// output.
    pub fn with_rng_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Toggle whether rounds may start.
    ///
    /// Takes effect before the next round; never aborts one in flight.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        tracing::info!(enabled, "Simulator state changed");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Total samples generated since startup, across all devices.
    pub fn generated_sample_count(&self) -> u64 {
        self.sample_counter.load(Ordering::SeqCst)
    }

    /// Run exactly one round immediately, subject to the same mutual
    /// exclusion as the timer.
    pub async fn trigger_once(&self) -> RoundOutcome {
        tracing::info!("Manual generation round triggered");
        self.run_round().await
    }

    /// Run the timer loop until the token is cancelled.
    ///
    /// Cancellation only prevents future rounds; an in-flight round always
    /// finishes.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Simulator cancelled");
                    break;
                }
                _ = interval.tick() => {
                    self.run_round().await;
                }
            }
        }
    }

    /// One generation round over every online device.
    async fn run_round(&self) -> RoundOutcome {
        if !self.is_enabled() {
            tracing::debug!("Simulator disabled, skipping round");
            return RoundOutcome::SkippedDisabled;
        }

        let Ok(_guard) = self.round_lock.try_lock() else {
            tracing::debug!("Round already in flight, skipping");
            return RoundOutcome::SkippedBusy;
        };

        let devices = match self.registry.list_online_devices().await {
            Ok(devices) => devices,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list online devices");
                return RoundOutcome::Completed {
                    generated: 0,
                    alerts: 0,
                };
            }
        };

        if devices.is_empty() {
            tracing::debug!("No online devices, skipping generation");
            return RoundOutcome::Completed {
                generated: 0,
                alerts: 0,
            };
        }

        tracing::debug!(devices = devices.len(), "Starting generation round");

        let mut generated = 0usize;
        let mut alerts = 0usize;
        for device in &devices {
            // A failing device never aborts the rest of the round.
            match self.process_device(device).await {
                Ok(fired) => {
                    generated += 1;
                    alerts += fired;
                }
                Err(e) => {
                    tracing::error!(
                        serial = %device.serial_number,
                        error = %e,
                        "Device sample generation failed"
                    );
                }
            }
        }

        tracing::debug!(
            generated,
            alerts,
            total = self.generated_sample_count(),
            "Generation round complete"
        );
        RoundOutcome::Completed { generated, alerts }
    }

    /// Generate, persist, and evaluate one sample for one device.
    ///
    /// Returns the number of alerts published.
    async fn process_device(&self, device: &Device) -> Result<usize, StoreError> {
        // A non-positive rating is a registry misconfiguration, not a
        // generator failure; skip the device.
        if device.rated_power_w <= 0.0 {
            return Err(StoreError::Other(format!(
                "device {} has non-positive rated power {}",
                device.serial_number, device.rated_power_w
            )));
        }

        let last_total_energy = self.samples.last_total_energy(device.id).await?;
        let count = self.sample_counter.fetch_add(1, Ordering::SeqCst) + 1;

        let sample = {
            let mut rng = self.rng.lock().await;
            if count % self.config.anomaly_frequency == 0 {
                tracing::info!(
                    serial = %device.serial_number,
                    "Fault injection: generating abnormal sample"
                );
                self.abnormal
                    .generate(device, last_total_energy, Local::now(), &mut *rng)
            } else {
                self.normal
                    .generate(device, last_total_energy, Local::now(), &mut *rng)
            }
        };

        self.samples.save_sample(&sample).await?;

        tracing::debug!(
            serial = %device.serial_number,
            voltage = sample.voltage,
            current = sample.current,
            power = sample.power,
            total_energy = sample.total_energy,
            abnormal = sample.abnormal,
            "Sample stored"
        );

        let events = self.rules.evaluate(device, &sample);
        let fired = events.len();
        for alert in events {
            tracing::info!(
                serial = %device.serial_number,
                kind = alert.kind.as_str(),
                "Rule violation detected, publishing alert"
            );
            self.bus.publish(&alert).await;
        }

        Ok(fired)
    }
}
