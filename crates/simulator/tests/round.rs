//! Scheduler round behavior over in-memory collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use gridpulse_core::alert::AlertEvent;
use gridpulse_core::device::{Device, DeviceStatus};
use gridpulse_core::rules::RuleEngine;
use gridpulse_core::telemetry::TelemetrySample;
use gridpulse_core::types::DbId;
use gridpulse_events::{AlertBus, AlertSink, SinkError};
use gridpulse_simulator::config::SimulatorConfig;
use gridpulse_simulator::scheduler::{RoundOutcome, Simulator};
use gridpulse_simulator::store::{DeviceRegistry, SampleStore, StoreError};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct FakeRegistry {
    devices: Vec<Device>,
}

#[async_trait]
impl DeviceRegistry for FakeRegistry {
    async fn list_online_devices(&self) -> Result<Vec<Device>, StoreError> {
        Ok(self
            .devices
            .iter()
            .filter(|d| d.status == DeviceStatus::Online)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct MemoryStore {
    samples: Mutex<Vec<TelemetrySample>>,
    /// Persisting samples for this device fails, to exercise isolation.
    fail_device: Option<DbId>,
}

#[async_trait]
impl SampleStore for MemoryStore {
    async fn last_total_energy(&self, device_id: DbId) -> Result<f64, StoreError> {
        Ok(self
            .samples
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.device_id == device_id)
            .map(|s| s.total_energy)
            .unwrap_or(0.0))
    }

    async fn save_sample(&self, sample: &TelemetrySample) -> Result<(), StoreError> {
        if self.fail_device == Some(sample.device_id) {
            return Err(StoreError::Other("disk full".to_string()));
        }
        self.samples.lock().unwrap().push(sample.clone());
        Ok(())
    }
}

/// Store whose first read blocks until released, to hold a round open.
struct GatedStore {
    entered: tokio::sync::Notify,
    release: tokio::sync::Notify,
}

#[async_trait]
impl SampleStore for GatedStore {
    async fn last_total_energy(&self, _device_id: DbId) -> Result<f64, StoreError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(0.0)
    }

    async fn save_sample(&self, _sample: &TelemetrySample) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Default)]
struct CountingSink {
    alerts: Mutex<Vec<AlertEvent>>,
}

#[async_trait]
impl AlertSink for CountingSink {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn notify(&self, alert: &AlertEvent) -> Result<(), SinkError> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn device(id: DbId, status: DeviceStatus) -> Device {
    Device {
        id,
        name: format!("Meter {id}"),
        serial_number: format!("METER_{id:03}"),
        status,
        rated_power_w: 1000.0,
        location: None,
    }
}

fn rules() -> RuleEngine {
    RuleEngine::with_thresholds(1.2, 198.0, 242.0).unwrap()
}

fn config(anomaly_frequency: u64) -> SimulatorConfig {
    SimulatorConfig {
        anomaly_frequency,
        ..SimulatorConfig::default()
    }
}

fn build(
    devices: Vec<Device>,
    store: Arc<MemoryStore>,
    sink: Arc<CountingSink>,
    anomaly_frequency: u64,
) -> Simulator {
    let bus = Arc::new(AlertBus::new());
    bus.register(sink);
    Simulator::new(
        Arc::new(FakeRegistry { devices }),
        store,
        rules(),
        bus,
        config(anomaly_frequency),
    )
    .with_rng_seed(42)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn round_touches_only_online_devices() {
    let store = Arc::new(MemoryStore::default());
    let sink = Arc::new(CountingSink::default());
    let simulator = build(
        vec![
            device(1, DeviceStatus::Online),
            device(2, DeviceStatus::Online),
            device(3, DeviceStatus::Online),
            device(4, DeviceStatus::Offline),
        ],
        Arc::clone(&store),
        sink,
        1000,
    );

    let outcome = simulator.trigger_once().await;
    assert!(matches!(outcome, RoundOutcome::Completed { generated: 3, .. }));
    assert_eq!(simulator.generated_sample_count(), 3);

    let samples = store.samples.lock().unwrap();
    assert_eq!(samples.len(), 3);
    assert!(samples.iter().all(|s| s.device_id != 4));
}

#[tokio::test]
async fn anomaly_cadence_follows_global_counter() {
    let store = Arc::new(MemoryStore::default());
    let sink = Arc::new(CountingSink::default());
    let simulator = build(
        vec![device(1, DeviceStatus::Online)],
        Arc::clone(&store),
        sink,
        30,
    );

    for _ in 0..60 {
        simulator.trigger_once().await;
    }

    let samples = store.samples.lock().unwrap();
    assert_eq!(samples.len(), 60);
    for (i, sample) in samples.iter().enumerate() {
        let expect_abnormal = (i as u64 + 1) % 30 == 0;
        assert_eq!(
            sample.abnormal,
            expect_abnormal,
            "sample {} has wrong generator variant",
            i + 1
        );
    }
}

#[tokio::test]
async fn failing_device_does_not_abort_round() {
    let store = Arc::new(MemoryStore {
        samples: Mutex::new(Vec::new()),
        fail_device: Some(2),
    });
    let sink = Arc::new(CountingSink::default());
    let simulator = build(
        vec![
            device(1, DeviceStatus::Online),
            device(2, DeviceStatus::Online),
            device(3, DeviceStatus::Online),
        ],
        Arc::clone(&store),
        sink,
        1000,
    );

    let outcome = simulator.trigger_once().await;
    assert!(matches!(outcome, RoundOutcome::Completed { generated: 2, .. }));

    let stored: Vec<DbId> = store
        .samples
        .lock()
        .unwrap()
        .iter()
        .map(|s| s.device_id)
        .collect();
    assert_eq!(stored, vec![1, 3]);
}

#[tokio::test]
async fn disabled_simulator_skips_rounds() {
    let store = Arc::new(MemoryStore::default());
    let sink = Arc::new(CountingSink::default());
    let simulator = build(
        vec![device(1, DeviceStatus::Online)],
        Arc::clone(&store),
        sink,
        1000,
    );

    simulator.set_enabled(false);
    assert!(!simulator.is_enabled());
    assert_eq!(simulator.trigger_once().await, RoundOutcome::SkippedDisabled);
    assert_eq!(simulator.generated_sample_count(), 0);
    assert!(store.samples.lock().unwrap().is_empty());

    simulator.set_enabled(true);
    assert!(matches!(
        simulator.trigger_once().await,
        RoundOutcome::Completed { generated: 1, .. }
    ));
}

#[tokio::test]
async fn colliding_round_is_a_no_op() {
    let store = Arc::new(GatedStore {
        entered: tokio::sync::Notify::new(),
        release: tokio::sync::Notify::new(),
    });
    let bus = Arc::new(AlertBus::new());
    let simulator = Arc::new(
        Simulator::new(
            Arc::new(FakeRegistry {
                devices: vec![device(1, DeviceStatus::Online)],
            }),
            Arc::clone(&store) as Arc<dyn SampleStore>,
            rules(),
            bus,
            config(1000),
        )
        .with_rng_seed(42),
    );

    let background = Arc::clone(&simulator);
    let first = tokio::spawn(async move { background.trigger_once().await });

    // Wait until the first round is inside its collaborator call, then
    // collide with it.
    store.entered.notified().await;
    assert_eq!(simulator.trigger_once().await, RoundOutcome::SkippedBusy);

    store.release.notify_one();
    assert!(matches!(
        first.await.unwrap(),
        RoundOutcome::Completed { generated: 1, .. }
    ));
}

#[tokio::test]
async fn abnormal_round_publishes_alert() {
    let store = Arc::new(MemoryStore::default());
    let sink = Arc::new(CountingSink::default());
    // Frequency 1: every sample comes from the fault generator.
    let simulator = build(
        vec![device(1, DeviceStatus::Online)],
        Arc::clone(&store),
        Arc::clone(&sink),
        1,
    );

    let outcome = simulator.trigger_once().await;
    match outcome {
        RoundOutcome::Completed { generated, alerts } => {
            assert_eq!(generated, 1);
            assert!(alerts >= 1, "fault-injected sample should trip a rule");
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let alerts = sink.alerts.lock().unwrap();
    assert!(!alerts.is_empty());
    assert!(alerts.iter().all(|a| a.device_id == 1));
}

#[tokio::test]
async fn normal_rounds_stay_quiet() {
    let store = Arc::new(MemoryStore::default());
    let sink = Arc::new(CountingSink::default());
    let simulator = build(
        vec![device(1, DeviceStatus::Online)],
        Arc::clone(&store),
        Arc::clone(&sink),
        1000,
    );

    for _ in 0..5 {
        simulator.trigger_once().await;
    }

    let samples = store.samples.lock().unwrap();
    assert!(samples.iter().all(|s| !s.abnormal));
    assert!(sink.alerts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cumulative_energy_never_decreases() {
    let store = Arc::new(MemoryStore::default());
    let sink = Arc::new(CountingSink::default());
    let simulator = build(
        vec![device(1, DeviceStatus::Online)],
        Arc::clone(&store),
        sink,
        7,
    );

    for _ in 0..30 {
        simulator.trigger_once().await;
    }

    let samples = store.samples.lock().unwrap();
    for pair in samples.windows(2) {
        assert!(
            pair[1].total_energy >= pair[0].total_energy,
            "cumulative energy regressed: {} -> {}",
            pair[0].total_energy,
            pair[1].total_energy
        );
    }
}

#[tokio::test]
async fn misconfigured_device_is_skipped_not_fatal() {
    let mut broken = device(2, DeviceStatus::Online);
    broken.rated_power_w = 0.0;

    let store = Arc::new(MemoryStore::default());
    let sink = Arc::new(CountingSink::default());
    let simulator = build(
        vec![device(1, DeviceStatus::Online), broken],
        Arc::clone(&store),
        sink,
        1000,
    );

    let outcome = simulator.trigger_once().await;
    assert!(matches!(outcome, RoundOutcome::Completed { generated: 1, .. }));
    assert!(store
        .samples
        .lock()
        .unwrap()
        .iter()
        .all(|s| s.device_id == 1));
}
