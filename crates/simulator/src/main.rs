use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridpulse_core::rules::RuleEngine;
use gridpulse_events::{AlertBus, DatabaseSink, LogSink, WebhookSink};
use gridpulse_simulator::config::SimulatorConfig;
use gridpulse_simulator::scheduler::Simulator;
use gridpulse_simulator::store::{PgDeviceRegistry, PgSampleStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridpulse_simulator=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SimulatorConfig::from_env()?;
    tracing::info!(
        enabled = config.enabled,
        interval_secs = config.interval.as_secs(),
        anomaly_frequency = config.anomaly_frequency,
        "Simulator configuration loaded"
    );

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = gridpulse_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    gridpulse_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database connection pool created");

    gridpulse_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let rules = RuleEngine::with_thresholds(
        config.overload_ratio,
        config.min_voltage,
        config.max_voltage,
    )?;

    let bus = Arc::new(AlertBus::new());
    bus.register(Arc::new(DatabaseSink::new(pool.clone())));
    bus.register(Arc::new(LogSink));
    if let Some(webhook) = WebhookSink::from_env() {
        bus.register(Arc::new(webhook));
    }
    tracing::info!(sinks = bus.sink_count(), "Alert sinks registered");

    let simulator = Simulator::new(
        Arc::new(PgDeviceRegistry::new(pool.clone())),
        Arc::new(PgSampleStore::new(pool)),
        rules,
        bus,
        config,
    );

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    simulator.run(cancel).await;
    Ok(())
}
