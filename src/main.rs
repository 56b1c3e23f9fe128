//! Focus pipeline daemon.
//!
//! Runs the consumer side of the pipeline: the streak tracker and the
//! goal aggregator each read the session-events topic under their own
//! consumer group, plus a retention job pruning the session log. The
//! session recorder itself is library API driven by the upstream
//! request layer.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use aggregate_cache::MemoryCache;
use event_channel::{ChannelConfig, ChannelConsumer};
use focus_services::{EventWorker, GoalAggregator, StreakTracker, WorkerConfig, WorkerScheduler};
use focus_store::MemoryStore;
use telemetry::init_tracing_from_env;

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    channel: ChannelConfig,

    /// Maximum aggregate-cache entries
    #[serde(default = "default_cache_capacity")]
    cache_capacity: u64,
}

fn default_cache_capacity() -> u64 {
    100_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: ChannelConfig::default(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // rustls 0.23+ requires explicit crypto provider selection before
    // any TLS operations
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting focus pipeline v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    info!(brokers = ?config.channel.brokers, "loaded channel config");

    // The durable stores are collaborators; the in-memory store backs
    // all three here, explicitly constructed and injected.
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(MemoryCache::new(config.cache_capacity));

    let streaks = Arc::new(StreakTracker::new(store.clone(), cache.clone()));
    let goals = Arc::new(GoalAggregator::new(store.clone()));

    // Independent consumer groups: each service observes the full
    // event stream on its own offset.
    let streak_consumer = Arc::new(ChannelConsumer::new(
        config.channel.consumer_for("streak-tracker"),
        &config.channel,
    ));
    let goal_consumer = Arc::new(ChannelConsumer::new(
        config.channel.consumer_for("goal-aggregator"),
        &config.channel,
    ));

    let scheduler = Arc::new(
        WorkerScheduler::new(WorkerConfig::default(), store.clone())
            .with_event_worker(EventWorker::new(streak_consumer, streaks))
            .with_event_worker(EventWorker::new(goal_consumer, goals)),
    );
    let handles = scheduler.start();

    shutdown_signal().await;

    info!("Shutting down...");
    for handle in handles {
        handle.abort();
    }

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("FOCUS")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested channel config; the config crate's
    // nested parsing is unreliable with underscored field names.
    if let Ok(brokers) = std::env::var("FOCUS_CHANNEL_BROKERS") {
        config.channel.brokers = brokers.split(',').map(|s| s.trim().to_string()).collect();
    }
    if let Ok(username) = std::env::var("FOCUS_CHANNEL_SASL_USERNAME") {
        config.channel.sasl_username = Some(username);
    }
    if let Ok(password) = std::env::var("FOCUS_CHANNEL_SASL_PASSWORD") {
        config.channel.sasl_password = Some(password);
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
