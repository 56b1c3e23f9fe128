//! Background worker scheduler.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info};

use focus_store::SessionStore;

use crate::retention::RetentionWorker;
use crate::worker::EventWorker;

/// Worker scheduler configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Retention check interval
    pub retention_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            retention_interval: Duration::from_secs(3600),
        }
    }
}

/// Spawns the event consumer workers and the retention job.
pub struct WorkerScheduler {
    config: WorkerConfig,
    sessions: Arc<dyn SessionStore>,
    event_workers: Vec<Arc<EventWorker>>,
}

impl WorkerScheduler {
    pub fn new(config: WorkerConfig, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            config,
            sessions,
            event_workers: Vec::new(),
        }
    }

    /// Registers an event worker to run on start.
    pub fn with_event_worker(mut self, worker: EventWorker) -> Self {
        self.event_workers.push(Arc::new(worker));
        self
    }

    /// Starts all background workers.
    pub fn start(self: Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        let mut handles = Vec::new();

        for worker in &self.event_workers {
            let worker = worker.clone();
            handles.push(tokio::spawn(async move {
                if let Err(e) = worker.run().await {
                    error!("event worker fatal error: {e}");
                }
            }));
        }

        let scheduler = self.clone();
        handles.push(tokio::spawn(async move {
            scheduler.run_retention_worker().await;
        }));

        info!(
            event_workers = self.event_workers.len(),
            "background workers started"
        );
        handles
    }

    async fn run_retention_worker(&self) {
        let worker = RetentionWorker::new(self.sessions.clone());
        let mut ticker = interval(self.config.retention_interval);

        loop {
            ticker.tick().await;

            if let Err(e) = worker.run().await {
                error!("retention worker error: {e}");
            }
        }
    }
}
