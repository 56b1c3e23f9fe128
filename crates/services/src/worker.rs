//! Event consumer worker: fetch → handle → commit.
//!
//! The offset commits only after the batch is handled, so every event
//! is delivered at least once and handlers must tolerate redelivery.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use event_channel::ChannelConsumer;
use focus_core::{Error, Result, SessionRecorded};

/// Handler for session events. Implemented by the streak tracker and
/// the goal aggregator, each behind its own consumer group.
#[async_trait]
pub trait SessionEventHandler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &SessionRecorded) -> Result<()>;
}

/// Event worker configuration.
#[derive(Debug, Clone)]
pub struct EventWorkerConfig {
    /// Maximum retries per event before giving up
    pub max_retries: u32,
    /// Backoff between retries
    pub retry_backoff: Duration,
    /// Whether to skip an event that keeps failing (and still commit)
    pub skip_on_failure: bool,
    /// Pause when the topic is idle
    pub idle_backoff: Duration,
}

impl Default for EventWorkerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff: Duration::from_millis(100),
            skip_on_failure: true,
            idle_backoff: Duration::from_millis(250),
        }
    }
}

/// Worker that drains a channel consumer into a handler.
pub struct EventWorker {
    consumer: Arc<ChannelConsumer>,
    handler: Arc<dyn SessionEventHandler>,
    config: EventWorkerConfig,
}

impl EventWorker {
    pub fn new(consumer: Arc<ChannelConsumer>, handler: Arc<dyn SessionEventHandler>) -> Self {
        Self {
            consumer,
            handler,
            config: EventWorkerConfig::default(),
        }
    }

    pub fn with_config(
        consumer: Arc<ChannelConsumer>,
        handler: Arc<dyn SessionEventHandler>,
        config: EventWorkerConfig,
    ) -> Self {
        Self {
            consumer,
            handler,
            config,
        }
    }

    /// Main run loop. Runs indefinitely.
    pub async fn run(&self) -> Result<()> {
        info!(
            handler = self.handler.name(),
            topic = %self.consumer.config().topic,
            group_id = %self.consumer.config().group_id,
            "event worker starting"
        );

        loop {
            match self.process_batch().await {
                Ok(0) => {
                    tokio::time::sleep(self.config.idle_backoff).await;
                }
                Ok(count) => {
                    debug!(handler = self.handler.name(), count, "processed batch");
                }
                Err(e) => {
                    error!(handler = self.handler.name(), "batch processing error: {e}");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    self.consumer.reset_connection().await;
                }
            }
        }
    }

    /// Processes a single batch: fetch → handle each event → commit.
    async fn process_batch(&self) -> Result<usize> {
        let (events, offset) = self.consumer.fetch_batch().await?;

        if events.is_empty() {
            return Ok(0);
        }

        let count = events.len();

        for event in &events {
            if let Err(e) = self.handle_with_retry(event).await {
                if self.config.skip_on_failure {
                    // Skip and commit anyway to avoid wedging the
                    // partition on one poisoned event.
                    warn!(
                        handler = self.handler.name(),
                        user = %event.user_id,
                        error = %e,
                        "skipping event after retries"
                    );
                } else {
                    return Err(e);
                }
            }
        }

        if let Some(offset) = offset {
            self.consumer.commit(offset).await?;
        }

        Ok(count)
    }

    /// Handles one event with retry and linear backoff.
    async fn handle_with_retry(&self, event: &SessionRecorded) -> Result<()> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = self.config.retry_backoff * attempt;
                warn!(
                    handler = self.handler.name(),
                    attempt,
                    backoff_ms = %backoff.as_millis(),
                    "retrying event"
                );
                tokio::time::sleep(backoff).await;
            }

            match self.handler.handle(event).await {
                Ok(()) => return Ok(()),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| Error::internal("handler failed with unknown error")))
    }
}
