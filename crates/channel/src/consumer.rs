//! Subscribe side of the event channel.
//!
//! Manual offset management gives at-least-once delivery: the offset
//! advances only after the caller commits a processed batch, so a
//! crash mid-batch redelivers it.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rskafka::client::{
    partition::{OffsetAt, UnknownTopicHandling},
    ClientBuilder, Credentials, SaslConfig,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use focus_core::{Error, Result, SessionRecorded};

use crate::config::{ChannelConfig, ConsumerConfig};

/// Offset tracking for manual commit.
#[derive(Debug, Clone, Copy)]
pub struct Offset {
    pub partition: i32,
    pub offset: i64,
}

/// Consumer for session events.
pub struct ChannelConsumer {
    config: ConsumerConfig,
    brokers: Vec<String>,
    sasl_username: Option<String>,
    sasl_password: Option<String>,
    /// Partition client (currently only partition 0)
    partition_client: RwLock<Option<Arc<rskafka::client::partition::PartitionClient>>>,
    /// Next offset to read
    current_offset: AtomicI64,
    initialized: AtomicBool,
}

impl ChannelConsumer {
    /// Creates a consumer reading the configured topic under
    /// `config.group_id`.
    pub fn new(config: ConsumerConfig, channel: &ChannelConfig) -> Self {
        info!(
            group_id = %config.group_id,
            topic = %config.topic,
            batch_size = config.batch_size,
            "creating channel consumer"
        );

        Self {
            config,
            brokers: channel.brokers.clone(),
            sasl_username: channel.sasl_username.clone(),
            sasl_password: channel.sasl_password.clone(),
            partition_client: RwLock::new(None),
            current_offset: AtomicI64::new(-1),
            initialized: AtomicBool::new(false),
        }
    }

    /// Initializes the consumer connection.
    async fn ensure_connected(&self) -> Result<Arc<rskafka::client::partition::PartitionClient>> {
        {
            let client = self.partition_client.read().await;
            if let Some(ref c) = *client {
                return Ok(c.clone());
            }
        }

        let connection = self.brokers.join(",");
        let mut builder = ClientBuilder::new(vec![connection]);

        if let (Some(username), Some(password)) = (&self.sasl_username, &self.sasl_password) {
            builder = builder
                .tls_config(crate::producer::tls_config())
                .sasl_config(SaslConfig::ScramSha256(Credentials::new(
                    username.clone(),
                    password.clone(),
                )));
        }

        let client = builder
            .build()
            .await
            .map_err(|e| Error::channel(format!("failed to connect: {e}")))?;

        let partition_client = client
            .partition_client(self.config.topic.clone(), 0, UnknownTopicHandling::Error)
            .await
            .map_err(|e| Error::channel(format!("failed to get partition client: {e}")))?;

        let partition_client = Arc::new(partition_client);

        // New consumers start at the latest offset; replaying history
        // would double-apply streak and goal updates.
        if !self.initialized.load(Ordering::SeqCst) {
            let offset = partition_client
                .get_offset(OffsetAt::Latest)
                .await
                .map_err(|e| Error::channel(format!("failed to get offset: {e}")))?;

            self.current_offset.store(offset, Ordering::SeqCst);
            self.initialized.store(true, Ordering::SeqCst);

            info!(
                topic = %self.config.topic,
                partition = 0,
                offset,
                "consumer initialized at offset"
            );
        }

        {
            let mut client_guard = self.partition_client.write().await;
            *client_guard = Some(partition_client.clone());
        }

        Ok(partition_client)
    }

    /// Fetches a batch of session events.
    ///
    /// Returns the events and the offset to commit after processing.
    pub async fn fetch_batch(&self) -> Result<(Vec<SessionRecorded>, Option<Offset>)> {
        let client = self.ensure_connected().await?;

        let timeout = Duration::from_millis(self.config.batch_timeout_ms);
        let max_bytes = self.config.batch_size * 1024;

        let current = self.current_offset.load(Ordering::SeqCst);

        let (records, _watermark) = client
            .fetch_records(current, 1..max_bytes as i32, timeout.as_millis() as i32)
            .await
            .map_err(|e| {
                error!("fetch error: {e}");
                Error::channel(format!("failed to fetch records: {e}"))
            })?;

        if records.is_empty() {
            return Ok((Vec::new(), None));
        }

        let mut events = Vec::with_capacity(records.len());
        let mut max_offset = current;

        for record in records {
            max_offset = record.offset.max(max_offset);

            if let Some(value) = record.record.value {
                match serde_json::from_slice::<SessionRecorded>(&value) {
                    Ok(event) => events.push(event),
                    Err(e) => {
                        // Skip and keep going: one malformed record must
                        // not wedge the whole partition.
                        warn!(offset = record.offset, error = %e, "failed to deserialize session event");
                    }
                }
            }
        }

        debug!(
            events = events.len(),
            offset_start = current,
            offset_end = max_offset,
            "fetched batch"
        );

        let commit_offset = if !events.is_empty() || max_offset > current {
            Some(Offset {
                partition: 0,
                offset: max_offset + 1,
            })
        } else {
            None
        };

        Ok((events, commit_offset))
    }

    /// Commits an offset after successful processing.
    pub async fn commit(&self, offset: Offset) -> Result<()> {
        let prev = self.current_offset.swap(offset.offset, Ordering::SeqCst);

        debug!(
            partition = offset.partition,
            prev_offset = prev,
            new_offset = offset.offset,
            "committed offset"
        );

        Ok(())
    }

    /// Returns the consumer configuration.
    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Resets the connection (for error recovery).
    pub async fn reset_connection(&self) {
        let mut client = self.partition_client.write().await;
        *client = None;
        info!(group_id = %self.config.group_id, "consumer connection reset");
    }
}
