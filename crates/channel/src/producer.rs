//! Publish side of the event channel.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rskafka::client::{
    partition::{Compression, UnknownTopicHandling},
    ClientBuilder, Credentials, SaslConfig,
};
use rskafka::record::Record;
use tokio::sync::RwLock;
use tracing::debug;

use focus_core::{Error, Result, SessionRecorded};

use crate::config::ChannelConfig;

/// Publisher for cross-service signals. A success means the broker
/// acknowledged the record; from the caller's view delivery is
/// best-effort and never a reason to roll back a durable write.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, event: &SessionRecorded) -> Result<()>;
}

/// Creates a TLS configuration for managed brokers.
pub(crate) fn tls_config() -> Arc<rustls::ClientConfig> {
    let root_store =
        rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Arc::new(config)
}

/// Kafka-backed publisher.
pub struct KafkaPublisher {
    config: ChannelConfig,
    /// Cached partition clients per topic
    clients: RwLock<BTreeMap<String, Arc<rskafka::client::partition::PartitionClient>>>,
}

impl KafkaPublisher {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            clients: RwLock::new(BTreeMap::new()),
        }
    }

    /// Gets or creates a partition client for a topic.
    async fn client_for(
        &self,
        topic: &str,
    ) -> Result<Arc<rskafka::client::partition::PartitionClient>> {
        {
            let clients = self.clients.read().await;
            if let Some(client) = clients.get(topic) {
                return Ok(client.clone());
            }
        }

        let connection = self.config.broker_string();
        let mut builder = ClientBuilder::new(vec![connection]);

        if let (Some(username), Some(password)) =
            (&self.config.sasl_username, &self.config.sasl_password)
        {
            builder = builder
                .tls_config(tls_config())
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
            .partition_client(topic.to_string(), 0, UnknownTopicHandling::Error)
            .await
            .map_err(|e| Error::channel(format!("failed to get partition client: {e}")))?;

        let partition_client = Arc::new(partition_client);

        {
            let mut clients = self.clients.write().await;
            clients.insert(topic.to_string(), partition_client.clone());
        }

        Ok(partition_client)
    }
}

#[async_trait]
impl EventPublisher for KafkaPublisher {
    async fn publish(&self, topic: &str, event: &SessionRecorded) -> Result<()> {
        let client = self.client_for(topic).await?;

        let record = Record {
            // Keyed by user id: per-user order depends on it.
            key: Some(event.partition_key().as_bytes().to_vec()),
            value: Some(serde_json::to_vec(event)?),
            headers: BTreeMap::new(),
            timestamp: Utc::now(),
        };

        client
            .produce(vec![record], Compression::NoCompression)
            .await
            .map_err(|e| Error::channel(format!("produce failed: {e}")))?;

        debug!(topic, user = %event.user_id, advance_streak = event.advance_streak, "published session event");
        Ok(())
    }
}
