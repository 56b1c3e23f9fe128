//! Event channel configuration.

use serde::{Deserialize, Serialize};

use crate::topics;

/// Broker connection configuration shared by producers and consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Broker addresses
    pub brokers: Vec<String>,
    /// SASL username (for managed clusters)
    #[serde(default)]
    pub sasl_username: Option<String>,
    /// SASL password (for managed clusters)
    #[serde(default)]
    pub sasl_password: Option<String>,
    #[serde(default)]
    pub consumer: ConsumerConfig,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".to_string()],
            sasl_username: None,
            sasl_password: None,
            consumer: ConsumerConfig::default(),
        }
    }
}

impl ChannelConfig {
    /// Returns the broker list as a comma-separated string.
    pub fn broker_string(&self) -> String {
        self.brokers.join(",")
    }

    /// Consumer configuration for a specific consumer group. Each
    /// subscriber service reads the topic under its own group id.
    pub fn consumer_for(&self, group_id: impl Into<String>) -> ConsumerConfig {
        ConsumerConfig {
            group_id: group_id.into(),
            ..self.consumer.clone()
        }
    }
}

/// Consumer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerConfig {
    #[serde(default = "default_group_id")]
    pub group_id: String,
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Maximum events fetched per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Maximum time to wait for a batch in milliseconds
    #[serde(default = "default_batch_timeout_ms")]
    pub batch_timeout_ms: u64,
}

fn default_group_id() -> String {
    "focus-pipeline".to_string()
}

fn default_topic() -> String {
    topics::SESSION_EVENTS.to_string()
}

fn default_batch_size() -> usize {
    500
}

fn default_batch_timeout_ms() -> u64 {
    1000
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            group_id: default_group_id(),
            topic: default_topic(),
            batch_size: default_batch_size(),
            batch_timeout_ms: default_batch_timeout_ms(),
        }
    }
}
