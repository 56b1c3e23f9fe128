//! Event channel: at-least-once publish/subscribe over Kafka-compatible
//! brokers.
//!
//! Records are keyed by user id so per-user order is preserved;
//! cross-user order is unspecified. Delivery is at-least-once:
//! consumers commit offsets only after handling a batch, so handlers
//! must tolerate redelivery.

pub mod config;
pub mod consumer;
pub mod producer;
pub mod topics;

pub use config::*;
pub use consumer::*;
pub use producer::*;
pub use topics::*;
