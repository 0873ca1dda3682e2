//! Transport layer for publishing decoded messages
//!
//! The pipeline only depends on [`Publisher`]; the MQTT implementation lives
//! in [`mqtt`] and tests substitute [`crate::testing::MockPublisher`].

use bytes::Bytes;

pub mod mqtt;

pub use mqtt::PublishError;

/// Delivers one payload to a topic
///
/// Implementations return only after the broker acknowledged the message.
/// Every error is treated as fatal by the pipeline.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), PublishError>;
}
