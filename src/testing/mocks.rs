//! Mock implementations for testing
//!
//! Provides mock Publisher and PduDecoder implementations to exercise the
//! pipeline without an MQTT broker or real PDUs.

use crate::pdu::{DecodeError, PduDecoder};
use crate::sms::{DecodedSms, SenderAddress};
use crate::transport::{PublishError, Publisher};
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type PublishedMessage = (String, Bytes);

/// Mock publisher for testing
///
/// Clones share the recorded history, so a test can keep one handle while the
/// pipeline owns another.
#[derive(Debug, Default, Clone)]
pub struct MockPublisher {
    pub published_messages: Arc<Mutex<Vec<PublishedMessage>>>,
    pub attempts: Arc<AtomicUsize>,
    pub failure: Option<PublishError>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every publish attempt fails with `error`
    pub fn with_failure(error: PublishError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    pub async fn get_published_messages(&self) -> Vec<PublishedMessage> {
        self.published_messages.lock().await.clone()
    }

    /// Published payloads parsed back into JSON
    pub async fn get_published_json(&self) -> Vec<(String, serde_json::Value)> {
        self.published_messages
            .lock()
            .await
            .iter()
            .map(|(topic, payload)| {
                let value = serde_json::from_slice(payload).unwrap_or(serde_json::Value::Null);
                (topic.clone(), value)
            })
            .collect()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), PublishError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let mut messages = self.published_messages.lock().await;
        messages.push((topic.to_string(), payload));
        Ok(())
    }
}

/// Mock decoder returning a canned result for every PDU
#[derive(Debug, Clone)]
pub struct MockDecoder {
    result: Result<DecodedSms, DecodeError>,
    calls: Arc<AtomicUsize>,
}

impl MockDecoder {
    pub fn returning(sms: DecodedSms) -> Self {
        Self {
            result: Ok(sms),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(error: DecodeError) -> Self {
        Self {
            result: Err(error),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PduDecoder for MockDecoder {
    fn decode(&self, _pdu: &str) -> Result<DecodedSms, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// A decoded SMS with the given sender and body
pub fn sample_sms(sender: Option<&str>, body: &str) -> DecodedSms {
    let mut sms = DecodedSms::new(SenderAddress {
        number: sender.map(str::to_string),
        extra: serde_json::Map::new(),
    });
    sms.fields
        .insert("user_data".to_string(), json!({ "data": body }));
    sms
}
