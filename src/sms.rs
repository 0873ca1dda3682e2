//! Decoded SMS record and its published JSON form
//!
//! Only the fields the gateway itself reads are typed: the sender number and
//! the service centre timestamp. Everything else the decoder produces is
//! carried through untouched and flattened into the payload.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Logged in place of a missing sender number
pub const UNKNOWN_SENDER: &str = "unknown number";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SenderAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedSms {
    #[serde(default)]
    pub sender: SenderAddress,
    /// Service centre timestamp, published as Unix epoch seconds
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub scts: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct SerializeError(#[from] serde_json::Error);

impl DecodedSms {
    pub fn new(sender: SenderAddress) -> Self {
        Self {
            sender,
            scts: None,
            fields: Map::new(),
        }
    }

    /// Sender number for diagnostics
    pub fn sender_number(&self) -> &str {
        self.sender
            .number
            .as_deref()
            .filter(|number| !number.is_empty())
            .unwrap_or(UNKNOWN_SENDER)
    }

    /// Decoded message text, when the decoder provided one
    pub fn body(&self) -> Option<&str> {
        self.fields.get("user_data")?.get("data")?.as_str()
    }

    /// UTF-8 JSON payload; non-ASCII text is emitted as-is
    pub fn to_payload(&self) -> Result<Bytes, SerializeError> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> DecodedSms {
        let mut sms = DecodedSms::new(SenderAddress {
            number: Some("+15551234567".to_string()),
            extra: Map::new(),
        });
        sms.scts = Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 0).single();
        sms.fields
            .insert("user_data".to_string(), json!({ "data": "Grüße 👋" }));
        sms
    }

    #[test]
    fn test_payload_round_trip() {
        let payload = sample().to_payload().unwrap();
        let back: DecodedSms = serde_json::from_slice(&payload).unwrap();

        assert_eq!(back.sender_number(), "+15551234567");
        assert_eq!(back.body(), Some("Grüße 👋"));
        assert_eq!(back, sample());
    }

    #[test]
    fn test_timestamp_is_integer_epoch() {
        let payload = sample().to_payload().unwrap();
        let json: Value = serde_json::from_slice(&payload).unwrap();

        assert!(json["scts"].is_i64());
        assert_eq!(json["scts"], 1710491400);
    }

    #[test]
    fn test_non_ascii_not_escaped() {
        let payload = sample().to_payload().unwrap();
        let text = std::str::from_utf8(&payload).unwrap();
        assert!(text.contains("Grüße 👋"));
    }

    #[test]
    fn test_pass_through_fields_are_flattened() {
        let mut sms = sample();
        sms.fields.insert("pid".to_string(), json!(0));
        sms.sender
            .extra
            .insert("type_of_number".to_string(), json!("international"));

        let json: Value = serde_json::from_slice(&sms.to_payload().unwrap()).unwrap();
        assert_eq!(json["pid"], 0);
        assert_eq!(json["sender"]["type_of_number"], "international");
        assert_eq!(json["sender"]["number"], "+15551234567");
    }

    #[test]
    fn test_unknown_sender_sentinel() {
        let sms = DecodedSms::new(SenderAddress::default());
        assert_eq!(sms.sender_number(), UNKNOWN_SENDER);

        let empty = DecodedSms::new(SenderAddress {
            number: Some(String::new()),
            extra: Map::new(),
        });
        assert_eq!(empty.sender_number(), "unknown number");
    }

    #[test]
    fn test_missing_timestamp_omitted() {
        let sms = DecodedSms::new(SenderAddress::default());
        let json: Value = serde_json::from_slice(&sms.to_payload().unwrap()).unwrap();
        assert!(json.get("scts").is_none());
    }
}
