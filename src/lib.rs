//! MikroTik SMS Gateway
//!
//! Reads MikroTik SMS log lines carrying GSM 03.40 PDUs, decodes each PDU and
//! publishes the decoded message as JSON to an MQTT topic.
//!
//! # Overview
//!
//! - [`extractor`] - isolates the `pdu=<hex>` token from a raw log line
//! - [`pdu`] - SMS-DELIVER decoder behind the [`pdu::PduDecoder`] trait
//! - [`sms`] - the decoded record and its JSON payload form
//! - [`pipeline`] - decode-publish unit and the line-by-line driver
//! - [`transport`] - MQTT v5 client with a blocking connection handshake gate
//!
//! # Quick Start
//!
//! ```rust
//! use mikrotik_sms_gateway::extractor::{extract_pdu, LineOutcome};
//! use mikrotik_sms_gateway::pdu::{PduDecoder, SmsDeliverDecoder};
//!
//! let line = ">>> pdu=07911326040000F0040B911346610089F60000208062917314080CC8F71D14969741F977FD07";
//! let token = match extract_pdu(line).unwrap() {
//!     LineOutcome::Token(token) => token,
//!     LineOutcome::Blank => unreachable!(),
//! };
//!
//! let sms = SmsDeliverDecoder::new().decode(token.as_str()).unwrap();
//! assert_eq!(sms.sender_number(), "+31641600986");
//!
//! // Published payload: JSON with the timestamp as Unix epoch seconds
//! let payload = sms.to_payload().unwrap();
//! let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();
//! assert_eq!(json["scts"], 1030390661);
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod observability;
pub mod pdu;
pub mod pipeline;
pub mod sms;
pub mod testing;
pub mod transport;

pub use config::*;
pub use error::{GatewayError, GatewayResult};
pub use extractor::{extract_pdu, LineOutcome, PduToken};
pub use pdu::{PduDecoder, SmsDeliverDecoder};
pub use pipeline::{DecodePublishUnit, Pipeline, PipelineSummary, TokenOutcome};
pub use sms::DecodedSms;
pub use transport::mqtt::MqttClient;
pub use transport::Publisher;
