//! GSM 03.40 PDU decoding
//!
//! The pipeline only sees the [`PduDecoder`] trait. [`SmsDeliverDecoder`] is
//! the built-in implementation for SMS-DELIVER PDUs as MikroTik logs them
//! (hex, with the leading SMSC information field).

pub mod address;
pub mod dcs;
pub mod deliver;
pub mod gsm7;
pub mod reader;

pub use address::{Address, NumberingPlan, TypeOfNumber};
pub use dcs::{Alphabet, DataCodingScheme};
pub use deliver::SmsDeliverDecoder;

use crate::sms::DecodedSms;
use thiserror::Error;

/// Decoder boundary: PDU hex string in, structured record out
pub trait PduDecoder: Send + Sync {
    fn decode(&self, pdu_hex: &str) -> Result<DecodedSms, DecodeError>;
}

/// Malformed or unsupported PDU
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid hex string")]
    InvalidHex,

    #[error("PDU truncated while reading {field}")]
    Truncated { field: &'static str },

    #[error("unsupported message type indicator {0:#04b}, expected SMS-DELIVER")]
    UnsupportedMessageType(u8),

    #[error("invalid service centre timestamp")]
    InvalidTimestamp,

    #[error("unsupported PDU feature: {0}")]
    Unsupported(String),
}
