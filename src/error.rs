//! Process-level error taxonomy for the SMS gateway
//!
//! Every error that can end the process is funnelled through [`GatewayError`].
//! Per-line decode and serialization failures never reach this type; they are
//! contained by the decode-publish unit and only logged.

use crate::config::ConfigError;
use crate::extractor::ParseError;
use crate::pdu::DecodeError;
use crate::sms::SerializeError;
use crate::transport::mqtt::{ConnectError, PublishError};
use thiserror::Error;

/// Fatal gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("MQTT connect failed: {0}")]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to publish MQTT message: {0}")]
    Publish(#[from] PublishError),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Failures that only cost the current line
#[derive(Debug, Error)]
pub enum LocalFailure {
    #[error("Failed to decode PDU: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to serialize SMS to JSON: {0}")]
    Serialize(#[from] SerializeError),
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_every_fatal_error_exits_non_zero() {
        let errors: Vec<GatewayError> = vec![
            ConfigError::InvalidConfig("port".to_string()).into(),
            ConnectError::Unreachable("dns".to_string()).into(),
            ConnectError::Timeout(Duration::from_secs(10)).into(),
            ConnectError::Rejected("NotAuthorized".to_string()).into(),
            ParseError::NoPduFound {
                line: "garbage".to_string(),
            }
            .into(),
            PublishError::Nack {
                code: "QuotaExceeded".to_string(),
            }
            .into(),
            std::io::Error::new(std::io::ErrorKind::InvalidData, "bad utf-8").into(),
        ];

        for error in errors {
            assert_ne!(error.exit_code(), 0, "{error} must exit non-zero");
        }
    }

    #[test]
    fn test_connect_rejection_and_timeout_are_distinguishable() {
        let rejected = GatewayError::from(ConnectError::Rejected("BadUserNamePassword".into()));
        let timeout = GatewayError::from(ConnectError::Timeout(Duration::from_secs(10)));

        assert!(rejected.to_string().contains("BadUserNamePassword"));
        assert!(timeout.to_string().contains("no CONNACK"));
        assert_ne!(rejected.to_string(), timeout.to_string());
    }

    #[test]
    fn test_parse_error_names_the_line() {
        let error = GatewayError::from(ParseError::NoPduFound {
            line: "garbage no pdu here".to_string(),
        });
        assert!(error.to_string().contains("\"garbage no pdu here\""));
    }

    #[test]
    fn test_local_failure_messages() {
        let failure = LocalFailure::from(DecodeError::InvalidHex);
        assert!(failure.to_string().starts_with("Failed to decode PDU"));
    }
}
