//! Pure connection configuration and transport error types
//!
//! This module turns the configured [`MqttSection`] into rumqttc options and
//! defines the errors of the connection gate and of publishing.

use crate::config::MqttSection;
use rumqttc::v5::MqttOptions;
use std::time::Duration;
use thiserror::Error;

/// Request channel capacity between the client handle and the event loop
pub const REQUEST_CHANNEL_CAPACITY: usize = 10;

/// Why the broker session could not be established
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Transport failed before any CONNACK (DNS, TCP refused, TLS, I/O)
    #[error("broker unreachable: {0}")]
    Unreachable(String),
    #[error("timeout after {0:?} (no CONNACK received)")]
    Timeout(Duration),
    /// Broker answered CONNACK with a non-success reason code
    #[error("broker rejected connection: {0}")]
    Rejected(String),
}

/// Publishing failures; all of them mean the transport can no longer be trusted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The client refused to queue the publish request
    #[error("publish request rejected by client: {0}")]
    Rejected(String),
    /// The broker answered PUBACK with a failure reason code
    #[error("broker returned PUBACK reason code {code}")]
    Nack { code: String },
    #[error("no PUBACK within {0:?}")]
    AckTimeout(Duration),
    #[error("connection to broker lost")]
    ConnectionLost,
}

/// Margin added to rumqttc's own connect timeout over the handshake gate
pub const NETWORK_TIMEOUT_MARGIN_SECS: u64 = 5;

/// Pure function to configure MQTT v5 options from config
///
/// rumqttc wraps TCP connect plus CONNECT/CONNACK in its own timeout. It is
/// kept above `connect_timeout_secs` so a silent broker is reported by the
/// handshake gate as [`ConnectError::Timeout`].
pub fn configure_mqtt_options(config: &MqttSection) -> MqttOptions {
    let mut mqtt_options = MqttOptions::new(&config.client_id, &config.host, config.port);
    mqtt_options.set_keep_alive(config.keep_alive());
    mqtt_options.set_connection_timeout(
        config
            .connect_timeout_secs
            .saturating_add(NETWORK_TIMEOUT_MARGIN_SECS),
    );

    if let Some(username) = &config.username {
        let password = config.password.clone().unwrap_or_default();
        mqtt_options.set_credentials(username, password);
    }

    mqtt_options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_mqtt_config() -> MqttSection {
        MqttSection {
            host: "broker.lan".to_string(),
            port: 1884,
            client_id: "gateway-test".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_configure_mqtt_options() {
        let options = configure_mqtt_options(&test_mqtt_config());

        assert_eq!(options.client_id(), "gateway-test");
        assert_eq!(options.broker_address(), ("broker.lan".to_string(), 1884));
        assert_eq!(options.keep_alive(), Duration::from_secs(60));
    }

    #[test]
    fn test_network_timeout_outlasts_handshake_gate() {
        let mut config = test_mqtt_config();
        assert!(configure_mqtt_options(&config).connection_timeout() > config.connect_timeout_secs);

        config.connect_timeout_secs = 1;
        assert_eq!(configure_mqtt_options(&config).connection_timeout(), 6);
    }

    #[test]
    fn test_username_without_password_is_accepted() {
        let mut config = test_mqtt_config();
        config.username = Some("gateway".to_string());

        let options = configure_mqtt_options(&config);
        assert_eq!(options.client_id(), "gateway-test");
    }

    #[test]
    fn test_connect_error_display_distinguishes_causes() {
        let timeout = ConnectError::Timeout(Duration::from_secs(10)).to_string();
        let rejected = ConnectError::Rejected("NotAuthorized".to_string()).to_string();
        let unreachable = ConnectError::Unreachable("connection refused".to_string()).to_string();

        assert!(timeout.contains("no CONNACK"));
        assert!(rejected.contains("rejected") && rejected.contains("NotAuthorized"));
        assert!(unreachable.contains("unreachable"));
    }

    #[test]
    fn test_publish_error_display_carries_code() {
        let error = PublishError::Nack {
            code: "QuotaExceeded".to_string(),
        };
        assert!(error.to_string().contains("QuotaExceeded"));
    }
}
