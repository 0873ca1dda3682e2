//! MQTT v5 client with a blocking connection handshake gate
//!
//! This module separates pure functions from I/O operations for better
//! testability.
//!
//! # Architecture
//!
//! - [`connection`] - Pure option building and transport error types
//! - [`handshake`] - One-shot latch between the event loop and `establish`
//! - [`message_handler`] - Pure routing of event loop output
//! - [`client`] - Impure I/O operations and coordination
//!
//! # Usage
//!
//! ```rust,no_run
//! use mikrotik_sms_gateway::config::MqttSection;
//! use mikrotik_sms_gateway::transport::{mqtt::MqttClient, Publisher};
//!
//! # tokio_test::block_on(async {
//! let config = MqttSection {
//!     host: "localhost".to_string(),
//!     ..Default::default()
//! };
//!
//! let client = MqttClient::establish(&config).await?;
//! client.publish(&config.topic, bytes::Bytes::from_static(b"{}")).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```

pub mod client;
pub mod connection;
pub mod handshake;
pub mod message_handler;

// Re-export public types for convenience
pub use client::MqttClient;
pub use connection::{configure_mqtt_options, ConnectError, PublishError};
pub use handshake::{handshake_latch, HandshakeSignal, HandshakeState, HandshakeWaiter};
pub use message_handler::{EventRoute, MessageHandler, PublishAck};
