//! Impure I/O operations for the MQTT client
//!
//! [`MqttClient::establish`] spawns the rumqttc event loop on a background
//! task and blocks the caller on the handshake latch until CONNACK, failure
//! or timeout. After that the same task forwards PUBACKs so that
//! [`Publisher::publish`] only returns once the broker acknowledged.

use super::connection::{
    configure_mqtt_options, ConnectError, PublishError, REQUEST_CHANNEL_CAPACITY,
};
use super::handshake::{handshake_latch, HandshakeSignal};
use super::message_handler::{EventRoute, MessageHandler, PublishAck};
use crate::config::MqttSection;
use crate::mqtt_span;
use crate::transport::Publisher;
use async_trait::async_trait;
use bytes::Bytes;
use rumqttc::v5::{mqttbytes::QoS, AsyncClient, EventLoop};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn, Instrument};

const ACK_CHANNEL_CAPACITY: usize = 16;

/// Live MQTT v5 session
pub struct MqttClient {
    client: AsyncClient,
    acks: Mutex<mpsc::Receiver<PublishAck>>,
    publish_timeout: Duration,
    event_loop_handle: JoinHandle<()>,
}

impl MqttClient {
    /// Connect and wait for the handshake to resolve
    ///
    /// Fails with [`ConnectError::Unreachable`] as soon as the transport
    /// errors, [`ConnectError::Rejected`] on a refusing CONNACK and
    /// [`ConnectError::Timeout`] if nothing resolves within
    /// `connect_timeout_secs`.
    pub async fn establish(config: &MqttSection) -> Result<Self, ConnectError> {
        let span = mqtt_span!(host = %config.host, port = config.port, client_id = %config.client_id);
        Self::establish_inner(config).instrument(span).await
    }

    async fn establish_inner(config: &MqttSection) -> Result<Self, ConnectError> {
        let mqtt_options = configure_mqtt_options(config);
        let (client, event_loop) = AsyncClient::new(mqtt_options, REQUEST_CHANNEL_CAPACITY);
        let (signal, waiter) = handshake_latch();
        let (ack_tx, ack_rx) = mpsc::channel(ACK_CHANNEL_CAPACITY);

        debug!("Starting MQTT event loop");
        let event_loop_handle = tokio::spawn(
            Self::run_event_loop(event_loop, signal, ack_tx).instrument(tracing::Span::current()),
        );

        if let Err(e) = waiter.wait(config.connect_timeout()).await {
            event_loop_handle.abort();
            return Err(e);
        }

        info!("MQTT connected successfully");
        Ok(Self {
            client,
            acks: Mutex::new(ack_rx),
            publish_timeout: config.publish_timeout(),
            event_loop_handle,
        })
    }

    /// Drive the transport until it fails; no reconnection is attempted
    async fn run_event_loop(
        mut event_loop: EventLoop,
        signal: HandshakeSignal,
        ack_tx: mpsc::Sender<PublishAck>,
    ) {
        loop {
            match event_loop.poll().await {
                Ok(event) => {
                    let route = MessageHandler::route_mqtt_event(&event);
                    if !Self::process_event_route(route, &signal, &ack_tx).await {
                        break;
                    }
                }
                Err(e) => {
                    if signal.is_resolved() {
                        error!("MQTT event loop error: {}", e);
                    } else {
                        let failure = MessageHandler::classify_connection_error(&e);
                        warn!("MQTT connect failed immediately: {}", e);
                        signal.fail(failure);
                    }
                    break;
                }
            }
        }
        debug!("MQTT event loop stopped");
    }

    /// Returns true to keep polling
    async fn process_event_route(
        route: EventRoute,
        signal: &HandshakeSignal,
        ack_tx: &mpsc::Sender<PublishAck>,
    ) -> bool {
        match route {
            EventRoute::ConnectionAcknowledged => {
                signal.succeed();
                true
            }
            EventRoute::ConnectionRefused(reason) => {
                signal.fail(ConnectError::Rejected(reason));
                false
            }
            EventRoute::PublishAcknowledged(ack) => {
                debug!(target: "mqtt_transport", pkid = ack.pkid, "PUBACK received");
                ack_tx.send(ack).await.is_ok()
            }
            EventRoute::Disconnected(reason) => {
                error!("MQTT broker disconnected: {}", reason);
                signal.fail(ConnectError::Unreachable(format!(
                    "broker disconnected: {reason}"
                )));
                false
            }
            EventRoute::InfrastructureEvent(event) => {
                debug!(target: "mqtt_transport", "MQTT event: {}", event);
                true
            }
            EventRoute::OutgoingEvent => true,
        }
    }

    /// False once the background event loop has stopped
    pub fn is_connected(&self) -> bool {
        !self.event_loop_handle.is_finished()
    }
}

#[async_trait]
impl Publisher for MqttClient {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), PublishError> {
        // Held across the whole exchange so acks pair with their publish
        let mut acks = self.acks.lock().await;

        self.client
            .publish(topic.to_string(), QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| PublishError::Rejected(e.to_string()))?;

        match tokio::time::timeout(self.publish_timeout, acks.recv()).await {
            Ok(Some(ack)) => ack.result.map_err(|code| PublishError::Nack { code }),
            Ok(None) => Err(PublishError::ConnectionLost),
            Err(_) => Err(PublishError::AckTimeout(self.publish_timeout)),
        }
    }
}

impl Drop for MqttClient {
    fn drop(&mut self) {
        self.event_loop_handle.abort();
    }
}
