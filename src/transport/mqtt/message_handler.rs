//! Pure routing of MQTT event loop output
//!
//! The event loop task only acts on routing decisions made here, so every
//! classification of broker packets and connection errors is testable
//! without a broker.

use super::connection::ConnectError;
use rumqttc::v5::mqttbytes::v5::{ConnectReturnCode, Packet, PubAckReason};
use rumqttc::v5::{ConnectionError, Event};

/// Broker verdict on one QoS 1 publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishAck {
    pub pkid: u16,
    /// `Err` carries the failure reason code
    pub result: Result<(), String>,
}

/// Routing decisions for MQTT events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRoute {
    /// CONNACK with a success reason code
    ConnectionAcknowledged,
    /// CONNACK with a failure reason code
    ConnectionRefused(String),
    PublishAcknowledged(PublishAck),
    /// Broker sent DISCONNECT
    Disconnected(String),
    /// Infrastructure event (PingResp, etc.)
    InfrastructureEvent(String),
    /// Outgoing event (handled automatically)
    OutgoingEvent,
}

/// Pure message routing decisions based on MQTT events
pub struct MessageHandler;

impl MessageHandler {
    /// Route MQTT v5 event to the appropriate handler
    pub fn route_mqtt_event(event: &Event) -> EventRoute {
        match event {
            Event::Incoming(incoming) => match incoming {
                Packet::ConnAck(connack) if connack.code == ConnectReturnCode::Success => {
                    EventRoute::ConnectionAcknowledged
                }
                Packet::ConnAck(connack) => {
                    EventRoute::ConnectionRefused(format!("{:?}", connack.code))
                }
                Packet::PubAck(puback) => EventRoute::PublishAcknowledged(PublishAck {
                    pkid: puback.pkid,
                    result: Self::puback_result(&puback.reason),
                }),
                Packet::Disconnect(disconnect) => {
                    EventRoute::Disconnected(format!("{:?}", disconnect.reason_code))
                }
                other => EventRoute::InfrastructureEvent(format!("{other:?}")),
            },
            Event::Outgoing(_) => EventRoute::OutgoingEvent,
        }
    }

    /// "No matching subscribers" is still a successful delivery to the broker
    pub fn puback_result(reason: &PubAckReason) -> Result<(), String> {
        match reason {
            PubAckReason::Success | PubAckReason::NoMatchingSubscribers => Ok(()),
            failure => Err(format!("{failure:?}")),
        }
    }

    /// Classify an event loop error raised before the handshake completed
    pub fn classify_connection_error(error: &ConnectionError) -> ConnectError {
        match error {
            ConnectionError::ConnectionRefused(code) => ConnectError::Rejected(format!("{code:?}")),
            other => ConnectError::Unreachable(other.to_string()),
        }
    }
}
