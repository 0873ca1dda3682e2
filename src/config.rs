//! Gateway configuration
//!
//! Settings come from three layers: built-in defaults, an optional TOML file
//! and command-line flags (or their environment variables). Later layers win.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MQTT_HOST: &str = "localhost";
pub const DEFAULT_MQTT_PORT: u16 = 1883;
pub const DEFAULT_MQTT_TOPIC: &str = "sms/incoming/mikrotik";
pub const DEFAULT_CLIENT_ID: &str = "mikrotik-sms-gateway";

/// Top-level gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GatewayConfig {
    #[serde(default)]
    pub mqtt: MqttSection,
}

/// MQTT section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MqttSection {
    /// Broker host name or address
    #[serde(default = "default_host")]
    pub host: String,
    /// Broker TCP port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Destination topic for decoded SMS
    #[serde(default = "default_topic")]
    pub topic: String,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Keep-alive interval in seconds (default: 60)
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,
    /// How long to wait for CONNACK before giving up (default: 10)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// How long a publish waits for PUBACK (default: 30)
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_secs: u64,
}

fn default_host() -> String {
    DEFAULT_MQTT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_MQTT_PORT
}

fn default_topic() -> String {
    DEFAULT_MQTT_TOPIC.to_string()
}

fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.to_string()
}

fn default_keep_alive() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_publish_timeout() -> u64 {
    30
}

impl Default for MqttSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            topic: default_topic(),
            username: None,
            password: None,
            client_id: default_client_id(),
            keep_alive_secs: default_keep_alive(),
            connect_timeout_secs: default_connect_timeout(),
            publish_timeout_secs: default_publish_timeout(),
        }
    }
}

impl MqttSection {
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs)
    }

    /// Overlay values given on the command line
    pub fn apply_overrides(&mut self, overrides: MqttOverrides) {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(topic) = overrides.topic {
            self.topic = topic;
        }
        if let Some(username) = overrides.username {
            self.username = Some(username);
        }
        if let Some(password) = overrides.password {
            self.password = Some(password);
        }
        if let Some(client_id) = overrides.client_id {
            self.client_id = client_id;
        }
    }

    /// Validate the section before any connection is attempted
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "mqtt.host must not be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidConfig(
                "mqtt.port must be between 1 and 65535".to_string(),
            ));
        }
        validate_topic(&self.topic)?;
        if self.client_id.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "client_id must not be empty".to_string(),
            ));
        }
        if self.keep_alive_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "mqtt.keep_alive_secs must be at least 1".to_string(),
            ));
        }
        if self.connect_timeout_secs == 0 || self.publish_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "mqtt timeouts must be at least 1 second".to_string(),
            ));
        }
        if self.password.is_some() && self.username.is_none() {
            return Err(ConfigError::InvalidConfig(
                "mqtt.password requires mqtt.username".to_string(),
            ));
        }
        Ok(())
    }
}

/// Values supplied on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MqttOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub topic: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GatewayConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GatewayConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Resolve the final configuration: file (if any), then overrides
    pub fn resolve(path: Option<&Path>, overrides: MqttOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.mqtt.apply_overrides(overrides);
        config.mqtt.validate()?;
        Ok(config)
    }
}

/// Publish topics must be non-empty and free of wildcards
fn validate_topic(topic: &str) -> Result<(), ConfigError> {
    if topic.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "mqtt.topic must not be empty".to_string(),
        ));
    }
    if topic.contains(['+', '#', '\0']) {
        return Err(ConfigError::InvalidConfig(format!(
            "mqtt.topic '{topic}' must not contain wildcards"
        )));
    }
    Ok(())
}
