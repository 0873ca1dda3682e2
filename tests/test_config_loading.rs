//! Configuration loading and validation tests
//!
//! Tests focus on BEHAVIOR of configuration resolution: file values, command
//! line overrides and validation errors.

use mikrotik_sms_gateway::config::{ConfigError, GatewayConfig, MqttOverrides};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "{content}").unwrap();
    temp_file
}

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let temp_file = write_config(
        r#"
[mqtt]
host = "broker.lan"
port = 8883
topic = "sms/router1"
username = "gateway"
password = "secret"
client_id = "router1-sms"
keep_alive_secs = 30
connect_timeout_secs = 5
publish_timeout_secs = 15
"#,
    );

    let config = GatewayConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.mqtt.host, "broker.lan");
    assert_eq!(config.mqtt.port, 8883);
    assert_eq!(config.mqtt.topic, "sms/router1");
    assert_eq!(config.mqtt.username.as_deref(), Some("gateway"));
    assert_eq!(config.mqtt.client_id, "router1-sms");
    assert_eq!(config.mqtt.keep_alive(), Duration::from_secs(30));
    assert_eq!(config.mqtt.connect_timeout(), Duration::from_secs(5));
    assert_eq!(config.mqtt.publish_timeout(), Duration::from_secs(15));
}

#[test]
fn test_resolve_without_file_uses_defaults() {
    let config = GatewayConfig::resolve(None, MqttOverrides::default()).unwrap();

    assert_eq!(config.mqtt.host, "localhost");
    assert_eq!(config.mqtt.port, 1883);
    assert_eq!(config.mqtt.topic, "sms/incoming/mikrotik");
    assert_eq!(config.mqtt.client_id, "mikrotik-sms-gateway");
}

#[test]
fn test_command_line_overrides_file() {
    let temp_file = write_config(
        r#"
[mqtt]
host = "broker.lan"
topic = "sms/router1"
"#,
    );

    let overrides = MqttOverrides {
        host: Some("10.0.0.5".to_string()),
        username: Some("cli-user".to_string()),
        ..Default::default()
    };
    let config = GatewayConfig::resolve(Some(temp_file.path()), overrides).unwrap();

    assert_eq!(config.mqtt.host, "10.0.0.5");
    assert_eq!(config.mqtt.topic, "sms/router1");
    assert_eq!(config.mqtt.username.as_deref(), Some("cli-user"));
}

#[test]
fn test_missing_file_is_read_error() {
    let result = GatewayConfig::resolve(
        Some(Path::new("/nonexistent/gateway.toml")),
        MqttOverrides::default(),
    );
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let temp_file = write_config("[mqtt]\nport = \"not a number\"");

    let result = GatewayConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_resolve_validates_final_values() {
    let temp_file = write_config("[mqtt]\ntopic = \"sms/#\"");

    let result = GatewayConfig::resolve(Some(temp_file.path()), MqttOverrides::default());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));

    // A valid override repairs an invalid file value
    let overrides = MqttOverrides {
        topic: Some("sms/incoming".to_string()),
        ..Default::default()
    };
    assert!(GatewayConfig::resolve(Some(temp_file.path()), overrides).is_ok());
}

#[test]
fn test_zero_timeout_rejected() {
    let temp_file = write_config("[mqtt]\nconnect_timeout_secs = 0");

    let result = GatewayConfig::resolve(Some(temp_file.path()), MqttOverrides::default());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("timeouts"));
}
