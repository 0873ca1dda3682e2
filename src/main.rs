//! MikroTik SMS Gateway - Main Entry Point
//!
//! Reads MikroTik SMS log lines from stdin, decodes the embedded PDUs and
//! publishes each message as JSON to an MQTT broker.

use clap::Parser;
use mikrotik_sms_gateway::config::{GatewayConfig, MqttOverrides};
use mikrotik_sms_gateway::error::GatewayResult;
use mikrotik_sms_gateway::observability::init_default_logging;
use mikrotik_sms_gateway::pdu::SmsDeliverDecoder;
use mikrotik_sms_gateway::pipeline::{DecodePublishUnit, Pipeline};
use mikrotik_sms_gateway::transport::mqtt::MqttClient;
use std::path::PathBuf;
use std::process;
use tokio::io::BufReader;
use tracing::{error, info};

/// Bridge MikroTik SMS PDU log lines to MQTT
#[derive(Parser)]
#[command(name = "mikrotik-sms-gateway")]
#[command(about = "Decode MikroTik SMS PDUs from stdin and publish them to MQTT")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// MQTT broker host [default: localhost]
    #[arg(long)]
    mqtt_host: Option<String>,

    /// MQTT broker port [default: 1883]
    #[arg(long)]
    mqtt_port: Option<u16>,

    /// Topic decoded messages are published to [default: sms/incoming/mikrotik]
    #[arg(long)]
    mqtt_topic: Option<String>,

    /// MQTT username
    #[arg(long, env = "MQTT_USERNAME")]
    mqtt_username: Option<String>,

    /// MQTT password
    #[arg(long, env = "MQTT_PASSWORD", hide_env_values = true)]
    mqtt_password: Option<String>,

    /// MQTT client identifier [default: mikrotik-sms-gateway]
    #[arg(long)]
    client_id: Option<String>,
}

impl Cli {
    fn overrides(&self) -> MqttOverrides {
        MqttOverrides {
            host: self.mqtt_host.clone(),
            port: self.mqtt_port,
            topic: self.mqtt_topic.clone(),
            username: self.mqtt_username.clone(),
            password: self.mqtt_password.clone(),
            client_id: self.client_id.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!(
        "Starting MikroTik SMS Gateway v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run(cli).await {
        error!("{}", e);
        process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> GatewayResult<()> {
    let config = GatewayConfig::resolve(cli.config.as_deref(), cli.overrides())?;
    let mqtt = config.mqtt;

    info!(
        "Connecting to MQTT broker {}:{} as {}",
        mqtt.host, mqtt.port, mqtt.client_id
    );
    let client = MqttClient::establish(&mqtt).await?;

    let unit = DecodePublishUnit::new(client, SmsDeliverDecoder::new(), mqtt.topic.clone());
    let summary = Pipeline::new(unit)
        .run(BufReader::new(tokio::io::stdin()))
        .await?;

    info!(
        "Input finished: {} published, {} skipped",
        summary.published, summary.skipped
    );
    Ok(())
}
