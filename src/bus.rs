//! Message bus publishing for Lucid components
//!
//! Components talk to the agent's MQTT broker through the narrow
//! [`MessageBus`] trait so tests can substitute a recording fake. The real
//! implementation wraps a `rumqttc::AsyncClient`; its event loop is driven by
//! a background task the same way the agent host drives its own client.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rumqttc::{AsyncClient, MqttOptions};
use tracing::{debug, error};

pub use rumqttc::QoS;

/// Fire-and-forget publish interface shared by all agent components.
#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>, qos: QoS, retain: bool) -> Result<()>;
}

/// MQTT-backed [`MessageBus`] implementation.
pub struct MqttBus {
    client: AsyncClient,
}

impl MqttBus {
    /// Wrap an already-connected client owned by the agent host.
    pub fn new(client: AsyncClient) -> Self {
        Self { client }
    }

    /// Connect to a broker and spawn the event-loop driver task.
    ///
    /// Connection errors are logged and retried by the driver; publishes made
    /// while the link is down are queued or dropped by `rumqttc` according to
    /// their QoS.
    pub fn connect(client_id: &str, host: &str, port: u16) -> Self {
        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(Duration::from_secs(30));
        options.set_clean_session(true);

        let (client, mut eventloop) = AsyncClient::new(options, 10);

        tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(event) => {
                        debug!("MQTT event: {:?}", event);
                    }
                    Err(e) => {
                        error!("MQTT connection error: {}", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        });

        Self { client }
    }
}

#[async_trait]
impl MessageBus for MqttBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>, qos: QoS, retain: bool) -> Result<()> {
        self.client
            .publish(topic, qos, retain, payload)
            .await
            .with_context(|| format!("Failed to publish to {}", topic))
    }
}
