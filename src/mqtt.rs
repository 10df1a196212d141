//! MQTT publisher for strike events
//!
//! Each lightning strike is published once as JSON so external gear (a
//! thunder sound player, a room light) can react to it. The connection is
//! driven on a background thread; publishing from the render loop never
//! blocks.

use crate::effects::StrikeEvent;
use crate::error::StormError;
use rumqttc::{Client, Connection, Event, MqttOptions, Packet, QoS};
use std::thread;
use std::time::Duration;

const DEFAULT_PORT: u16 = 1883;
const DEFAULT_TOPIC: &str = "stormcell/strikes";
const CLIENT_ID: &str = "stormcell";

pub struct StrikePublisher {
    client: Client,
    topic: String,
    _thread: thread::JoinHandle<()>,
}

impl StrikePublisher {
    /// Connect to the broker. Fails immediately if it cannot be reached.
    pub fn connect(host: &str, port: Option<u16>, topic: Option<&str>) -> Result<Self, StormError> {
        let port = port.unwrap_or(DEFAULT_PORT);
        let topic = topic.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TOPIC);

        let mut options = MqttOptions::new(CLIENT_ID, host, port);
        options.set_keep_alive(Duration::from_secs(30));

        let (client, mut connection) = Client::new(options, 10);

        // The first poll performs the connect handshake
        match connection.iter().next() {
            Some(Ok(_)) => {},
            Some(Err(e)) => {
                return Err(StormError::Mqtt(format!(
                    "failed to connect to {}:{} - {}",
                    host, port, e
                )));
            },
            None => {
                return Err(StormError::Mqtt(format!(
                    "failed to connect to {}:{} - connection closed",
                    host, port
                )));
            },
        }

        let handle = thread::spawn(move || Self::event_loop(connection));

        tracing::info!(host, port, topic, "mqtt connected");

        Ok(Self {
            client,
            topic: topic.to_string(),
            _thread: handle,
        })
    }

    fn event_loop(mut connection: Connection) {
        for event in connection.iter() {
            match event {
                Ok(Event::Incoming(Packet::Disconnect)) => {
                    tracing::warn!("mqtt broker disconnected");
                },
                Ok(_) => {},
                Err(e) => {
                    // rumqttc reconnects on the next poll
                    tracing::warn!(error = %e, "mqtt connection error");
                    thread::sleep(Duration::from_secs(1));
                },
            }
        }
    }

    /// Queue a strike for publishing. Drops it if the outgoing queue is full.
    pub fn publish(&self, event: &StrikeEvent) {
        let payload = match serde_json::to_vec(event) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode strike event");
                return;
            },
        };
        if let Err(e) = self
            .client
            .try_publish(self.topic.as_str(), QoS::AtMostOnce, false, payload)
        {
            tracing::warn!(strike = event.strike, error = %e, "strike event dropped");
        }
    }
}
