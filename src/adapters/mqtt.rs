//! MQTT cloud transport.
//!
//! Implements [`CloudTransport`] over the ESP-IDF MQTT client.
//!
//! | Topic                         | Direction | Retained |
//! |-------------------------------|-----------|----------|
//! | `<prefix>/<device-id>/state`  | publish   | yes      |
//! | `<prefix>/<device-id>/set`    | subscribe | —        |
//!
//! The client runs its own task; its event callback feeds
//! [`channels`](crate::cloud::channels) and never touches control state.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client::EspMqttClient`.
//! - **all other targets**: an in-memory broker stand-in for host tests.

use core::fmt::Write;

use log::info;

use crate::cloud::channels::{self, InboundFrame};
use crate::cloud::transport::CloudTransport;
use crate::error::CommsError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::mqtt::client::{Details, EspMqttClient, EventPayload, MqttClientConfiguration, QoS};
#[cfg(target_os = "espidf")]
use log::warn;

pub type Topic = heapless::String<64>;

/// Build the state and set topics for a device.
pub fn topics(prefix: &str, device_id: &str) -> Result<(Topic, Topic), CommsError> {
    let mut state = Topic::new();
    let mut set = Topic::new();
    write!(state, "{}/{}/state", prefix, device_id).map_err(|_| CommsError::CloudConnectFailed)?;
    write!(set, "{}/{}/set", prefix, device_id).map_err(|_| CommsError::CloudConnectFailed)?;
    Ok((state, set))
}

pub struct MqttTransport {
    url: heapless::String<64>,
    client_id: heapless::String<24>,
    state_topic: Topic,
    set_topic: Topic,
    #[cfg(target_os = "espidf")]
    client: Option<EspMqttClient<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimBroker,
}

/// Host stand-in: records publishes, connects when told the broker exists.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimBroker {
    pub reachable: bool,
    pub subscribed: Option<Topic>,
    pub published: Vec<(Topic, Vec<u8>)>,
}

impl MqttTransport {
    pub fn new(url: &str, client_id: &str, prefix: &str, device_id: &str) -> Result<Self, CommsError> {
        let (state_topic, set_topic) = topics(prefix, device_id)?;
        let url = heapless::String::try_from(url).map_err(|_| CommsError::CloudConnectFailed)?;
        let client_id =
            heapless::String::try_from(client_id).map_err(|_| CommsError::CloudConnectFailed)?;
        info!("MQTT: {} as {} (state={}, set={})", url, client_id, state_topic, set_topic);
        Ok(Self {
            url,
            client_id,
            state_topic,
            set_topic,
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(not(target_os = "espidf"))]
            sim: SimBroker::default(),
        })
    }

    pub fn state_topic(&self) -> &str {
        &self.state_topic
    }

    pub fn set_topic(&self) -> &str {
        &self.set_topic
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim(&mut self) -> &mut SimBroker {
        &mut self.sim
    }
}

// ── ESP-IDF client ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl CloudTransport for MqttTransport {
    fn connect(&mut self) -> Result<(), CommsError> {
        // The IDF client reconnects on its own once created.
        if self.client.is_some() {
            return Ok(());
        }
        let conf = MqttClientConfiguration {
            client_id: Some(self.client_id.as_str()),
            ..Default::default()
        };
        let set_topic = self.set_topic.clone();
        let client = EspMqttClient::new_cb(self.url.as_str(), &conf, move |event| {
            match event.payload() {
                EventPayload::Connected(_) => channels::set_link_up(true),
                EventPayload::Disconnected => channels::set_link_up(false),
                EventPayload::Received {
                    topic,
                    data,
                    details,
                    ..
                } => {
                    if topic != Some(set_topic.as_str()) || !matches!(details, Details::Complete) {
                        return;
                    }
                    if !channels::push_inbound(data) {
                        warn!("MQTT: inbound payload dropped ({} bytes)", data.len());
                    }
                }
                EventPayload::Error(e) => warn!("MQTT: {:?}", e),
                _ => {}
            }
        })
        .map_err(|e| {
            warn!("MQTT: client creation failed: {:?}", e);
            CommsError::CloudConnectFailed
        })?;
        self.client = Some(client);
        info!("MQTT: client started");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.client.is_some() && channels::link_up()
    }

    fn on_link_up(&mut self) -> Result<(), CommsError> {
        let client = self.client.as_mut().ok_or(CommsError::CloudConnectFailed)?;
        client
            .subscribe(self.set_topic.as_str(), QoS::AtLeastOnce)
            .map_err(|_| CommsError::CloudConnectFailed)?;
        info!("MQTT: subscribed to {}", self.set_topic);
        Ok(())
    }

    fn publish_state(&mut self, payload: &[u8]) -> Result<(), CommsError> {
        let client = self.client.as_mut().ok_or(CommsError::CloudPublishFailed)?;
        client
            .enqueue(self.state_topic.as_str(), QoS::AtLeastOnce, true, payload)
            .map(|_| ())
            .map_err(|_| CommsError::CloudPublishFailed)
    }

    fn try_receive(&mut self) -> Option<InboundFrame> {
        channels::try_receive_inbound()
    }
}

// ── Simulation ───────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
impl CloudTransport for MqttTransport {
    fn connect(&mut self) -> Result<(), CommsError> {
        if !self.sim.reachable {
            return Err(CommsError::CloudConnectFailed);
        }
        channels::set_link_up(true);
        info!("MQTT(sim): connected to {} as {}", self.url, self.client_id);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.sim.reachable && channels::link_up()
    }

    fn on_link_up(&mut self) -> Result<(), CommsError> {
        self.sim.subscribed = Some(self.set_topic.clone());
        Ok(())
    }

    fn publish_state(&mut self, payload: &[u8]) -> Result<(), CommsError> {
        self.sim
            .published
            .push((self.state_topic.clone(), payload.to_vec()));
        Ok(())
    }

    fn try_receive(&mut self) -> Option<InboundFrame> {
        channels::try_receive_inbound()
    }
}
