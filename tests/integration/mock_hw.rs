//! Mock adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO or I2C.

use std::collections::HashMap;

use thermorelay::app::events::AppEvent;
use thermorelay::app::ports::{
    ActuatorPort, ConfigError, ConfigPort, DisplayPort, EventSink, SensorPort, StorageError,
    StoragePort,
};
use thermorelay::cloud::channels::InboundFrame;
use thermorelay::cloud::CloudTransport;
use thermorelay::config::SystemConfig;
use thermorelay::display::StatusView;
use thermorelay::drivers::button::{ButtonId, Level};
use thermorelay::error::{ActuatorError, CommsError, DisplayError, SensorError};

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// What the next `read_temperature` returns.
    pub temp: Result<f32, SensorError>,
    pub buttons: [Level; 2],
    /// Every `set_cooler` argument, in order.
    pub relay_calls: Vec<bool>,
    pub link_led: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            temp: Ok(25.0),
            buttons: [Level::High, Level::High],
            relay_calls: Vec::new(),
            link_led: false,
        }
    }

    pub fn relay_on(&self) -> bool {
        self.relay_calls.last().copied().unwrap_or(false)
    }

    pub fn press(&mut self, id: ButtonId) {
        self.buttons[Self::slot(id)] = Level::Low;
    }

    pub fn release(&mut self, id: ButtonId) {
        self.buttons[Self::slot(id)] = Level::High;
    }

    fn slot(id: ButtonId) -> usize {
        match id {
            ButtonId::Button1 => 0,
            ButtonId::Button2 => 1,
        }
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.temp
    }

    fn read_button(&mut self, id: ButtonId) -> Level {
        self.buttons[Self::slot(id)]
    }
}

impl ActuatorPort for MockHardware {
    fn set_cooler(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.relay_calls.push(on);
        Ok(())
    }

    fn set_link_led(&mut self, lit: bool) {
        self.link_led = lit;
    }
}

// ── MockNvs ───────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockNvs {
    store: HashMap<String, Vec<u8>>,
    /// Every call fails with `Unavailable`.
    pub unavailable: bool,
    pub writes: usize,
}

#[allow(dead_code)]
impl MockNvs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn raw(&self, namespace: &str, key: &str) -> Option<&[u8]> {
        self.store
            .get(&format!("{}::{}", namespace, key))
            .map(Vec::as_slice)
    }
}

impl StoragePort for MockNvs {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        match self.store.get(&format!("{}::{}", namespace, key)) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.writes += 1;
        self.store
            .insert(format!("{}::{}", namespace, key), data.to_vec());
        Ok(())
    }
}

impl ConfigPort for MockNvs {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        Ok(SystemConfig::default())
    }

    fn save(&self, _config: &SystemConfig) -> Result<(), ConfigError> {
        Ok(())
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub fail_init: bool,
    pub frames: Vec<StatusView>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn last(&self) -> Option<&StatusView> {
        self.frames.last()
    }
}

impl DisplayPort for MockDisplay {
    fn init(&mut self) -> Result<(), DisplayError> {
        if self.fail_init {
            Err(DisplayError::BusFailed)
        } else {
            Ok(())
        }
    }

    fn render(&mut self, view: &StatusView) -> Result<(), DisplayError> {
        self.frames.push(*view);
        Ok(())
    }
}

// ── MockTransport ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockTransport {
    pub up: bool,
    pub connects: u32,
    pub published: Vec<Vec<u8>>,
    pub inbound: Vec<InboundFrame>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn deliver(&mut self, json: &str) {
        self.inbound
            .push(InboundFrame::from_slice(json.as_bytes()).expect("payload fits"));
    }

    pub fn last_doc(&self) -> Option<serde_json::Value> {
        self.published
            .last()
            .map(|p| serde_json::from_slice(p).expect("valid JSON"))
    }
}

impl CloudTransport for MockTransport {
    fn connect(&mut self) -> Result<(), CommsError> {
        self.connects += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.up
    }

    fn publish_state(&mut self, payload: &[u8]) -> Result<(), CommsError> {
        self.published.push(payload.to_vec());
        Ok(())
    }

    fn try_receive(&mut self) -> Option<InboundFrame> {
        if self.inbound.is_empty() {
            None
        } else {
            Some(self.inbound.remove(0))
        }
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
