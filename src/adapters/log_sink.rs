//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::Mode;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Auto => "AUTO",
        Mode::Manual => "MANUAL",
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => match t.temperature_c {
                Some(c) => info!(
                    "TELEM | T={:.1}\u{00b0}C{} | set={:.1}\u{00b0}C | mode={} | cooler={} | cloud={}",
                    c,
                    if t.sensor_fault { " (stale)" } else { "" },
                    t.state.setpoint,
                    mode_name(t.state.mode),
                    on_off(t.state.cooler_on),
                    if t.cloud_connected { "up" } else { "down" },
                ),
                None => info!(
                    "TELEM | T=--.- | set={:.1}\u{00b0}C | mode={} | cooler={} | cloud={}",
                    t.state.setpoint,
                    mode_name(t.state.mode),
                    on_off(t.state.cooler_on),
                    if t.cloud_connected { "up" } else { "down" },
                ),
            },
            AppEvent::ModeChanged { from, to } => {
                info!("STATE | mode {} -> {}", mode_name(*from), mode_name(*to));
            }
            AppEvent::CoolerChanged { on, mode } => {
                info!("STATE | cooler {} ({})", on_off(*on), mode_name(*mode));
            }
            AppEvent::SetpointChanged { from, to } => {
                info!("STATE | setpoint {:.1} -> {:.1}\u{00b0}C", from, to);
            }
            AppEvent::SensorFault(e) => {
                warn!("FAULT | thermistor: {}", e);
            }
            AppEvent::SensorRecovered(c) => {
                info!("FAULT | thermistor recovered at {:.1}\u{00b0}C", c);
            }
            AppEvent::RemoteRejected(e) => {
                warn!("CLOUD | remote write rejected: {}", e);
            }
            AppEvent::Started(state) => {
                info!(
                    "START | set={:.1}\u{00b0}C mode={} cooler={}",
                    state.setpoint,
                    mode_name(state.mode),
                    on_off(state.cooler_on),
                );
            }
        }
    }
}
