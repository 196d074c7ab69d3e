//! Application service — the hexagonal core.
//!
//! [`ThermostatService`] owns the control policy, the button debouncer and
//! the latest temperature. It exposes a clean, hardware-agnostic API. All
//! I/O flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │   ThermostatService    │
//! ActuatorPort ◀──│ Debounce · Policy      │ ──▶ StoragePort
//!                 └────────────────────────┘
//! ```
//!
//! Every state change, whatever its source, goes through one commit path:
//! persist, drive the relay, emit events, hand the new state back to the
//! caller for publishing.

use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::persist;
use crate::control::{ControlPolicy, ControlState};
use crate::display::StatusView;
use crate::drivers::button::{ButtonEvent, ButtonId, Debouncer};

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, EventSink, SensorPort, StoragePort};

pub struct ThermostatService {
    policy: ControlPolicy,
    debouncer: Debouncer,
    /// Last temperature that converted cleanly.
    last_temp: Option<f32>,
    /// The most recent sample failed.
    sensor_fault: bool,
}

impl ThermostatService {
    /// Construct the service around a restored state.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig, initial: ControlState) -> Self {
        Self {
            policy: ControlPolicy::new(config, initial),
            debouncer: Debouncer::new(config.debounce_ms),
            last_temp: None,
            sensor_fault: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the relay to the restored state and announce it.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let state = self.policy.state();
        if let Err(e) = hw.set_cooler(state.cooler_on) {
            warn!("Service: restoring relay failed: {}", e);
        }
        sink.emit(&AppEvent::Started(state));
        info!("ThermostatService started: {:?}", state);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Sample the thermistor and run the control policy.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`]; this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    ///
    /// Returns the new state if anything changed.
    pub fn on_sample(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) -> Option<ControlState> {
        match hw.read_temperature() {
            Ok(celsius) => {
                if self.sensor_fault {
                    sink.emit(&AppEvent::SensorRecovered(celsius));
                }
                self.sensor_fault = false;
                self.last_temp = Some(celsius);
            }
            Err(e) => {
                if !self.sensor_fault {
                    sink.emit(&AppEvent::SensorFault(e));
                }
                self.sensor_fault = true;
                return None;
            }
        }

        let prev = self.policy.state();
        let next = self.policy.update(self.band_temperature(), &[]);
        self.commit(prev, next, hw, store, sink)
    }

    /// Sample both buttons through the debouncer and apply any presses.
    pub fn poll_buttons(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
        now_ms: u32,
    ) -> Option<ControlState> {
        let mut events: heapless::Vec<ButtonEvent, 2> = heapless::Vec::new();
        for id in ButtonId::ALL {
            let level = hw.read_button(id);
            if let Some(event) = self.debouncer.observe(id, level, now_ms) {
                info!("Service: {:?} pressed", id);
                // At most one event per button.
                let _ = events.push(event);
            }
        }
        if events.is_empty() {
            return None;
        }

        let prev = self.policy.state();
        let next = self.policy.update(self.band_temperature(), &events);
        self.commit(prev, next, hw, store, sink)
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (cloud write, injected press).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) -> Option<ControlState> {
        let prev = self.policy.state();
        let next = match cmd {
            AppCommand::Press(id) => self
                .policy
                .update(self.band_temperature(), &[ButtonEvent::pressed(id)]),
            AppCommand::Remote(write) => match self.policy.apply_remote(write) {
                Ok(state) => state,
                Err(e) => {
                    warn!("Service: remote write rejected: {}", e);
                    sink.emit(&AppEvent::RemoteRejected(e));
                    return None;
                }
            },
        };
        self.commit(prev, next, hw, store, sink)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> ControlState {
        self.policy.state()
    }

    /// Last good temperature, kept across sensor faults.
    pub fn last_temperature(&self) -> Option<f32> {
        self.last_temp
    }

    pub fn sensor_fault(&self) -> bool {
        self.sensor_fault
    }

    pub fn build_telemetry(&self, cloud_connected: bool) -> TelemetryData {
        TelemetryData {
            temperature_c: self.last_temp,
            state: self.policy.state(),
            sensor_fault: self.sensor_fault,
            cloud_connected,
        }
    }

    pub fn status_view(&self, cloud_connected: bool) -> StatusView {
        let state = self.policy.state();
        StatusView {
            temperature_c: self.last_temp,
            sensor_fault: self.sensor_fault,
            setpoint_c: state.setpoint,
            mode: state.mode,
            cooler_on: state.cooler_on,
            cloud_connected,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// The band rule only sees a temperature while the sensor is healthy.
    fn band_temperature(&self) -> Option<f32> {
        if self.sensor_fault { None } else { self.last_temp }
    }

    fn commit(
        &mut self,
        prev: ControlState,
        next: ControlState,
        hw: &mut impl ActuatorPort,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) -> Option<ControlState> {
        if prev == next {
            return None;
        }

        if let Err(e) = persist::save_state(store, &next) {
            warn!("Service: persisting state failed: {}", e);
        }
        if let Err(e) = hw.set_cooler(next.cooler_on) {
            warn!("Service: relay write failed: {}", e);
        }

        if prev.mode != next.mode {
            sink.emit(&AppEvent::ModeChanged {
                from: prev.mode,
                to: next.mode,
            });
        }
        if prev.setpoint != next.setpoint {
            sink.emit(&AppEvent::SetpointChanged {
                from: prev.setpoint,
                to: next.setpoint,
            });
        }
        if prev.cooler_on != next.cooler_on {
            sink.emit(&AppEvent::CoolerChanged {
                on: next.cooler_on,
                mode: next.mode,
            });
        }
        Some(next)
    }
}
