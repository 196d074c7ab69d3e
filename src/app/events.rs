//! Outbound application events.
//!
//! The [`ThermostatService`](super::service::ThermostatService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on the
//! other side decide what to do with them: log to serial, count them in
//! tests, etc.

use crate::control::{ControlState, Mode, PolicyError};
use crate::error::SensorError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the restored state).
    Started(ControlState),

    /// Auto/Manual switched.
    ModeChanged { from: Mode, to: Mode },

    /// The relay was switched.
    CoolerChanged { on: bool, mode: Mode },

    /// Setpoint moved (button step or remote write).
    SetpointChanged { from: f32, to: f32 },

    /// A temperature sample failed; the last good value is retained.
    SensorFault(SensorError),

    /// A valid sample arrived after one or more faults.
    SensorRecovered(f32),

    /// A remote write was refused.
    RemoteRejected(PolicyError),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub temperature_c: Option<f32>,
    pub state: ControlState,
    pub sensor_fault: bool,
    pub cloud_connected: bool,
}
