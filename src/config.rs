//! System configuration parameters
//!
//! All tunable parameters for the ThermoRelay controller.
//! Values can be overridden via NVS (non-volatile storage).

use serde::{Deserialize, Serialize};

use crate::sensors::thermistor::ThermistorParams;

/// What a Button 2 press does while the controller is in Auto mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AutoButton2 {
    /// Press is ignored; the hysteresis band alone drives the relay.
    Ignore,
    /// Raise the setpoint by `step_c`, wrapping to the minimum past the maximum.
    StepSetpoint { step_c: f32 },
}

/// Cloud endpoint and publish cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudConfig {
    /// MQTT broker URL, e.g. `mqtt://broker.local:1883`.
    pub broker_url: heapless::String<64>,
    /// Topic prefix; the device ID is appended.
    pub topic_prefix: heapless::String<24>,
    /// Unconditional state publish interval (seconds).
    pub publish_interval_secs: u32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        let mut broker_url = heapless::String::new();
        let _ = broker_url.push_str("mqtt://broker.local:1883");
        let mut topic_prefix = heapless::String::new();
        let _ = topic_prefix.push_str("thermorelay");
        Self {
            broker_url,
            topic_prefix,
            publish_interval_secs: 30,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Control ---
    /// Half-width of the band around the setpoint (°C).
    pub hysteresis_c: f32,
    /// Setpoint used when nothing is stored (°C).
    pub default_setpoint_c: f32,
    /// Lowest accepted setpoint (°C).
    pub setpoint_min_c: f32,
    /// Highest accepted setpoint (°C).
    pub setpoint_max_c: f32,
    /// Button 2 behaviour in Auto mode.
    pub auto_button2: AutoButton2,

    // --- Inputs ---
    /// Minimum spacing between accepted presses of one button (ms).
    pub debounce_ms: u32,

    // --- Sensor ---
    pub thermistor: ThermistorParams,

    // --- Timing ---
    /// Temperature read interval (milliseconds)
    pub sensor_read_interval_ms: u32,
    /// Display refresh interval (milliseconds)
    pub display_refresh_ms: u32,
    /// Idle delay at the end of each loop iteration (milliseconds)
    pub loop_idle_ms: u32,
    /// Watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,

    // --- Cloud ---
    pub cloud: CloudConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Control
            hysteresis_c: 1.0,
            default_setpoint_c: 25.0,
            setpoint_min_c: 0.0,
            setpoint_max_c: 50.0,
            auto_button2: AutoButton2::Ignore,

            // Inputs
            debounce_ms: 50,

            // Sensor
            thermistor: ThermistorParams::default(),

            // Timing
            sensor_read_interval_ms: 1000, // 1 Hz
            display_refresh_ms: 500,       // 2 Hz
            loop_idle_ms: 10,
            watchdog_timeout_ms: 10_000,

            // Cloud
            cloud: CloudConfig::default(),
        }
    }
}
