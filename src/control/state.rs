//! The controller's single source of truth.

use serde::{Deserialize, Serialize};

/// Who decides the relay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// The hysteresis band around the setpoint drives the relay.
    Auto,
    /// Button 2 (or a remote write) drives the relay directly.
    Manual,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Auto => Self::Manual,
            Self::Manual => Self::Auto,
        }
    }

    pub fn is_auto(self) -> bool {
        self == Self::Auto
    }

    pub fn from_auto_flag(auto: bool) -> Self {
        if auto { Self::Auto } else { Self::Manual }
    }
}

/// Setpoint, mode and relay flag. Persisted on every change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    /// Target temperature (°C).
    pub setpoint: f32,
    pub mode: Mode,
    pub cooler_on: bool,
}

impl ControlState {
    /// Factory defaults: 25 °C, Auto, cooler off.
    pub const DEFAULT_SETPOINT_C: f32 = 25.0;

    /// Safe startup state with the given setpoint.
    pub fn safe(setpoint: f32) -> Self {
        Self {
            setpoint,
            mode: Mode::Auto,
            cooler_on: false,
        }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::safe(Self::DEFAULT_SETPOINT_C)
    }
}
