//! Control policy: buttons, remote writes and the hysteresis band.
//!
//! ```text
//!            temp ≥ setpoint + h
//!   ┌─────┐ ───────────────────▶ ┌────┐
//!   │ OFF │                      │ ON │
//!   └─────┘ ◀─────────────────── └────┘
//!            temp ≤ setpoint − h
//! ```
//!
//! Inside the band the relay keeps whatever state it had, so a reading
//! hovering around the setpoint never chatters the compressor.

use core::fmt;

use log::{info, warn};

use super::state::{ControlState, Mode};
use crate::config::{AutoButton2, SystemConfig};
use crate::drivers::button::{ButtonEvent, ButtonId};

/// Slack when comparing a stepped setpoint against the upper bound.
const SETPOINT_EPSILON_C: f32 = 1e-3;

/// A partial overwrite of [`ControlState`] from outside the device.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StateWrite {
    pub setpoint: Option<f32>,
    pub mode: Option<Mode>,
    pub cooler_on: Option<bool>,
}

impl StateWrite {
    pub fn is_empty(&self) -> bool {
        self.setpoint.is_none() && self.mode.is_none() && self.cooler_on.is_none()
    }
}

/// Why a remote write was refused. The state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    /// The write carried no fields.
    EmptyWrite,
    /// Setpoint was NaN or infinite.
    NonFiniteSetpoint,
    /// Setpoint outside the configured bounds.
    SetpointOutOfBounds,
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWrite => write!(f, "empty write"),
            Self::NonFiniteSetpoint => write!(f, "setpoint is not a finite number"),
            Self::SetpointOutOfBounds => write!(f, "setpoint outside configured bounds"),
        }
    }
}

pub struct ControlPolicy {
    state: ControlState,
    hysteresis_c: f32,
    setpoint_min_c: f32,
    setpoint_max_c: f32,
    auto_button2: AutoButton2,
}

impl ControlPolicy {
    pub fn new(config: &SystemConfig, initial: ControlState) -> Self {
        Self {
            state: initial,
            hysteresis_c: config.hysteresis_c,
            setpoint_min_c: config.setpoint_min_c,
            setpoint_max_c: config.setpoint_max_c,
            auto_button2: config.auto_button2,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Apply button presses in order, then (in Auto) the hysteresis band.
    ///
    /// `current_temp` is `None` until the first valid sample; without it the
    /// band rule is skipped and the relay keeps its state.
    pub fn update(&mut self, current_temp: Option<f32>, events: &[ButtonEvent]) -> ControlState {
        for event in events {
            self.on_press(event.id);
        }
        if self.state.mode.is_auto() {
            if let Some(temp) = current_temp {
                self.apply_band(temp);
            }
        }
        self.state
    }

    /// Apply a remote overwrite. All fields are validated before any is
    /// applied. The band rule is not re-run here; the next sample does that.
    pub fn apply_remote(&mut self, write: StateWrite) -> Result<ControlState, PolicyError> {
        if write.is_empty() {
            return Err(PolicyError::EmptyWrite);
        }
        if let Some(sp) = write.setpoint {
            self.check_setpoint(sp)?;
        }

        if let Some(sp) = write.setpoint {
            self.state.setpoint = sp;
        }
        if let Some(mode) = write.mode {
            self.state.mode = mode;
        }
        if let Some(on) = write.cooler_on {
            self.state.cooler_on = on;
        }
        Ok(self.state)
    }

    pub fn check_setpoint(&self, setpoint: f32) -> Result<(), PolicyError> {
        if !setpoint.is_finite() {
            return Err(PolicyError::NonFiniteSetpoint);
        }
        if !(self.setpoint_min_c..=self.setpoint_max_c).contains(&setpoint) {
            return Err(PolicyError::SetpointOutOfBounds);
        }
        Ok(())
    }

    fn on_press(&mut self, id: ButtonId) {
        match (id, self.state.mode) {
            (ButtonId::Button1, mode) => {
                self.state.mode = mode.toggled();
                info!("Policy: mode {:?} -> {:?}", mode, self.state.mode);
            }
            (ButtonId::Button2, Mode::Manual) => {
                self.state.cooler_on = !self.state.cooler_on;
            }
            (ButtonId::Button2, Mode::Auto) => match self.auto_button2 {
                AutoButton2::Ignore => {
                    info!("Policy: Button2 ignored in Auto mode");
                }
                AutoButton2::StepSetpoint { step_c } => {
                    let next = self.state.setpoint + step_c;
                    self.state.setpoint = if next > self.setpoint_max_c + SETPOINT_EPSILON_C {
                        self.setpoint_min_c
                    } else {
                        next.min(self.setpoint_max_c)
                    };
                }
            },
        }
    }

    fn apply_band(&mut self, temp: f32) {
        if !temp.is_finite() {
            warn!("Policy: ignoring non-finite temperature");
            return;
        }
        let upper = self.state.setpoint + self.hysteresis_c;
        let lower = self.state.setpoint - self.hysteresis_c;
        if temp >= upper {
            self.state.cooler_on = true;
        } else if temp <= lower {
            self.state.cooler_on = false;
        }
    }
}
