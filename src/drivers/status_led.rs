//! Link status LED (GPIO 2, active HIGH).
//!
//! Lit while the cloud session is connected. Writes are skipped when the
//! requested state already matches.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::ActuatorError;

pub struct StatusLed<P> {
    pin: P,
    lit: Option<bool>,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, lit: None }
    }

    pub fn set(&mut self, lit: bool) -> Result<(), ActuatorError> {
        if self.lit == Some(lit) {
            return Ok(());
        }
        self.pin
            .set_state(PinState::from(lit))
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.lit = Some(lit);
        Ok(())
    }

    pub fn is_lit(&self) -> bool {
        self.lit.unwrap_or(false)
    }
}
