//! Cooler relay driver.
//!
//! The relay module's input is active LOW: pulling the pin low energises
//! the coil. Every write goes through [`level_for`] so the inversion lives
//! in exactly one place.

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use super::button::Level;
use crate::error::ActuatorError;

/// Pin level that puts the relay in the requested state.
pub const fn level_for(cooler_on: bool) -> Level {
    if cooler_on { Level::Low } else { Level::High }
}

pub struct RelayDriver<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Take the pin and drive it to the de-energised level straight away,
    /// so the cooler never starts before the stored state is loaded.
    pub fn new(pin: P) -> Self {
        let mut relay = Self { pin, on: false };
        if relay.write(false).is_err() {
            warn!("Relay: initial release failed");
        }
        relay
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.write(on)?;
        if self.on != on {
            info!("Relay: cooler {}", if on { "ON" } else { "OFF" });
        }
        self.on = on;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    #[cfg(test)]
    pub(crate) fn pin(&self) -> &P {
        &self.pin
    }

    fn write(&mut self, on: bool) -> Result<(), ActuatorError> {
        let result = match level_for(on) {
            Level::Low => self.pin.set_low(),
            Level::High => self.pin.set_high(),
        };
        result.map_err(|_| ActuatorError::GpioWriteFailed)
    }
}
