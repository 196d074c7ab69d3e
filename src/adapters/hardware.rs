//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the thermistor reader, the relay and link LED drivers and the two
//! button inputs, exposing them through [`SensorPort`] and
//! [`ActuatorPort`]. Pins are any `embedded-hal` 1.0 implementation:
//! `esp-idf-hal` `PinDriver`s on the device, recording mocks in tests.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::button::{ButtonId, Level};
use crate::drivers::relay::RelayDriver;
use crate::drivers::status_led::StatusLed;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::temperature::TemperatureSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<R, L, B1, B2> {
    sensor: TemperatureSensor,
    relay: RelayDriver<R>,
    link_led: StatusLed<L>,
    button1: B1,
    button2: B2,
}

impl<R, L, B1, B2> HardwareAdapter<R, L, B1, B2>
where
    R: OutputPin,
    L: OutputPin,
    B1: InputPin,
    B2: InputPin,
{
    pub fn new(
        sensor: TemperatureSensor,
        relay: RelayDriver<R>,
        link_led: StatusLed<L>,
        button1: B1,
        button2: B2,
    ) -> Self {
        Self {
            sensor,
            relay,
            link_led,
            button1,
            button2,
        }
    }

    pub fn relay_is_on(&self) -> bool {
        self.relay.is_on()
    }

    pub fn link_led_is_lit(&self) -> bool {
        self.link_led.is_lit()
    }
}

/// A pin that cannot be read counts as released.
fn level_of(pin: &mut impl InputPin) -> Level {
    pin.is_high().map_or(Level::High, Level::from_high)
}

// ── SensorPort implementation ─────────────────────────────────

impl<R, L, B1, B2> SensorPort for HardwareAdapter<R, L, B1, B2>
where
    R: OutputPin,
    L: OutputPin,
    B1: InputPin,
    B2: InputPin,
{
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.sensor.read().map(|r| r.celsius)
    }

    fn read_button(&mut self, id: ButtonId) -> Level {
        match id {
            ButtonId::Button1 => level_of(&mut self.button1),
            ButtonId::Button2 => level_of(&mut self.button2),
        }
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<R, L, B1, B2> ActuatorPort for HardwareAdapter<R, L, B1, B2>
where
    R: OutputPin,
    L: OutputPin,
    B1: InputPin,
    B2: InputPin,
{
    fn set_cooler(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.relay.set(on)
    }

    fn set_link_led(&mut self, lit: bool) {
        if let Err(e) = self.link_led.set(lit) {
            warn!("Link LED: {}", e);
        }
    }
}
