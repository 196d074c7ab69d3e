//! Actuator and display drivers, hardware initialisation, watchdog.

pub mod button;
pub mod hw_init;
pub mod oled;
pub mod relay;
pub mod status_led;
pub mod watchdog;
