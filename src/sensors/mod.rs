//! Sensor subsystem.
//!
//! [`thermistor`] holds the pure ADC → °C conversion; [`temperature`]
//! wraps it around the ADC channel and keeps the last good reading so a
//! single bad sample never reaches the control policy.

pub mod temperature;
pub mod thermistor;
