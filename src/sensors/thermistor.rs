//! NTC thermistor conversion (10 kΩ @ 25 °C, B = 3950).
//!
//! The thermistor sits on the low side of a voltage divider with a fixed
//! resistor to the supply:
//!
//! ```text
//!   V_SUPPLY ──[ R_FIXED ]──┬──[ NTC ]── GND
//!                           │
//!                          ADC
//! ```
//!
//! `R_ntc = R_FIXED · V / (V_SUPPLY − V)`, then the Beta equation
//! `1/T = 1/T0 + (1/β)·ln(R/R0)` gives Kelvin.

use serde::{Deserialize, Serialize};

use crate::error::SensorError;

/// Lowest temperature the control loop will accept as a real reading.
pub const MIN_PLAUSIBLE_C: f32 = -40.0;
/// Highest temperature the control loop will accept as a real reading.
pub const MAX_PLAUSIBLE_C: f32 = 125.0;

const KELVIN_OFFSET: f32 = 273.15;

/// Divider and thermistor constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermistorParams {
    /// Fixed divider resistor (Ω).
    pub r_fixed_ohm: f32,
    /// Beta coefficient (K).
    pub beta: f32,
    /// Reference temperature (K).
    pub t0_kelvin: f32,
    /// Thermistor resistance at `t0_kelvin` (Ω).
    pub r0_ohm: f32,
    /// Divider supply voltage. Measured, not nominal: the board runs from a
    /// battery that sags below 3.3 V.
    pub supply_v: f32,
    /// Full-scale ADC count (4095 for 12-bit).
    pub adc_max: u16,
}

impl Default for ThermistorParams {
    fn default() -> Self {
        Self {
            r_fixed_ohm: 10_000.0,
            beta: 3950.0,
            t0_kelvin: 298.15,
            r0_ohm: 10_000.0,
            supply_v: 3.1,
            adc_max: 4095,
        }
    }
}

impl ThermistorParams {
    /// Convert a raw ADC sample to °C.
    ///
    /// Returns [`SensorError::OutOfRange`] at either ADC rail (open or
    /// shorted thermistor) and for any result outside
    /// [`MIN_PLAUSIBLE_C`]..=[`MAX_PLAUSIBLE_C`], so callers never see NaN.
    pub fn adc_to_celsius(&self, raw: u16) -> Result<f32, SensorError> {
        if raw == 0 || raw >= self.adc_max {
            return Err(SensorError::OutOfRange);
        }

        let voltage = f32::from(raw) / f32::from(self.adc_max) * self.supply_v;
        let headroom = self.supply_v - voltage;
        if headroom <= 0.0 {
            return Err(SensorError::OutOfRange);
        }

        let r_ntc = self.r_fixed_ohm * voltage / headroom;
        let inv_t = (1.0 / self.t0_kelvin) + (1.0 / self.beta) * (r_ntc / self.r0_ohm).ln();
        if !inv_t.is_finite() || inv_t <= 0.0 {
            return Err(SensorError::OutOfRange);
        }

        let celsius = (1.0 / inv_t) - KELVIN_OFFSET;
        if !celsius.is_finite() || !(MIN_PLAUSIBLE_C..=MAX_PLAUSIBLE_C).contains(&celsius) {
            return Err(SensorError::OutOfRange);
        }
        Ok(celsius)
    }
}
