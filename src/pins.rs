//! GPIO / peripheral pin assignments for the ThermoRelay board (ESP32-WROOM).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Relay
// ---------------------------------------------------------------------------

/// Cooler relay coil driver. Active LOW: LOW = relay energised.
pub const RELAY_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Button 1: toggles Auto / Manual mode.
pub const BUTTON1_GPIO: i32 = 4;
/// Button 2: toggles the cooler in Manual mode.
pub const BUTTON2_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Link LED
// ---------------------------------------------------------------------------

/// On-board LED, lit while the cloud session is connected.
pub const LINK_LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Thermistor (ADC1)
// ---------------------------------------------------------------------------

/// NTC thermistor, 10 kΩ @ 25 °C, voltage divider to ADC.
/// ADC1 channel 6 (GPIO 34, input-only pad).
pub const THERMISTOR_ADC_GPIO: i32 = 34;
/// ADC1 channel number for [`THERMISTOR_ADC_GPIO`].
pub const THERMISTOR_ADC_CHANNEL: u32 = 6;

// ---------------------------------------------------------------------------
// I²C bus (SSD1306 OLED)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// 400 kHz fast mode.
pub const I2C_FREQ_HZ: u32 = 400_000;
/// 7-bit address of the SSD1306 (SA0 tied low).
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;
