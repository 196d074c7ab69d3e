//! Thermistor temperature sensor.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use log::warn;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

use super::thermistor::ThermistorParams;

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_ADC: AtomicU16 = AtomicU16::new(2048);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: u16) {
    SIM_TEMP_ADC.store(raw, Ordering::Relaxed);
}

/// One converted sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    pub raw: u16,
    pub celsius: f32,
}

pub struct TemperatureSensor {
    params: ThermistorParams,
    adc_channel: u32,
    /// Last reading that converted cleanly.
    last_good: Option<TemperatureReading>,
    consecutive_faults: u32,
}

impl TemperatureSensor {
    pub fn new(adc_channel: u32, params: ThermistorParams) -> Self {
        Self {
            params,
            adc_channel,
            last_good: None,
            consecutive_faults: 0,
        }
    }

    /// Sample the ADC and convert.
    ///
    /// A failed sample is logged, together with the previous good value,
    /// and returned as `Err`.
    pub fn read(&mut self) -> Result<TemperatureReading, SensorError> {
        let result = self
            .read_adc()
            .and_then(|raw| self.convert(raw).map(|celsius| TemperatureReading { raw, celsius }));

        match result {
            Ok(reading) => {
                self.last_good = Some(reading);
                self.consecutive_faults = 0;
                Ok(reading)
            }
            Err(e) => {
                self.consecutive_faults = self.consecutive_faults.saturating_add(1);
                warn!(
                    "Thermistor: {} ({} consecutive), keeping last reading {:?}",
                    e,
                    self.consecutive_faults,
                    self.last_good.map(|r| r.celsius)
                );
                Err(e)
            }
        }
    }

    /// Pure conversion, exposed for the conversion tests.
    pub fn convert(&self, raw: u16) -> Result<f32, SensorError> {
        self.params.adc_to_celsius(raw)
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read(self.adc_channel).ok_or(SensorError::AdcReadFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        let _ = self.adc_channel;
        Ok(SIM_TEMP_ADC.load(Ordering::Relaxed))
    }
}
