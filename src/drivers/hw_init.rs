//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 oneshot unit for the thermistor divider using raw
//! ESP-IDF sys calls. GPIO and I²C are taken through `esp-idf-hal` drivers
//! in `main()`. Called once from `main()` before the control loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcUnitFailed(i32),
    AdcChannelFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcUnitFailed(rc) => write!(f, "ADC1 unit init failed (rc={})", rc),
            Self::AdcChannelFailed(rc) => write!(f, "ADC1 channel config failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for crate::error::Error {
    fn from(_: HwInitError) -> Self {
        Self::Init("ADC1")
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe { init_adc()? };
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path. `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcUnitFailed(ret));
    }

    // 12 dB (a.k.a. 11 dB) attenuation covers the full 0–3.1 V divider swing.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe {
        adc_oneshot_config_channel(adc1_handle(), pins::THERMISTOR_ADC_CHANNEL, &chan_cfg)
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcChannelFailed(ret));
    }

    info!(
        "hw_init: ADC1 configured (CH{}=thermistor on GPIO{})",
        pins::THERMISTOR_ADC_CHANNEL,
        pins::THERMISTOR_ADC_GPIO
    );
    Ok(())
}

/// Raw 12-bit sample, or `None` if the driver reports an error.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Option<u16> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return None;
    }
    Some(raw.clamp(0, 4095) as u16)
}
