//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements both [`ConfigPort`] and [`StoragePort`] for ThermoRelay.
//!
//! - Config validation: all fields are range-checked before persistence
//!   and again on load; a stored blob that fails the check is replaced by
//!   the defaults.
//! - Namespace isolation: the config blob lives in `thermorelay`, control
//!   state in `Relay_State`.
//! - Atomic writes: ESP-IDF NVS commits are atomic per nvs_commit().
//!
//! An adapter built with [`NvsAdapter::unavailable`] answers every call
//! with [`StorageError::Unavailable`]; the controller then runs on
//! defaults for the session.

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::SystemConfig;
use log::{info, warn};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const CONFIG_NAMESPACE: &str = "thermorelay";
const CONFIG_KEY: &str = "syscfg";

#[cfg(target_os = "espidf")]
const MAX_BLOB_SIZE: usize = 1024;

pub struct NvsAdapter {
    available: bool,
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Create a new NvsAdapter and initialise NVS flash.
    ///
    /// Returns `Err(ConfigError::IoError)` if flash initialisation fails
    /// unrecoverably. On first boot or after a version mismatch the NVS
    /// partition is erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as i32 || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as i32 {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK as i32 {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK as i32 {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK as i32 {
                return Err(ConfigError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            available: true,
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        })
    }

    /// An adapter that refuses every operation. Used when flash init fails.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// NVS names are at most 15 bytes plus NUL.
    #[cfg(target_os = "espidf")]
    fn c_name(name: &str) -> [u8; 16] {
        let mut buf = [0u8; 16];
        let bytes = name.as_bytes();
        let len = bytes.len().min(15);
        buf[..len].copy_from_slice(&bytes[..len]);
        buf
    }

    /// Open an NVS namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let ns_buf = Self::c_name(namespace);
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn map_err(code: i32) -> StorageError {
        if code == ESP_ERR_NVS_NOT_FOUND as i32 {
            StorageError::NotFound
        } else if code == ESP_ERR_NVS_NOT_ENOUGH_SPACE as i32 {
            StorageError::Full
        } else {
            StorageError::IoError
        }
    }
}

/// Decode a stored config blob. A blob that decodes but fails validation
/// yields the defaults.
fn decode_config(bytes: &[u8]) -> Result<SystemConfig, ConfigError> {
    let cfg: SystemConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
    match validate_config(&cfg) {
        Ok(()) => Ok(cfg),
        Err(e) => {
            warn!("NvsAdapter: stored config rejected ({}), using defaults", e);
            Ok(SystemConfig::default())
        }
    }
}

pub(crate) fn validate_config(cfg: &SystemConfig) -> Result<(), ConfigError> {
    if !cfg.hysteresis_c.is_finite() || cfg.hysteresis_c <= 0.0 {
        return Err(ConfigError::ValidationFailed("hysteresis_c must be > 0"));
    }
    if !cfg.setpoint_min_c.is_finite()
        || !cfg.setpoint_max_c.is_finite()
        || cfg.setpoint_min_c >= cfg.setpoint_max_c
    {
        return Err(ConfigError::ValidationFailed(
            "setpoint_min_c must be < setpoint_max_c",
        ));
    }
    if !(cfg.setpoint_min_c..=cfg.setpoint_max_c).contains(&cfg.default_setpoint_c) {
        return Err(ConfigError::ValidationFailed(
            "default_setpoint_c must lie within the setpoint bounds",
        ));
    }
    if let crate::config::AutoButton2::StepSetpoint { step_c } = cfg.auto_button2 {
        if !step_c.is_finite() || step_c <= 0.0 {
            return Err(ConfigError::ValidationFailed("auto_button2 step_c must be > 0"));
        }
    }
    if !(1..=1000).contains(&cfg.debounce_ms) {
        return Err(ConfigError::ValidationFailed("debounce_ms must be 1–1000"));
    }
    if !(100..=60_000).contains(&cfg.sensor_read_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "sensor_read_interval_ms must be 100–60000",
        ));
    }
    if !(50..=10_000).contains(&cfg.display_refresh_ms) {
        return Err(ConfigError::ValidationFailed(
            "display_refresh_ms must be 50–10000",
        ));
    }
    if cfg.loop_idle_ms >= cfg.debounce_ms {
        return Err(ConfigError::ValidationFailed(
            "loop_idle_ms must be shorter than debounce_ms",
        ));
    }
    if cfg.watchdog_timeout_ms <= cfg.sensor_read_interval_ms {
        return Err(ConfigError::ValidationFailed(
            "watchdog_timeout_ms must exceed sensor_read_interval_ms",
        ));
    }
    if !(1..=3600).contains(&cfg.cloud.publish_interval_secs) {
        return Err(ConfigError::ValidationFailed(
            "publish_interval_secs must be 1–3600",
        ));
    }
    let t = &cfg.thermistor;
    if !(t.r_fixed_ohm > 0.0 && t.r0_ohm > 0.0 && t.beta > 0.0 && t.t0_kelvin > 0.0 && t.supply_v > 0.0)
        || t.adc_max == 0
    {
        return Err(ConfigError::ValidationFailed(
            "thermistor parameters must be positive",
        ));
    }
    Ok(())
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        if !self.available {
            return Err(ConfigError::IoError);
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
            if let Some(bytes) = self.store.borrow().get(&key) {
                let cfg = decode_config(bytes)?;
                info!("NvsAdapter: loaded config from store");
                Ok(cfg)
            } else {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(SystemConfig::default())
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(CONFIG_NAMESPACE, false, |handle| {
                let key_cstr = Self::c_name(CONFIG_KEY);
                let mut size: usize = 0;

                // First call: get size
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key_cstr.as_ptr() as *const _,
                        core::ptr::null_mut(),
                        &mut size,
                    )
                };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                if size == 0 || size > MAX_BLOB_SIZE {
                    return Err(ESP_ERR_NVS_INVALID_LENGTH as i32);
                }

                let mut buf = vec![0u8; size];
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key_cstr.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                Ok(buf)
            });

            match result {
                Ok(bytes) => {
                    let cfg = decode_config(&bytes)?;
                    info!("NvsAdapter: loaded config from NVS ({} bytes)", bytes.len());
                    Ok(cfg)
                }
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND as i32 => {
                    info!("NvsAdapter: no stored config, using defaults");
                    Ok(SystemConfig::default())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS read error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        if !self.available {
            return Err(ConfigError::IoError);
        }
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;

        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
            self.store.borrow_mut().insert(key, bytes);
            info!("NvsAdapter: config saved (simulation)");
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(CONFIG_NAMESPACE, true, |handle| {
                let key_cstr = Self::c_name(CONFIG_KEY);
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        key_cstr.as_ptr() as *const _,
                        bytes.as_ptr() as *const _,
                        bytes.len(),
                    )
                };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                Ok(())
            });
            match result {
                Ok(()) => {
                    info!("NvsAdapter: config saved to NVS ({} bytes)", bytes.len());
                    Ok(())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS write error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }
}

impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            match self.store.borrow().get(&composite) {
                Some(data) => {
                    let len = data.len().min(buf.len());
                    buf[..len].copy_from_slice(&data[..len]);
                    Ok(len)
                }
                None => Err(StorageError::NotFound),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            Self::with_nvs_handle(namespace, false, |handle| {
                let key_buf = Self::c_name(key);
                let mut size = buf.len();
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key_buf.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                Ok(size)
            })
            .map_err(Self::map_err)
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow_mut().insert(composite, data.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            Self::with_nvs_handle(namespace, true, |handle| {
                let key_buf = Self::c_name(key);
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        key_buf.as_ptr() as *const _,
                        data.as_ptr() as *const _,
                        data.len(),
                    )
                };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                Ok(())
            })
            .map_err(Self::map_err)
        }
    }
}
