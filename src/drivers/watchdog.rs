//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the device if the control loop
//! stalls for longer than the configured timeout.
//!
//! The main loop must call `feed()` on every iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

pub struct Watchdog {
    timeout_ms: u32,
    subscribed: bool,
    #[cfg(not(target_os = "espidf"))]
    feeds: core::cell::Cell<u32>,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before the loop starts.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK as i32 {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK as i32;
                if subscribed {
                    info!("Watchdog: subscribed ({} ms timeout, panic on trigger)", timeout_ms);
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self {
                    timeout_ms,
                    subscribed,
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("Watchdog(sim): {} ms, no-op", timeout_ms);
            Self {
                timeout_ms,
                subscribed: true,
                feeds: core::cell::Cell::new(0),
            }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Remove the calling task from the TWDT. Used before parking the task
    /// after a fatal startup error, so the device halts instead of
    /// resetting in a loop.
    pub fn unsubscribe(&mut self) {
        if !self.subscribed {
            return;
        }
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: removes the calling task, which `new` subscribed.
            let ret = unsafe { esp_task_wdt_delete(core::ptr::null_mut()) };
            if ret != ESP_OK as i32 {
                log::warn!("Watchdog: failed to unsubscribe ({})", ret);
                return;
            }
        }
        self.subscribed = false;
        info!("Watchdog: unsubscribed");
    }

    /// Feed the watchdog. Must be called at least once per timeout.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: resets the TWDT entry of the calling (subscribed) task.
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        if self.subscribed {
            self.feeds.set(self.feeds.get().wrapping_add(1));
        }
    }

    /// Number of feeds so far (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn feed_count(&self) -> u32 {
        self.feeds.get()
    }
}
