//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], the boundary for network connectivity.
//! The MQTT transport only gets useful once this reports connected.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::wifi::EspWifi`, driven
//!   without blocking (start/connect return immediately, state is polled).
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Reconnection policy
//!
//! A dropped or timed-out association waits an exponential backoff (2 s →
//! 4 s → 8 s … capped at 60 s) before the next attempt.

use core::fmt;
use log::{error, info, warn};

use crate::cloud::backoff::Backoff;

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    AlreadyConnected,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::AlreadyConnected => write!(f, "already connected to AP"),
        }
    }
}

pub trait ConnectivityPort {
    fn connect(&mut self, now_ms: u32) -> Result<(), ConnectivityError>;
    fn is_connected(&self) -> bool;
    fn poll(&mut self, now_ms: u32);
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting { since_ms: u32 },
    Connected,
    Reconnecting { attempt: u32 },
}

/// Association + DHCP budget per attempt.
pub const CONNECT_TIMEOUT_MS: u32 = 15_000;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    backoff: Backoff,
    #[cfg(target_os = "espidf")]
    driver: EspWifi<'static>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimAp,
}

/// Host stand-in for the access point.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, Copy)]
pub struct SimAp {
    pub in_range: bool,
    associated: bool,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(driver: EspWifi<'static>) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff: Backoff::new(),
            driver,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff: Backoff::new(),
            sim: SimAp {
                in_range: true,
                associated: false,
            },
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Simulation: move the access point in or out of range.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_in_range(&mut self, in_range: bool) {
        self.sim.in_range = in_range;
        if !in_range {
            self.sim.associated = false;
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let cfg = Configuration::Client(ClientConfiguration {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            auth_method,
            ..Default::default()
        });
        self.driver
            .set_configuration(&cfg)
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        if !self.driver.is_started().unwrap_or(false) {
            self.driver
                .start()
                .map_err(|_| ConnectivityError::ConnectionFailed)?;
        }
        self.driver
            .connect()
            .map_err(|_| ConnectivityError::ConnectionFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        if !self.sim.in_range {
            return Err(ConnectivityError::ConnectionFailed);
        }
        self.sim.associated = true;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Err(e) = self.driver.disconnect() {
            warn!("WiFi: disconnect: {:?}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.sim.associated = false;
    }

    /// Associated and holding an IP.
    #[cfg(target_os = "espidf")]
    fn platform_is_up(&self) -> bool {
        self.driver.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_up(&self) -> bool {
        self.sim.in_range && self.sim.associated
    }

    fn begin_attempt(&mut self, now_ms: u32, attempt: u32) {
        match self.platform_connect() {
            Ok(()) => self.state = WifiState::Connecting { since_ms: now_ms },
            Err(e) => {
                let wait = self.backoff.record_failure(now_ms);
                warn!("WiFi: attempt {} failed ({}), retry in {} ms", attempt, e, wait);
                self.state = WifiState::Reconnecting {
                    attempt: attempt + 1,
                };
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn connect(&mut self, now_ms: u32) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Err(ConnectivityError::AlreadyConnected);
        }

        info!("WiFi: connecting to '{}'", self.ssid);
        self.backoff.reset();
        match self.platform_connect() {
            Ok(()) => {
                self.state = WifiState::Connecting { since_ms: now_ms };
                Ok(())
            }
            Err(e) => {
                error!("WiFi: connection failed: {}", e);
                self.backoff.record_failure(now_ms);
                self.state = WifiState::Reconnecting { attempt: 1 };
                Err(e)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.platform_is_up()
    }

    fn poll(&mut self, now_ms: u32) {
        match self.state {
            WifiState::Connecting { since_ms } => {
                if self.platform_is_up() {
                    self.state = WifiState::Connected;
                    self.backoff.reset();
                    info!("WiFi: connected to '{}'", self.ssid);
                } else if now_ms.wrapping_sub(since_ms) >= CONNECT_TIMEOUT_MS {
                    let wait = self.backoff.record_failure(now_ms);
                    warn!("WiFi: association timed out, retry in {} ms", wait);
                    self.platform_disconnect();
                    self.state = WifiState::Reconnecting { attempt: 1 };
                }
            }
            WifiState::Connected => {
                if !self.platform_is_up() {
                    warn!("WiFi: connection lost, entering reconnect");
                    self.state = WifiState::Reconnecting { attempt: 0 };
                }
            }
            WifiState::Reconnecting { attempt } => {
                if self.backoff.ready(now_ms) {
                    info!("WiFi: reconnect attempt {}", attempt);
                    self.begin_attempt(now_ms, attempt);
                }
            }
            WifiState::Disconnected => {}
        }
    }

    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid
            .push_str(ssid)
            .map_err(|_| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|_| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> WifiAdapter {
        let mut a = WifiAdapter::new();
        a.set_credentials("HomeWiFi", "mysecret8").unwrap();
        a
    }

    #[test]
    fn rejects_empty_ssid() {
        let mut a = WifiAdapter::new();
        assert_eq!(a.set_credentials("", "password123"), Err(ConnectivityError::InvalidSsid));
    }

    #[test]
    fn rejects_short_password() {
        let mut a = WifiAdapter::new();
        assert_eq!(a.set_credentials("MyNet", "short"), Err(ConnectivityError::InvalidPassword));
    }

    #[test]
    fn accepts_open_network() {
        let mut a = WifiAdapter::new();
        assert!(a.set_credentials("OpenCafe", "").is_ok());
    }

    #[test]
    fn connect_without_credentials_fails() {
        let mut a = WifiAdapter::new();
        assert_eq!(a.connect(0), Err(ConnectivityError::NoCredentials));
    }

    #[test]
    fn connect_completes_on_poll() {
        let mut a = configured();
        a.connect(0).unwrap();
        assert!(!a.is_connected());
        a.poll(10);
        assert!(a.is_connected());
        assert_eq!(a.connect(20), Err(ConnectivityError::AlreadyConnected));
    }

    #[test]
    fn lost_link_reconnects_with_backoff() {
        let mut a = configured();
        a.connect(0).unwrap();
        a.poll(0);
        a.sim_set_in_range(false);
        a.poll(100);
        assert_eq!(a.state(), WifiState::Reconnecting { attempt: 0 });

        // First retry is immediate and fails; the next waits 2 s.
        a.poll(200);
        assert_eq!(a.state(), WifiState::Reconnecting { attempt: 1 });
        a.sim_set_in_range(true);
        a.poll(2_199);
        assert_eq!(a.state(), WifiState::Reconnecting { attempt: 1 });
        a.poll(2_200);
        assert!(matches!(a.state(), WifiState::Connecting { .. }));
        a.poll(2_300);
        assert!(a.is_connected());
    }

    #[test]
    fn out_of_range_connect_enters_reconnect() {
        let mut a = configured();
        a.sim_set_in_range(false);
        assert_eq!(a.connect(0), Err(ConnectivityError::ConnectionFailed));
        assert_eq!(a.state(), WifiState::Reconnecting { attempt: 1 });
    }
}
