//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ThermostatService (domain)
//! ```
//!
//! Driven adapters (sensor, relay, display, event sinks, storage) implement
//! these traits. The [`ThermostatService`](super::service::ThermostatService)
//! and [`Runtime`](super::runtime::Runtime) consume them via generics, so the
//! domain core never touches hardware directly.
//!
//! The cloud link has its own byte-level port,
//! [`CloudTransport`](crate::cloud::transport::CloudTransport).

use crate::config::SystemConfig;
use crate::display::StatusView;
use crate::drivers::button::{ButtonId, Level};
use crate::error::{ActuatorError, DisplayError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain inputs.
pub trait SensorPort {
    /// Sample the thermistor and convert to °C.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;

    /// Raw (undebounced) level of a button input.
    fn read_button(&mut self, id: ButtonId) -> Level;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command outputs.
pub trait ActuatorPort {
    /// Energise (`true`) or release the cooler relay. Implementations own
    /// the active-low mapping; callers speak in cooler terms only.
    fn set_cooler(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Light the link LED while the cloud session is up.
    fn set_link_led(&mut self, lit: bool);
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

pub trait DisplayPort {
    /// Bring the panel up. Failure is fatal to the control loop.
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Draw the given status.
    fn render(&mut self, view: &StatusView) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists or
    /// the stored one fails validation.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage.
///
/// - Keys are namespaced to prevent collisions between subsystems.
/// - Write operations MUST be atomic: no partial writes on power loss.
///   The ESP-IDF NVS API guarantees this natively.
pub trait StoragePort {
    /// Read a value. Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// The backend never came up (flash init failed).
    Unavailable,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
