//! Cloud telemetry link.
//!
//! The device mirrors `set_temp`, `auto_Mode` and `cooler` (plus the
//! read-only `temperature`) to a broker and accepts writes to the first
//! three. Inbound writes travel the same persistence and relay path as
//! button presses.

pub mod backoff;
pub mod channels;
pub mod properties;
pub mod session;
pub mod transport;

pub use session::{CloudSession, LinkEvent};
pub use transport::{CloudTransport, NullTransport};
