//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (the cloud
//! session, a test harness) that the
//! [`ThermostatService`](super::service::ThermostatService) interprets and
//! acts upon. Physical buttons normally arrive through the debouncer
//! instead.

use crate::control::StateWrite;
use crate::drivers::button::ButtonId;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// An already-debounced press.
    Press(ButtonId),

    /// Remote overwrite of setpoint / mode / cooler.
    Remote(StateWrite),
}
