//! Application core: domain logic behind port traits.
//!
//! This module contains the thermostat's orchestration: the
//! [`ThermostatService`](service::ThermostatService) that routes samples,
//! presses and remote writes through the control policy, and the
//! [`Runtime`](runtime::Runtime) that drives it from the main loop.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod runtime;
pub mod service;
