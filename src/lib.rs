//! ThermoRelay firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the binary.
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; host builds get simulation stubs instead.

#![deny(unused_must_use)]

pub mod app;
pub mod cloud;
pub mod config;
pub mod control;
pub mod display;
pub mod error;
pub mod pins;
pub mod scheduler;

pub mod adapters;
pub mod drivers;
pub mod sensors;
