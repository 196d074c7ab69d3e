//! Thermostat control: state, policy and persistence.

pub mod persist;
pub mod policy;
pub mod state;

pub use policy::{ControlPolicy, PolicyError, StateWrite};
pub use state::{ControlState, Mode};
