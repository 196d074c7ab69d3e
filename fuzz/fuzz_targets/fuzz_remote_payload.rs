//! Fuzz target: `decode_remote`
//!
//! Drives arbitrary bytes from the MQTT set topic into the payload decoder
//! and asserts that it never panics and that every accepted write passes
//! through the control policy without corrupting state.
//!
//! cargo fuzz run fuzz_remote_payload

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermorelay::cloud::properties::decode_remote;
use thermorelay::config::SystemConfig;
use thermorelay::control::{ControlPolicy, ControlState};

fuzz_target!(|data: &[u8]| {
    let Ok(write) = decode_remote(data) else {
        return;
    };

    let config = SystemConfig::default();
    let before = ControlState::default();
    let mut policy = ControlPolicy::new(&config, before);
    match policy.apply_remote(write) {
        Ok(state) => {
            assert!(state.setpoint.is_finite());
            assert!((config.setpoint_min_c..=config.setpoint_max_c).contains(&state.setpoint));
        }
        Err(_) => assert_eq!(policy.state(), before, "rejected write must not mutate"),
    }
});
