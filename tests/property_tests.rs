//! Property tests for the control core.
//!
//! Runs on host only; proptest is not available for ESP32 targets.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;

use thermorelay::adapters::nvs::NvsAdapter;
use thermorelay::cloud::properties::decode_remote;
use thermorelay::config::SystemConfig;
use thermorelay::control::{persist, ControlPolicy, ControlState, Mode};
use thermorelay::drivers::button::{ButtonId, Debouncer, Level};
use thermorelay::error::SensorError;
use thermorelay::sensors::thermistor::ThermistorParams;

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Auto), Just(Mode::Manual)]
}

proptest! {
    /// Every reading is either a plausible finite temperature or OutOfRange.
    #[test]
    fn thermistor_output_is_plausible_or_out_of_range(raw in 0u16..=u16::MAX) {
        let params = ThermistorParams::default();
        match params.adc_to_celsius(raw) {
            Ok(c) => {
                prop_assert!(c.is_finite());
                prop_assert!((-40.0..=125.0).contains(&c));
            }
            Err(e) => prop_assert_eq!(e, SensorError::OutOfRange),
        }
        if raw == 0 || raw >= params.adc_max {
            prop_assert!(params.adc_to_celsius(raw).is_err());
        }
    }

    /// The NTC sits on the low side, so temperature falls as the raw count
    /// rises.
    #[test]
    fn thermistor_is_monotonic(a in 1u16..4094, b in 1u16..4094) {
        let params = ThermistorParams::default();
        if let (Ok(ta), Ok(tb)) = (params.adc_to_celsius(a), params.adc_to_celsius(b)) {
            if a < b {
                prop_assert!(ta >= tb);
            }
        }
    }

    /// Presses closer together than the debounce interval never yield more
    /// than one event per window.
    #[test]
    fn debouncer_limits_press_rate(gaps in proptest::collection::vec(1u32..200, 1..40)) {
        let debounce_ms = 50;
        let mut deb = Debouncer::new(debounce_ms);
        let mut now = 0u32;
        let mut accepted: Vec<u32> = Vec::new();
        for gap in gaps {
            if deb.observe(ButtonId::Button1, Level::Low, now).is_some() {
                accepted.push(now);
            }
            now += gap / 2 + 1;
            let _ = deb.observe(ButtonId::Button1, Level::High, now);
            now += gap / 2 + 1;
        }
        prop_assert!(!accepted.is_empty(), "first press is always accepted");
        for pair in accepted.windows(2) {
            prop_assert!(pair[1] - pair[0] >= debounce_ms);
        }
    }

    /// Temperatures inside the band never switch the relay.
    #[test]
    fn no_chatter_inside_band(
        cooler_on in any::<bool>(),
        offsets in proptest::collection::vec(-0.99f32..0.99, 1..50),
    ) {
        let config = SystemConfig::default();
        let initial = ControlState { cooler_on, ..ControlState::default() };
        let mut policy = ControlPolicy::new(&config, initial);
        for off in offsets {
            let s = policy.update(Some(initial.setpoint + off * config.hysteresis_c), &[]);
            prop_assert_eq!(s.cooler_on, cooler_on);
        }
    }

    /// Whatever was saved is exactly what is loaded.
    #[test]
    fn persistence_round_trip(
        setpoint in 0.0f32..=50.0,
        mode in arb_mode(),
        cooler_on in any::<bool>(),
    ) {
        let config = SystemConfig::default();
        let mut nvs = NvsAdapter::new().unwrap();
        let state = ControlState { setpoint, mode, cooler_on };
        persist::save_state(&mut nvs, &state).unwrap();
        prop_assert_eq!(persist::load_state(&nvs, &config), state);
    }

    /// Arbitrary bytes never panic the remote-payload decoder.
    #[test]
    fn remote_decoder_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..300)) {
        let _ = decode_remote(&bytes);
    }
}
