//! ThermostatService: samples, presses and remote writes against mocks.

use super::mock_hw::{MockHardware, MockNvs, RecordingSink};

use thermorelay::app::commands::AppCommand;
use thermorelay::app::events::AppEvent;
use thermorelay::app::service::ThermostatService;
use thermorelay::config::{AutoButton2, SystemConfig};
use thermorelay::control::{persist, ControlState, Mode, PolicyError, StateWrite};
use thermorelay::drivers::button::ButtonId;
use thermorelay::error::SensorError;

fn started(config: &SystemConfig, initial: ControlState) -> (ThermostatService, MockHardware, MockNvs, RecordingSink) {
    let mut svc = ThermostatService::new(config, initial);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut hw, &mut sink);
    (svc, hw, MockNvs::new(), sink)
}

#[test]
fn start_restores_relay_and_announces() {
    let initial = ControlState {
        cooler_on: true,
        ..ControlState::default()
    };
    let (_svc, hw, _nvs, sink) = started(&SystemConfig::default(), initial);
    assert_eq!(hw.relay_calls, vec![true]);
    assert_eq!(sink.events[0], AppEvent::Started(initial));
}

#[test]
fn hysteresis_drives_relay_and_persists() {
    let (mut svc, mut hw, mut nvs, mut sink) =
        started(&SystemConfig::default(), ControlState::default());

    hw.temp = Ok(26.5);
    let next = svc.on_sample(&mut hw, &mut nvs, &mut sink).unwrap();
    assert!(next.cooler_on);
    assert!(hw.relay_on());
    assert_eq!(nvs.raw(persist::NAMESPACE, persist::KEY_COOLER), Some(&[1u8][..]));

    hw.temp = Ok(25.2);
    assert!(svc.on_sample(&mut hw, &mut nvs, &mut sink).is_none(), "inside band");

    hw.temp = Ok(24.0);
    let next = svc.on_sample(&mut hw, &mut nvs, &mut sink).unwrap();
    assert!(!next.cooler_on);
    assert!(!hw.relay_on());
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::CoolerChanged { .. })),
        2
    );
}

#[test]
fn unchanged_state_writes_nothing() {
    let (mut svc, mut hw, mut nvs, mut sink) =
        started(&SystemConfig::default(), ControlState::default());
    hw.temp = Ok(25.0);
    svc.on_sample(&mut hw, &mut nvs, &mut sink);
    svc.on_sample(&mut hw, &mut nvs, &mut sink);
    assert_eq!(nvs.writes, 0);
    assert_eq!(hw.relay_calls.len(), 1, "only the startup write");
}

#[test]
fn sensor_fault_holds_relay_and_reports_once() {
    let (mut svc, mut hw, mut nvs, mut sink) =
        started(&SystemConfig::default(), ControlState::default());

    hw.temp = Ok(27.0);
    svc.on_sample(&mut hw, &mut nvs, &mut sink);
    assert!(hw.relay_on());

    hw.temp = Err(SensorError::OutOfRange);
    assert!(svc.on_sample(&mut hw, &mut nvs, &mut sink).is_none());
    assert!(svc.on_sample(&mut hw, &mut nvs, &mut sink).is_none());
    assert!(svc.sensor_fault());
    assert_eq!(svc.last_temperature(), Some(27.0), "last good value retained");
    assert!(hw.relay_on());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorFault(_))), 1);

    let view = svc.status_view(false);
    assert!(view.sensor_fault);
    assert_eq!(view.temperature_c, Some(27.0));

    hw.temp = Ok(23.0);
    let next = svc.on_sample(&mut hw, &mut nvs, &mut sink).unwrap();
    assert!(!next.cooler_on);
    assert!(sink.events.contains(&AppEvent::SensorRecovered(23.0)));
}

#[test]
fn buttons_toggle_mode_then_cooler() {
    let (mut svc, mut hw, mut nvs, mut sink) =
        started(&SystemConfig::default(), ControlState::default());

    hw.press(ButtonId::Button1);
    let s = svc.poll_buttons(&mut hw, &mut nvs, &mut sink, 0).unwrap();
    assert_eq!(s.mode, Mode::Manual);
    hw.release(ButtonId::Button1);
    svc.poll_buttons(&mut hw, &mut nvs, &mut sink, 10);

    hw.press(ButtonId::Button2);
    let s = svc.poll_buttons(&mut hw, &mut nvs, &mut sink, 20).unwrap();
    assert!(s.cooler_on);
    assert!(hw.relay_on());
    assert_eq!(nvs.raw(persist::NAMESPACE, persist::KEY_MODE), Some(&[0u8][..]));
}

#[test]
fn bouncing_contact_yields_one_press() {
    let (mut svc, mut hw, mut nvs, mut sink) =
        started(&SystemConfig::default(), ControlState::default());

    hw.press(ButtonId::Button1);
    svc.poll_buttons(&mut hw, &mut nvs, &mut sink, 0);
    for t in [5, 15, 25, 35] {
        hw.release(ButtonId::Button1);
        svc.poll_buttons(&mut hw, &mut nvs, &mut sink, t);
        hw.press(ButtonId::Button1);
        svc.poll_buttons(&mut hw, &mut nvs, &mut sink, t + 5);
    }
    assert_eq!(svc.state().mode, Mode::Manual, "exactly one toggle");
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ModeChanged { .. })), 1);
}

#[test]
fn button2_in_auto_is_ignored_by_default() {
    let (mut svc, mut hw, mut nvs, mut sink) =
        started(&SystemConfig::default(), ControlState::default());
    hw.press(ButtonId::Button2);
    assert!(svc.poll_buttons(&mut hw, &mut nvs, &mut sink, 0).is_none());
    assert_eq!(svc.state(), ControlState::default());
}

#[test]
fn button2_in_auto_can_step_setpoint() {
    let config = SystemConfig {
        auto_button2: AutoButton2::StepSetpoint { step_c: 0.5 },
        ..SystemConfig::default()
    };
    let (mut svc, mut hw, mut nvs, mut sink) = started(&config, ControlState::default());
    hw.press(ButtonId::Button2);
    let s = svc.poll_buttons(&mut hw, &mut nvs, &mut sink, 0).unwrap();
    assert_eq!(s.setpoint, 25.5);
    assert!(sink.events.contains(&AppEvent::SetpointChanged { from: 25.0, to: 25.5 }));
}

#[test]
fn remote_write_takes_the_button_path() {
    let (mut svc, mut hw, mut nvs, mut sink) =
        started(&SystemConfig::default(), ControlState::default());

    let write = StateWrite {
        setpoint: Some(20.0),
        mode: Some(Mode::Manual),
        cooler_on: Some(true),
    };
    let s = svc
        .handle_command(AppCommand::Remote(write), &mut hw, &mut nvs, &mut sink)
        .unwrap();
    assert_eq!(
        s,
        ControlState {
            setpoint: 20.0,
            mode: Mode::Manual,
            cooler_on: true
        }
    );
    assert!(hw.relay_on());
    assert_eq!(persist::load_state(&nvs, &SystemConfig::default()), s);
}

#[test]
fn invalid_remote_setpoint_is_rejected() {
    let (mut svc, mut hw, mut nvs, mut sink) =
        started(&SystemConfig::default(), ControlState::default());

    let write = StateWrite {
        setpoint: Some(f32::NAN),
        cooler_on: Some(true),
        ..StateWrite::default()
    };
    assert!(svc
        .handle_command(AppCommand::Remote(write), &mut hw, &mut nvs, &mut sink)
        .is_none());
    assert_eq!(svc.state(), ControlState::default());
    assert_eq!(nvs.writes, 0);
    assert!(sink
        .events
        .contains(&AppEvent::RemoteRejected(PolicyError::NonFiniteSetpoint)));
}

#[test]
fn injected_press_behaves_like_a_button() {
    let (mut svc, mut hw, mut nvs, mut sink) =
        started(&SystemConfig::default(), ControlState::default());
    let s = svc
        .handle_command(AppCommand::Press(ButtonId::Button1), &mut hw, &mut nvs, &mut sink)
        .unwrap();
    assert_eq!(s.mode, Mode::Manual);
}

#[test]
fn store_failure_does_not_stop_control() {
    let mut svc = ThermostatService::new(&SystemConfig::default(), ControlState::default());
    let mut hw = MockHardware::new();
    let mut nvs = MockNvs::unavailable();
    let mut sink = RecordingSink::new();

    assert_eq!(
        persist::load_state(&nvs, &SystemConfig::default()),
        ControlState::default()
    );
    hw.temp = Ok(30.0);
    assert!(svc.on_sample(&mut hw, &mut nvs, &mut sink).is_some());
    assert!(hw.relay_on());
}
