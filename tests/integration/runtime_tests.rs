//! Runtime: the full loop with every adapter mocked.

use super::mock_hw::{MockDisplay, MockHardware, MockNvs, MockTransport, RecordingSink};

use thermorelay::app::commands::AppCommand;
use thermorelay::app::events::AppEvent;
use thermorelay::app::runtime::Runtime;
use thermorelay::config::SystemConfig;
use thermorelay::control::{persist, ControlState, Mode};
use thermorelay::drivers::button::ButtonId;
use thermorelay::error::{DisplayError, Error};

type TestRuntime = Runtime<MockHardware, MockNvs, MockDisplay, MockTransport, RecordingSink>;

fn build(hw: MockHardware, display: MockDisplay) -> TestRuntime {
    let config = SystemConfig::default();
    let store = MockNvs::new();
    let initial = persist::load_state(&store, &config);
    Runtime::new(
        &config,
        initial,
        hw,
        store,
        display,
        MockTransport::default(),
        RecordingSink::new(),
    )
}

fn started(hw: MockHardware) -> TestRuntime {
    let mut rt = build(hw, MockDisplay::default());
    rt.start().unwrap();
    rt
}

#[test]
fn display_init_failure_is_fatal() {
    let display = MockDisplay {
        fail_init: true,
        ..MockDisplay::default()
    };
    let mut rt = build(MockHardware::new(), display);
    assert_eq!(rt.start(), Err(Error::Display(DisplayError::BusFailed)));
}

#[test]
fn empty_store_boots_with_safe_defaults() {
    let rt = started(MockHardware::new());
    assert_eq!(rt.service().state(), ControlState::default());
    assert_eq!(rt.hardware().relay_calls, vec![false]);
    assert!(!rt.hardware().link_led);
}

#[test]
fn sensor_task_runs_on_its_cadence() {
    let mut hw = MockHardware::new();
    hw.temp = Ok(26.5);
    let mut rt = started(hw);

    rt.step(0);
    assert!(rt.hardware().relay_on());

    rt.hardware_mut().temp = Ok(24.0);
    rt.step(500);
    assert!(rt.hardware().relay_on(), "sample not due yet");
    rt.step(1_000);
    assert!(!rt.hardware().relay_on());
}

#[test]
fn display_shows_changes_on_the_next_iteration() {
    let mut rt = started(MockHardware::new());
    rt.step(0);
    assert_eq!(rt.display().last().map(|v| v.mode), Some(Mode::Auto));

    rt.hardware_mut().press(ButtonId::Button1);
    rt.step(10);
    rt.step(20);
    assert_eq!(rt.display().last().map(|v| v.mode), Some(Mode::Manual));
}

#[test]
fn link_led_follows_cloud_session() {
    let mut rt = started(MockHardware::new());
    rt.session_mut().transport_mut().up = true;
    rt.step(0);
    assert!(rt.hardware().link_led);
    assert!(rt.session().is_connected());

    // The retained document is refreshed on link-up.
    let doc = rt.session().transport().last_doc().unwrap();
    assert_eq!(doc["set_temp"], 25.0);
    assert_eq!(doc["auto_Mode"], true);
    assert_eq!(doc["cooler"], false);
    assert_eq!(doc["temperature"], 25.0);

    rt.session_mut().transport_mut().up = false;
    rt.step(250);
    assert!(!rt.hardware().link_led);
}

#[test]
fn remote_write_persists_drives_relay_and_publishes() {
    let mut rt = started(MockHardware::new());
    rt.session_mut().transport_mut().up = true;
    rt.step(0);

    rt.session_mut()
        .transport_mut()
        .deliver(r#"{"set_temp":22.0,"auto_Mode":false,"cooler":true}"#);
    rt.step(10);

    let expected = ControlState {
        setpoint: 22.0,
        mode: Mode::Manual,
        cooler_on: true,
    };
    assert_eq!(rt.service().state(), expected);
    assert!(rt.hardware().relay_on());
    assert_eq!(persist::load_state(rt.store(), &SystemConfig::default()), expected);

    let doc = rt.session().transport().last_doc().unwrap();
    assert_eq!(doc["set_temp"], 22.0);
    assert_eq!(doc["auto_Mode"], false);
    assert_eq!(doc["cooler"], true);
}

#[test]
fn malformed_and_invalid_remote_writes_leave_state() {
    let mut rt = started(MockHardware::new());
    rt.step(0);

    rt.session_mut().transport_mut().deliver("not json");
    rt.session_mut().transport_mut().deliver(r#"{"set_temp":99.0}"#);
    rt.step(10);

    assert_eq!(rt.service().state(), ControlState::default());
    assert_eq!(rt.store().writes, 0);
    assert_eq!(
        rt.sink()
            .count(|e| matches!(e, AppEvent::RemoteRejected(_))),
        1
    );
}

#[test]
fn telemetry_is_emitted_every_publish_interval() {
    let mut rt = started(MockHardware::new());
    rt.step(0);
    rt.step(29_999);
    rt.step(30_000);
    assert_eq!(
        rt.sink().count(|e| matches!(e, AppEvent::Telemetry(_))),
        2
    );
}

#[test]
fn state_survives_a_reboot() {
    let mut rt = started(MockHardware::new());
    rt.dispatch(AppCommand::Press(ButtonId::Button1));
    rt.dispatch(AppCommand::Press(ButtonId::Button2));
    let before = rt.service().state();
    assert_eq!(before.mode, Mode::Manual);
    assert!(before.cooler_on);

    let store = rt.store().clone();
    let config = SystemConfig::default();
    let restored = persist::load_state(&store, &config);
    assert_eq!(restored, before);

    let mut rebooted = Runtime::new(
        &config,
        restored,
        MockHardware::new(),
        store,
        MockDisplay::default(),
        MockTransport::default(),
        RecordingSink::new(),
    );
    rebooted.start().unwrap();
    assert_eq!(rebooted.hardware().relay_calls, vec![true]);
}
