//! Cloud session over the simulated MQTT transport.

use thermorelay::adapters::device_id;
use thermorelay::adapters::mqtt::MqttTransport;
use thermorelay::cloud::channels;
use thermorelay::cloud::properties::{decode_remote, encode_state};
use thermorelay::cloud::{CloudSession, LinkEvent, NullTransport};
use thermorelay::control::{ControlState, Mode};

// Only this test touches the global inbound channel and link flag.
#[test]
fn mqtt_session_end_to_end() {
    let mac = device_id::read_mac();
    let id = device_id::device_id(&mac);
    let transport = MqttTransport::new(
        "mqtt://broker.local:1883",
        &device_id::client_id(&mac),
        "thermorelay",
        &id,
    )
    .unwrap();
    assert_eq!(transport.state_topic(), "thermorelay/TR-1A2B3C/state");

    let mut session = CloudSession::new(transport);

    // Broker unreachable: the attempt fails and backs off.
    assert_eq!(session.service(0), None);
    assert!(!session.is_connected());

    session.transport_mut().sim().reachable = true;
    session.service(1_000);
    assert!(!session.is_connected(), "still inside the 2 s backoff");
    session.service(2_000);
    assert_eq!(session.service(2_250), Some(LinkEvent::Up));
    assert_eq!(
        session.transport_mut().sim().subscribed.as_deref(),
        Some("thermorelay/TR-1A2B3C/set")
    );

    assert!(session.publish(&ControlState::default(), Some(21.5)));
    let (topic, payload) = session.transport_mut().sim().published[0].clone();
    assert_eq!(topic.as_str(), "thermorelay/TR-1A2B3C/state");
    let doc: serde_json::Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(doc["temperature"], 21.5);

    assert!(channels::push_inbound(br#"{"auto_Mode":false}"#));
    let write = session.next_write().unwrap();
    assert_eq!(write.mode, Some(Mode::Manual));
    assert!(session.next_write().is_none());

    channels::set_link_up(false);
    assert_eq!(session.service(2_500), Some(LinkEvent::Down));
}

#[test]
fn null_transport_never_connects() {
    let mut session = CloudSession::new(NullTransport);
    for t in (0..120_000).step_by(250) {
        assert_eq!(session.service(t), None);
    }
    assert!(!session.publish(&ControlState::default(), None));
}

#[test]
fn partial_remote_update_touches_only_named_fields() {
    let w = decode_remote(br#"{"set_temp":18.5,"firmware":"x"}"#).unwrap();
    assert_eq!(w.setpoint, Some(18.5));
    assert_eq!(w.mode, None);
    assert_eq!(w.cooler_on, None);
}

#[test]
fn state_document_omits_unknown_temperature() {
    let bytes = encode_state(&ControlState::default(), None).unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(doc["set_temp"], 25.0);
    assert!(doc.get("temperature").is_none_or(serde_json::Value::is_null));
}
