//! Cloud property payloads.
//!
//! Outbound (retained state topic):
//!
//! ```json
//! {"set_temp":25.0,"auto_Mode":true,"cooler":false,"temperature":23.4}
//! ```
//!
//! Inbound (set topic): any subset of `set_temp`, `auto_Mode`, `cooler`.
//! `temperature` is read-only and ignored if echoed back, as is any other
//! unknown field.

use serde::{Deserialize, Serialize};

use crate::control::{ControlState, Mode, StateWrite};
use crate::error::CommsError;

/// Largest inbound payload accepted from the broker.
pub const MAX_PAYLOAD: usize = 256;

/// Writable properties sent by the cloud.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RemoteUpdate {
    #[serde(default)]
    pub set_temp: Option<f32>,
    #[serde(default, rename = "auto_Mode")]
    pub auto_mode: Option<bool>,
    #[serde(default)]
    pub cooler: Option<bool>,
}

impl From<RemoteUpdate> for StateWrite {
    fn from(u: RemoteUpdate) -> Self {
        Self {
            setpoint: u.set_temp,
            mode: u.auto_mode.map(Mode::from_auto_flag),
            cooler_on: u.cooler,
        }
    }
}

/// Published state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateReport {
    pub set_temp: f32,
    #[serde(rename = "auto_Mode")]
    pub auto_mode: bool,
    pub cooler: bool,
    /// `null` until the first valid sample.
    pub temperature: Option<f32>,
}

impl StateReport {
    pub fn new(state: &ControlState, temperature: Option<f32>) -> Self {
        Self {
            set_temp: state.setpoint,
            auto_mode: state.mode.is_auto(),
            cooler: state.cooler_on,
            temperature,
        }
    }
}

/// Decode an inbound payload. Only syntax is checked here; value ranges
/// are the control policy's business.
pub fn decode_remote(payload: &[u8]) -> Result<StateWrite, CommsError> {
    if payload.len() > MAX_PAYLOAD {
        return Err(CommsError::MalformedPayload);
    }
    serde_json::from_slice::<RemoteUpdate>(payload)
        .map(StateWrite::from)
        .map_err(|_| CommsError::MalformedPayload)
}

pub fn encode_state(state: &ControlState, temperature: Option<f32>) -> Result<Vec<u8>, CommsError> {
    serde_json::to_vec(&StateReport::new(state, temperature))
        .map_err(|_| CommsError::MalformedPayload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_write() {
        let w = decode_remote(br#"{"set_temp":18.5,"auto_Mode":false,"cooler":true}"#).unwrap();
        assert_eq!(w.setpoint, Some(18.5));
        assert_eq!(w.mode, Some(Mode::Manual));
        assert_eq!(w.cooler_on, Some(true));
    }

    #[test]
    fn decodes_partial_write_and_ignores_readonly() {
        let w = decode_remote(br#"{"cooler":false,"temperature":30.1,"extra":1}"#).unwrap();
        assert_eq!(
            w,
            StateWrite {
                cooler_on: Some(false),
                ..StateWrite::default()
            }
        );
    }

    #[test]
    fn empty_object_is_empty_write() {
        assert!(decode_remote(b"{}").unwrap().is_empty());
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(decode_remote(b"not json"), Err(CommsError::MalformedPayload));
        assert_eq!(
            decode_remote(br#"{"set_temp":"warm"}"#),
            Err(CommsError::MalformedPayload)
        );
        assert_eq!(decode_remote(&[b' '; MAX_PAYLOAD + 1]), Err(CommsError::MalformedPayload));
    }

    #[test]
    fn encodes_state_with_wire_names() {
        let json = encode_state(&ControlState::default(), Some(23.5)).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(v["set_temp"], 25.0);
        assert_eq!(v["auto_Mode"], true);
        assert_eq!(v["cooler"], false);
        assert_eq!(v["temperature"], 23.5);
    }

    #[test]
    fn missing_temperature_is_null() {
        let json = encode_state(&ControlState::default(), None).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert!(v["temperature"].is_null());
    }
}
