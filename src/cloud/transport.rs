//! Cloud transport abstraction.
//!
//! Concrete implementations:
//! - MQTT over the ESP-IDF client ([`crate::adapters::mqtt::MqttTransport`])
//! - [`NullTransport`] when no broker is configured
//!
//! The [`CloudSession`](super::session::CloudSession) is generic over
//! `CloudTransport`, so swapping the broker client requires zero changes
//! to the session logic. Every method is non-blocking.

use super::channels::InboundFrame;
use crate::error::CommsError;

pub trait CloudTransport {
    /// Start (or restart) connecting. Completion is observed through
    /// [`is_connected`](Self::is_connected).
    fn connect(&mut self) -> Result<(), CommsError>;

    fn is_connected(&self) -> bool;

    /// Called once per link-up transition (e.g. to subscribe).
    fn on_link_up(&mut self) -> Result<(), CommsError> {
        Ok(())
    }

    /// Publish a state document on the retained state topic.
    fn publish_state(&mut self, payload: &[u8]) -> Result<(), CommsError>;

    /// Next inbound set-topic payload, if any.
    fn try_receive(&mut self) -> Option<InboundFrame>;
}

impl<T: CloudTransport + ?Sized> CloudTransport for Box<T> {
    fn connect(&mut self) -> Result<(), CommsError> {
        (**self).connect()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn on_link_up(&mut self) -> Result<(), CommsError> {
        (**self).on_link_up()
    }

    fn publish_state(&mut self, payload: &[u8]) -> Result<(), CommsError> {
        (**self).publish_state(payload)
    }

    fn try_receive(&mut self) -> Option<InboundFrame> {
        (**self).try_receive()
    }
}

/// A transport that is never connected and drops every publish.
/// Used when no broker URL is configured.
pub struct NullTransport;

impl CloudTransport for NullTransport {
    fn connect(&mut self) -> Result<(), CommsError> {
        Err(CommsError::CloudConnectFailed)
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn publish_state(&mut self, _payload: &[u8]) -> Result<(), CommsError> {
        Err(CommsError::CloudPublishFailed)
    }

    fn try_receive(&mut self) -> Option<InboundFrame> {
        None
    }
}
