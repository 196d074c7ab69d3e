//! Cloud session: connection upkeep, state publishing, inbound writes.
//!
//! ```text
//!            connect() ok            transport up
//!   ┌──────┐ ──────────▶ ┌─────────┐ ───────────▶ ┌────┐
//!   │ Idle │             │ Pending │              │ Up │
//!   └──────┘ ◀────────── └─────────┘              └────┘
//!      ▲      timeout /                             │
//!      │      error → backoff                       │ link lost
//!      └────────────────────────────────────────────┘
//! ```
//!
//! Nothing here blocks: [`CloudSession::service`] is called on a fixed
//! cadence and only ever starts an attempt.

use log::{info, warn};

use super::backoff::Backoff;
use super::properties::{decode_remote, encode_state};
use super::transport::CloudTransport;
use crate::control::{ControlState, StateWrite};

/// How long a started attempt may take before it counts as failed.
pub const CONNECT_TIMEOUT_MS: u32 = 15_000;

/// Link transitions reported by [`CloudSession::service`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Up,
    Down,
}

pub struct CloudSession<T> {
    transport: T,
    backoff: Backoff,
    attempt_started_ms: Option<u32>,
    link_up: bool,
    publishes: u32,
}

impl<T: CloudTransport> CloudSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            backoff: Backoff::new(),
            attempt_started_ms: None,
            link_up: false,
            publishes: 0,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.link_up
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Number of successful state publishes.
    pub fn publish_count(&self) -> u32 {
        self.publishes
    }

    /// Track the transport and start connection attempts when allowed.
    pub fn service(&mut self, now_ms: u32) -> Option<LinkEvent> {
        if self.transport.is_connected() {
            if self.link_up {
                return None;
            }
            self.link_up = true;
            self.attempt_started_ms = None;
            self.backoff.reset();
            if let Err(e) = self.transport.on_link_up() {
                warn!("Cloud: post-connect setup failed: {}", e);
            }
            info!("Cloud: link up");
            return Some(LinkEvent::Up);
        }

        let mut event = None;
        if self.link_up {
            self.link_up = false;
            warn!("Cloud: link lost");
            event = Some(LinkEvent::Down);
        }

        match self.attempt_started_ms {
            Some(started) if now_ms.wrapping_sub(started) < CONNECT_TIMEOUT_MS => {}
            Some(_) => {
                self.attempt_started_ms = None;
                let wait = self.backoff.record_failure(now_ms);
                warn!("Cloud: connect timed out, retry in {} ms", wait);
            }
            None if self.backoff.ready(now_ms) => match self.transport.connect() {
                Ok(()) => self.attempt_started_ms = Some(now_ms),
                Err(e) => {
                    let wait = self.backoff.record_failure(now_ms);
                    warn!("Cloud: {}, retry in {} ms", e, wait);
                }
            },
            None => {}
        }
        event
    }

    /// Publish the full state document. Skipped while the link is down.
    pub fn publish(&mut self, state: &ControlState, temperature: Option<f32>) -> bool {
        if !self.link_up {
            return false;
        }
        let result = encode_state(state, temperature)
            .and_then(|payload| self.transport.publish_state(&payload));
        match result {
            Ok(()) => {
                self.publishes = self.publishes.wrapping_add(1);
                true
            }
            Err(e) => {
                warn!("Cloud: publish failed: {}", e);
                false
            }
        }
    }

    /// Next well-formed remote write. Malformed payloads are logged and
    /// dropped.
    pub fn next_write(&mut self) -> Option<StateWrite> {
        while let Some(frame) = self.transport.try_receive() {
            match decode_remote(&frame) {
                Ok(write) => return Some(write),
                Err(e) => warn!("Cloud: dropping inbound payload ({} bytes): {}", frame.len(), e),
            }
        }
        None
    }
}
