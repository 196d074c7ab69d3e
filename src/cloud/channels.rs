//! Hand-off between the MQTT client task and the control loop.
//!
//! The ESP-IDF MQTT client delivers events on its own task. The callback
//! copies set-topic payloads into a bounded `embassy-sync` channel and
//! flips the link flag; the control loop drains the channel with
//! `try_receive` and never blocks.
//!
//! ```text
//! ┌──────────────┐  InboundFrame  ┌──────────────┐
//! │  MQTT task   │───────────────▶│ Control Loop │
//! │  (callback)  │   LINK_UP      │   (sync)     │
//! └──────────────┘───────────────▶└──────────────┘
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use super::properties::MAX_PAYLOAD;

/// Raw payload of one set-topic message.
pub type InboundFrame = heapless::Vec<u8, MAX_PAYLOAD>;

/// Channel depth for inbound frames.
const INBOUND_DEPTH: usize = 4;

/// Inbound frame channel: MQTT task → control loop.
pub static INBOUND_CHANNEL: Channel<CriticalSectionRawMutex, InboundFrame, INBOUND_DEPTH> =
    Channel::new();

/// Set by the MQTT callback on connect, cleared on disconnect.
pub static LINK_UP: AtomicBool = AtomicBool::new(false);

/// Queue a payload. Oversized payloads and a full queue drop the frame;
/// returns whether it was queued.
pub fn push_inbound(payload: &[u8]) -> bool {
    let Ok(frame) = InboundFrame::from_slice(payload) else {
        return false;
    };
    INBOUND_CHANNEL.try_send(frame).is_ok()
}

pub fn try_receive_inbound() -> Option<InboundFrame> {
    INBOUND_CHANNEL.try_receive().ok()
}

pub fn set_link_up(up: bool) {
    LINK_UP.store(up, Ordering::Release);
}

pub fn link_up() -> bool {
    LINK_UP.load(Ordering::Acquire)
}
