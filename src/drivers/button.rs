//! Polled button debounce filter.
//!
//! ## Hardware
//!
//! Two active-low momentary switches with internal pull-ups. The main loop
//! samples both levels on every iteration and feeds them to
//! [`Debouncer::observe`].
//!
//! ## Filtering
//!
//! Per button the filter remembers the previous raw level and the time of
//! the last accepted press. A released → pressed edge becomes a
//! [`ButtonEvent`] only when at least `debounce_ms` has passed since the
//! last accepted press on that button; contact bounce inside the window is
//! swallowed. Releases never produce events.
//!
//! | State              | Raw level | Next state         | Output            |
//! |--------------------|-----------|--------------------|-------------------|
//! | `Idle`             | pressed   | `PressedDebouncing`| event if window ok|
//! | `PressedDebouncing`| released  | `Idle`             | —                 |

/// Logic level read from a GPIO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    High,
    Low,
}

impl Level {
    pub fn from_high(is_high: bool) -> Self {
        if is_high { Self::High } else { Self::Low }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    /// Mode toggle.
    Button1,
    /// Cooler toggle (Manual) / Auto-mode action.
    Button2,
}

impl ButtonId {
    pub const ALL: [ButtonId; 2] = [ButtonId::Button1, ButtonId::Button2];

    fn index(self) -> usize {
        match self {
            Self::Button1 => 0,
            Self::Button2 => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Pressed,
}

/// A clean press, produced by the filter and consumed by the control policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub id: ButtonId,
    pub edge: Edge,
}

impl ButtonEvent {
    pub fn pressed(id: ButtonId) -> Self {
        Self {
            id,
            edge: Edge::Pressed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Idle,
    PressedDebouncing,
}

#[derive(Debug, Clone, Copy)]
struct Channel {
    state: DebounceState,
    last_accepted_ms: Option<u32>,
}

impl Channel {
    const fn new() -> Self {
        Self {
            state: DebounceState::Idle,
            last_accepted_ms: None,
        }
    }
}

pub struct Debouncer {
    channels: [Channel; 2],
    debounce_ms: u32,
    pressed_level: Level,
}

impl Debouncer {
    /// Filter for active-low buttons (LOW = pressed).
    pub fn new(debounce_ms: u32) -> Self {
        Self::with_pressed_level(debounce_ms, Level::Low)
    }

    pub fn with_pressed_level(debounce_ms: u32, pressed_level: Level) -> Self {
        Self {
            channels: [Channel::new(); 2],
            debounce_ms,
            pressed_level,
        }
    }

    /// Feed one raw sample. `now_ms` is monotonic milliseconds since boot
    /// (wrapping arithmetic, so a u32 rollover after ~49 days is harmless).
    pub fn observe(&mut self, id: ButtonId, level: Level, now_ms: u32) -> Option<ButtonEvent> {
        let pressed = level == self.pressed_level;
        let debounce_ms = self.debounce_ms;
        let ch = &mut self.channels[id.index()];

        match (ch.state, pressed) {
            (DebounceState::Idle, true) => {
                ch.state = DebounceState::PressedDebouncing;
                let window_open = ch
                    .last_accepted_ms
                    .is_none_or(|t| now_ms.wrapping_sub(t) >= debounce_ms);
                if window_open {
                    ch.last_accepted_ms = Some(now_ms);
                    Some(ButtonEvent::pressed(id))
                } else {
                    None
                }
            }
            (DebounceState::PressedDebouncing, false) => {
                ch.state = DebounceState::Idle;
                None
            }
            _ => None,
        }
    }
}
