//! Exponential reconnect backoff: 2 s → 4 s → 8 s … capped at 60 s.

pub const MIN_BACKOFF_MS: u32 = 2_000;
pub const MAX_BACKOFF_MS: u32 = 60_000;

#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    next_delay_ms: u32,
    /// (failure time, delay before the next attempt)
    retry_after: Option<(u32, u32)>,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

impl Backoff {
    pub const fn new() -> Self {
        Self {
            next_delay_ms: MIN_BACKOFF_MS,
            retry_after: None,
        }
    }

    /// Whether an attempt may be made at `now_ms`.
    pub fn ready(&self, now_ms: u32) -> bool {
        self.retry_after
            .is_none_or(|(since, delay)| now_ms.wrapping_sub(since) >= delay)
    }

    /// Record a failed attempt. Returns the wait before the next one.
    pub fn record_failure(&mut self, now_ms: u32) -> u32 {
        let delay = self.next_delay_ms;
        self.retry_after = Some((now_ms, delay));
        self.next_delay_ms = delay.saturating_mul(2).min(MAX_BACKOFF_MS);
        delay
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
