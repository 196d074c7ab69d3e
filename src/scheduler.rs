//! Cooperative task scheduler.
//!
//! Each periodic job of the main loop has a cadence in milliseconds. The
//! loop asks [`Scheduler::due`] which jobs to run at `now_ms`; every job
//! runs on its first query and then once per cadence.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Runtime::step                         │
//! │                                                              │
//! │  every iteration:  buttons · inbound cloud frames            │
//! │                                                              │
//! │  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌──────────┐   │
//! │  │ Sensor    │  │ Display   │  │ Publish   │  │ Cloud    │   │
//! │  │ 1000 ms   │  │ 500 ms    │  │ 30 s      │  │ 250 ms   │   │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬─────┘  └─────┬────┘   │
//! │        └──────────────┴──────┬───────┴──────────────┘        │
//! │                              ▼                               │
//! │                    Scheduler::due(now_ms)                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Time is a wrapping `u32` millisecond counter, so rollover after ~49
//! days does not stall any task.

use log::info;

use crate::config::SystemConfig;

/// Periodic jobs of the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    /// Sample the thermistor and run the control policy.
    Sensor,
    /// Redraw the status display.
    Display,
    /// Unconditional state publish.
    Publish,
    /// Connection upkeep for the cloud session.
    Cloud,
}

/// Maximum number of scheduled tasks (stack-allocated).
pub const MAX_TASKS: usize = 4;

/// Cloud link upkeep cadence.
const CLOUD_SERVICE_MS: u32 = 250;

#[derive(Debug, Clone, Copy)]
struct Slot {
    task: TaskId,
    every_ms: u32,
    last_run_ms: Option<u32>,
}

pub struct Scheduler {
    slots: heapless::Vec<Slot, MAX_TASKS>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            slots: heapless::Vec::new(),
        }
    }

    /// The standard task set with cadences from `config`.
    pub fn from_config(config: &SystemConfig) -> Self {
        let mut sched = Self::new();
        sched.add(TaskId::Sensor, config.sensor_read_interval_ms);
        sched.add(TaskId::Display, config.display_refresh_ms);
        sched.add(
            TaskId::Publish,
            config.cloud.publish_interval_secs.saturating_mul(1000),
        );
        sched.add(TaskId::Cloud, CLOUD_SERVICE_MS);
        sched
    }

    /// Register a task. Re-adding a task replaces its cadence. Returns
    /// `false` when all slots are taken.
    pub fn add(&mut self, task: TaskId, every_ms: u32) -> bool {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.task == task) {
            slot.every_ms = every_ms;
            return true;
        }
        let added = self
            .slots
            .push(Slot {
                task,
                every_ms,
                last_run_ms: None,
            })
            .is_ok();
        if added {
            info!("Scheduler: {:?} every {} ms", task, every_ms);
        }
        added
    }

    /// Force `task` to run on the next query.
    pub fn trigger(&mut self, task: TaskId) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.task == task) {
            slot.last_run_ms = None;
        }
    }

    /// Tasks due at `now_ms`, in registration order. Marks them as run.
    pub fn due(&mut self, now_ms: u32) -> heapless::Vec<TaskId, MAX_TASKS> {
        let mut out = heapless::Vec::new();
        for slot in &mut self.slots {
            let is_due = slot
                .last_run_ms
                .is_none_or(|t| now_ms.wrapping_sub(t) >= slot.every_ms);
            if is_due {
                slot.last_run_ms = Some(now_ms);
                // Capacity equals the slot count.
                let _ = out.push(slot.task);
            }
        }
        out
    }

    /// Number of registered tasks.
    pub fn active_count(&self) -> usize {
        self.slots.len()
    }
}
