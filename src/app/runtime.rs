//! The cooperative control loop.
//!
//! [`Runtime`] is the one context object built in `main`: it owns the
//! service, every adapter and the scheduler, and is never torn down.
//! [`Runtime::step`] is a bounded, non-blocking iteration:
//!
//! 1. poll buttons (every iteration, the debouncer needs the edges)
//! 2. drain inbound cloud writes
//! 3. run whichever scheduled tasks are due
//!
//! Any state change is published immediately; the Publish task re-sends the
//! full document on a fixed cadence regardless.

use log::{info, warn};

use crate::cloud::{CloudSession, CloudTransport, LinkEvent};
use crate::config::SystemConfig;
use crate::control::ControlState;
use crate::error::Error;
use crate::scheduler::{Scheduler, TaskId};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort, StoragePort};
use super::service::ThermostatService;

pub struct Runtime<H, S, D, T, E> {
    service: ThermostatService,
    hw: H,
    store: S,
    display: D,
    session: CloudSession<T>,
    sink: E,
    scheduler: Scheduler,
}

impl<H, S, D, T, E> Runtime<H, S, D, T, E>
where
    H: SensorPort + ActuatorPort,
    S: StoragePort,
    D: DisplayPort,
    T: CloudTransport,
    E: EventSink,
{
    /// Wire everything together. `initial` is the state restored from
    /// storage (or the safe defaults).
    pub fn new(
        config: &SystemConfig,
        initial: ControlState,
        hw: H,
        store: S,
        display: D,
        transport: T,
        sink: E,
    ) -> Self {
        Self {
            service: ThermostatService::new(config, initial),
            hw,
            store,
            display,
            session: CloudSession::new(transport),
            sink,
            scheduler: Scheduler::from_config(config),
        }
    }

    /// Bring up the display and drive the relay to the restored state.
    ///
    /// A display that fails to initialise stops the controller here.
    pub fn start(&mut self) -> Result<(), Error> {
        self.display.init().map_err(|e| {
            warn!("Runtime: display init failed: {}", e);
            Error::Display(e)
        })?;
        self.hw.set_link_led(false);
        self.service.start(&mut self.hw, &mut self.sink);
        info!(
            "Runtime: started with {} scheduled tasks",
            self.scheduler.active_count()
        );
        Ok(())
    }

    /// One loop iteration at `now_ms`.
    pub fn step(&mut self, now_ms: u32) {
        let mut changed = self
            .service
            .poll_buttons(&mut self.hw, &mut self.store, &mut self.sink, now_ms)
            .is_some();

        while let Some(write) = self.session.next_write() {
            info!("Runtime: remote write {:?}", write);
            changed |= self
                .service
                .handle_command(
                    AppCommand::Remote(write),
                    &mut self.hw,
                    &mut self.store,
                    &mut self.sink,
                )
                .is_some();
        }

        for task in self.scheduler.due(now_ms) {
            match task {
                TaskId::Sensor => {
                    changed |= self
                        .service
                        .on_sample(&mut self.hw, &mut self.store, &mut self.sink)
                        .is_some();
                }
                TaskId::Display => self.render(),
                TaskId::Publish => {
                    let telemetry = self.service.build_telemetry(self.session.is_connected());
                    self.sink.emit(&AppEvent::Telemetry(telemetry));
                    self.publish();
                }
                TaskId::Cloud => match self.session.service(now_ms) {
                    Some(LinkEvent::Up) => {
                        self.hw.set_link_led(true);
                        // Refresh the retained document right away.
                        self.publish();
                    }
                    Some(LinkEvent::Down) => self.hw.set_link_led(false),
                    None => {}
                },
            }
        }

        if changed {
            self.publish();
            // Show the change without waiting for the next refresh.
            self.scheduler.trigger(TaskId::Display);
        }
    }

    /// Inject a command from outside the loop (e.g. a test harness).
    pub fn dispatch(&mut self, cmd: AppCommand) {
        if self
            .service
            .handle_command(cmd, &mut self.hw, &mut self.store, &mut self.sink)
            .is_some()
        {
            self.publish();
            self.scheduler.trigger(TaskId::Display);
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn service(&self) -> &ThermostatService {
        &self.service
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn session(&self) -> &CloudSession<T> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut CloudSession<T> {
        &mut self.session
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    // ── Internal ──────────────────────────────────────────────

    fn render(&mut self) {
        let view = self.service.status_view(self.session.is_connected());
        if let Err(e) = self.display.render(&view) {
            warn!("Runtime: display render failed: {}", e);
        }
    }

    fn publish(&mut self) {
        let state = self.service.state();
        self.session
            .publish(&state, self.service.last_temperature());
    }
}
