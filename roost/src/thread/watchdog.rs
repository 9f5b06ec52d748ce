//! # Watchdog Loop
//!
//! Sweeps every worker's hang detector once per period. The period is split
//! into short steps with a shutdown check before each, so the watchdog leaves
//! within one step of shutdown instead of a whole period.

use std::thread;
use std::time::Duration;

use tracing::debug;

use roost_api::LiveActors;

use crate::thread::monitor::Monitor;

pub struct Watchdog<'m> {
    monitor: &'m Monitor,
    actors: &'m dyn LiveActors,
    step: Duration,
    steps: u32,
}

impl<'m> Watchdog<'m> {
    pub fn new(monitor: &'m Monitor, actors: &'m dyn LiveActors, step: Duration, steps: u32) -> Self {
        Self {
            monitor,
            actors,
            step,
            steps,
        }
    }

    /// Run until shutdown. Returns the number of completed sweeps.
    pub fn run(self) -> u64 {
        debug!(step_ms = self.step.as_millis() as u64, steps = self.steps, "watchdog started");
        let mut sweeps = 0u64;
        'supervise: loop {
            if self.actors.is_shutdown() {
                break;
            }
            for detector in self.monitor.detectors() {
                detector.check();
            }
            sweeps += 1;
            for _ in 0..self.steps {
                if self.actors.is_shutdown() {
                    break 'supervise;
                }
                thread::sleep(self.step);
            }
        }
        debug!(sweeps = sweeps, "watchdog exited");
        sweeps
    }
}
