//! # Timer Loop
//!
//! Advances the global clock at a fixed period and tops up the worker pool,
//! since time-driven work may have become ready. When it observes shutdown it
//! tells the poller to exit and then releases every parked worker. The
//! broadcast comes last: after it no further wakeups will ever happen.
//!
//! The release runs from a drop guard, so a timer that dies by panic still
//! lets the poller and the parked workers go.

use std::thread;
use std::time::Duration;

use tracing::{debug, error, info};

use roost_api::{Collaborators, Poller};

use crate::thread::monitor::Monitor;

pub struct TimerLoop<'m> {
    monitor: &'m Monitor,
    collaborators: Collaborators,
    tick: Duration,
    busy_reserve: usize,
}

impl<'m> TimerLoop<'m> {
    /// `busy_reserve` is the number of workers assumed busy on every tick.
    pub fn new(
        monitor: &'m Monitor,
        collaborators: Collaborators,
        tick: Duration,
        busy_reserve: usize,
    ) -> Self {
        Self {
            monitor,
            collaborators,
            tick,
            busy_reserve,
        }
    }

    /// Run until shutdown. Returns the number of ticks performed.
    pub fn run(self) -> u64 {
        debug!(tick_us = self.tick.as_micros() as u64, reserve = self.busy_reserve, "timer started");
        let _release = ReleaseOnExit {
            monitor: self.monitor,
            poller: self.collaborators.poller.as_ref(),
        };
        let mut ticks = 0u64;
        loop {
            self.collaborators.clock.advance();
            if self.collaborators.is_shutdown() {
                break;
            }
            self.monitor.wake_if_needed(self.busy_reserve);
            ticks += 1;
            thread::sleep(self.tick);
        }

        info!(ticks = ticks, "no live actors left, releasing poller and workers");
        ticks
    }
}

/// Signals the poller to exit, then closes the monitor.
struct ReleaseOnExit<'a> {
    monitor: &'a Monitor,
    poller: &'a dyn Poller,
}

impl Drop for ReleaseOnExit<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("timer panicked, releasing poller and workers");
        }
        self.poller.signal_exit();
        self.monitor.unpark_all();
    }
}
