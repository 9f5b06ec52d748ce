//! # Worker Loop
//!
//! A worker drains actor work through the dispatcher until nothing is left,
//! then parks on the monitor until a producer wakes it.
//!
//! ## Core Algorithm
//! 1. Dispatch one unit of work, passing this worker's hang detector
//! 2. `DidWork`: loop straight away, message bursts are drained without locking
//! 3. `NoWork`: exit if the live-actor count is zero, otherwise park
//! 4. Exit as well when the monitor reports it was closed for shutdown
//!
//! A panic escaping the dispatcher is caught, logged and handled like `NoWork`.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error};

use roost_api::{Collaborators, Dispatch};

use crate::thread::monitor::{Monitor, Parked};

/// Per-run counters, returned when the worker exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub dispatched: u64,
    pub parks: u64,
    pub panics: u64,
}

/// Worker bound to one index of the monitor's detectors.
pub struct Worker<'m> {
    id: usize,
    monitor: &'m Monitor,
    collaborators: Collaborators,
    stats: WorkerStats,
}

impl<'m> Worker<'m> {
    pub fn new(id: usize, monitor: &'m Monitor, collaborators: Collaborators) -> Self {
        Self {
            id,
            monitor,
            collaborators,
            stats: WorkerStats::default(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Run until shutdown.
    pub fn run(mut self) -> WorkerStats {
        let monitor = self.monitor;
        let Some(detector) = monitor.detector(self.id) else {
            error!(worker = self.id, "no hang detector bound to worker, exiting");
            return self.stats;
        };
        debug!(worker = self.id, "worker started");

        loop {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                self.collaborators.dispatcher.dispatch_one(detector)
            }));

            match outcome {
                Ok(Dispatch::DidWork) => {
                    self.stats.dispatched += 1;
                    continue;
                }
                Ok(Dispatch::NoWork) => {}
                Err(payload) => {
                    let reason = if let Some(s) = payload.downcast_ref::<String>() {
                        s.clone()
                    } else if let Some(s) = payload.downcast_ref::<&str>() {
                        s.to_string()
                    } else {
                        "unknown panic".to_string()
                    };
                    error!(worker = self.id, reason = %reason, "dispatch panicked");
                    self.stats.panics += 1;
                }
            }

            if self.collaborators.is_shutdown() {
                break;
            }
            self.stats.parks += 1;
            if monitor.park() == Parked::Closed {
                break;
            }
        }

        debug!(
            worker = self.id,
            dispatched = self.stats.dispatched,
            parks = self.stats.parks,
            "worker exited"
        );
        self.stats
    }
}
