//! # Socket Loop
//!
//! Polls the network subsystem without sleeping; the poller blocks internally.
//! Every delivered event may have made an actor runnable, so it wakes a worker.

use tracing::debug;

use roost_api::{Collaborators, PollStatus};

use crate::thread::monitor::Monitor;

/// Why the socket loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketExit {
    /// The poller reported that it terminated.
    PollerTerminated,
    /// The live-actor count reached zero while the poller was idle.
    Shutdown,
}

pub struct SocketLoop<'m> {
    monitor: &'m Monitor,
    collaborators: Collaborators,
}

impl<'m> SocketLoop<'m> {
    pub fn new(monitor: &'m Monitor, collaborators: Collaborators) -> Self {
        Self {
            monitor,
            collaborators,
        }
    }

    pub fn run(self) -> SocketExit {
        debug!("socket loop started");
        let mut events = 0u64;
        let exit = loop {
            match self.collaborators.poller.poll() {
                PollStatus::Terminated => break SocketExit::PollerTerminated,
                PollStatus::Idle => {
                    if self.collaborators.is_shutdown() {
                        break SocketExit::Shutdown;
                    }
                }
                PollStatus::Event => {
                    events += 1;
                    self.monitor.wake_if_needed(0);
                }
            }
        };
        debug!(events = events, exit = ?exit, "socket loop exited");
        exit
    }
}
