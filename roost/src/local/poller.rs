//! # Channel Poller
//!
//! In-process stand-in for the network poll subsystem. Events are sent through
//! a `flume` channel; each poll waits up to a timeout for one, forwards it to
//! the run queue and reports [`PollStatus::Event`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use flume::{Receiver, RecvTimeoutError, Sender};
use tracing::debug;

use roost_api::{ActorHandle, PollStatus, Poller};

use crate::local::queue::{Job, RunQueue};

enum Inbound {
    Event(Job),
    Exit,
}

pub struct ChannelPoller {
    tx: Sender<Inbound>,
    rx: Receiver<Inbound>,
    queue: Arc<RunQueue>,
    timeout: Duration,
    exiting: AtomicBool,
    released: AtomicBool,
}

impl ChannelPoller {
    /// Poller delivering into `queue`, blocking at most `timeout` per poll.
    pub fn new(queue: Arc<RunQueue>, timeout: Duration) -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            tx,
            rx,
            queue,
            timeout,
            exiting: AtomicBool::new(false),
            released: AtomicBool::new(false),
        }
    }

    /// Inject a network event for `destination`. Returns `false` once the
    /// poller is exiting.
    pub fn deliver<F>(&self, source: ActorHandle, destination: ActorHandle, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.exiting.load(Ordering::Acquire) {
            return false;
        }
        self.tx
            .send(Inbound::Event(Job::new(source, destination, task)))
            .is_ok()
    }

    /// Events sent but not yet polled.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

impl Poller for ChannelPoller {
    fn poll(&self) -> PollStatus {
        if self.exiting.load(Ordering::Acquire) {
            return PollStatus::Terminated;
        }
        match self.rx.recv_timeout(self.timeout) {
            Ok(Inbound::Event(job)) => {
                self.queue.push(job);
                PollStatus::Event
            }
            Ok(Inbound::Exit) | Err(RecvTimeoutError::Disconnected) => PollStatus::Terminated,
            Err(RecvTimeoutError::Timeout) => PollStatus::Idle,
        }
    }

    fn signal_exit(&self) {
        if !self.exiting.swap(true, Ordering::AcqRel) {
            let _ = self.tx.send(Inbound::Exit);
        }
    }

    fn release(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        let dropped = self
            .rx
            .try_iter()
            .filter(|inbound| matches!(inbound, Inbound::Event(_)))
            .count();
        debug!(dropped = dropped, "poller released");
    }
}
