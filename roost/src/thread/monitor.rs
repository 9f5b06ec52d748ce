//! # Monitor State
//!
//! The one piece of mutable state shared by every thread of the core: the
//! per-worker hang detectors, the worker count, and the park/unpark protocol.
//!
//! ## Wakeup Protocol
//! - Workers park through [`Monitor::park`]. The `sleeping` counter is raised
//!   before waiting and lowered after waking, both under the lock, so any reader
//!   holding the lock sees exactly how many workers are parked.
//! - Producers (timer, socket) call [`Monitor::wake_if_needed`]. It signals one
//!   waiter when enough workers could plausibly be parked. Which worker wakes
//!   does not matter; a worker that wakes with nothing to do re-parks.
//! - The timer releases everyone on shutdown with [`Monitor::unpark_all`]. It
//!   latches `closed` under the lock first, so a worker that is just about to
//!   park sees the latch instead of waiting for a broadcast that already passed.

use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard};

use tracing::warn;

use roost_api::{DetectorFactory, HangDetector};

use crate::thread::error::fatal;

/// How a call to [`Monitor::park`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parked {
    /// Released by a wakeup (or spuriously). Dispatch again.
    Woken,
    /// The monitor has been closed for shutdown. Exit.
    Closed,
}

#[derive(Debug, Default)]
struct ParkState {
    sleeping: usize,
    closed: bool,
}

pub struct Monitor {
    worker_count: usize,
    detectors: Vec<Box<dyn HangDetector>>,
    state: Mutex<ParkState>,
    cond: Condvar,
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("worker_count", &self.worker_count)
            .field("sleeping", &self.sleeping())
            .finish()
    }
}

impl Monitor {
    /// Create the monitor for `worker_count` workers, with one detector each.
    ///
    /// `worker_count` is expected to be validated (at least 1) by the caller.
    pub fn new(worker_count: usize, factory: &dyn DetectorFactory) -> Self {
        let detectors = (0..worker_count).map(|_| factory.new_detector()).collect();
        Self {
            worker_count,
            detectors,
            state: Mutex::new(ParkState::default()),
            cond: Condvar::new(),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Hang detector bound to worker `id`.
    pub fn detector(&self, id: usize) -> Option<&dyn HangDetector> {
        self.detectors.get(id).map(|d| d.as_ref())
    }

    /// All detectors, in worker order.
    pub fn detectors(&self) -> impl Iterator<Item = &dyn HangDetector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    /// Number of currently parked workers, read under the lock.
    pub fn sleeping(&self) -> usize {
        self.lock().sleeping
    }

    /// Whether [`Monitor::unpark_all`] has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Release one parked worker if at least `worker_count - busy_exempt`
    /// workers are parked.
    ///
    /// `busy_exempt` is how many workers the caller assumes are already busy.
    /// A wakeup missed here is recovered by the next timer tick.
    pub fn wake_if_needed(&self, busy_exempt: usize) {
        let threshold = self.worker_count.saturating_sub(busy_exempt);
        let sleeping = self.lock().sleeping;
        if sleeping >= threshold {
            self.cond.notify_one();
        }
    }

    /// Park the calling worker until woken.
    ///
    /// Spurious wakeups are possible and harmless; the caller dispatches again.
    /// At most `worker_count` callers can be parked at once; any further caller
    /// is refused with [`Parked::Woken`] and never counted in `sleeping`.
    pub fn park(&self) -> Parked {
        let mut state = self.lock();
        if state.closed {
            return Parked::Closed;
        }
        if state.sleeping >= self.worker_count {
            warn!(
                workers = self.worker_count,
                "park refused, every worker slot is already parked"
            );
            return Parked::Woken;
        }
        state.sleeping += 1;
        let mut state = self
            .cond
            .wait(state)
            .unwrap_or_else(|e| fatal("wait on worker condition", e));
        state.sleeping -= 1;
        if state.closed {
            Parked::Closed
        } else {
            Parked::Woken
        }
    }

    /// Close the monitor and release every parked worker.
    pub fn unpark_all(&self) {
        let mut state = self.lock();
        state.closed = true;
        drop(state);
        self.cond.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, ParkState> {
        self.state
            .lock()
            .unwrap_or_else(|e| fatal("lock worker monitor", e))
    }
}
