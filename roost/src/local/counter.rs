use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lazy_static::lazy_static;

use roost_api::LiveActors;

lazy_static! {
    static ref GLOBAL_COUNTER: Arc<ActorCounter> = Arc::new(ActorCounter::new(0));
}

/// Atomic count of live actors.
///
/// The registry bumps it when an actor is created and drops it when one is
/// retired. Once it reaches zero every loop of the core winds down.
#[derive(Debug, Default)]
pub struct ActorCounter {
    live: AtomicUsize,
}

impl ActorCounter {
    pub fn new(live: usize) -> Self {
        Self {
            live: AtomicUsize::new(live),
        }
    }

    /// The process-wide counter.
    pub fn global() -> Arc<ActorCounter> {
        Arc::clone(&GLOBAL_COUNTER)
    }

    /// Record a new actor. Returns the new count.
    pub fn spawned(&self) -> usize {
        self.live.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Record a retired actor. Never goes below zero. Returns the new count.
    pub fn retired(&self) -> usize {
        let previous = self
            .live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_sub(1)))
            .unwrap_or(0);
        previous.saturating_sub(1)
    }

    pub fn set(&self, live: usize) {
        self.live.store(live, Ordering::Release);
    }
}

impl LiveActors for ActorCounter {
    fn remaining(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }
}
