//! # In-Process Collaborators
//!
//! Self-contained implementations of every contract the worker-thread core
//! consumes: an atomic live-actor count, the version-counting hang detector,
//! a lock-free run queue, a channel-backed poller and a centisecond clock.
//! [`LocalNode`] wires them together.

pub mod clock;
pub mod counter;
pub mod detector;
pub mod poller;
pub mod queue;

use std::sync::Arc;
use std::time::Duration;

use roost_api::Collaborators;

pub use clock::TickClock;
pub use counter::ActorCounter;
pub use detector::{MessageMonitor, MessageMonitorFactory};
pub use poller::ChannelPoller;
pub use queue::{Job, RunQueue};

pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(10);

/// A complete set of in-process collaborators.
#[derive(Clone)]
pub struct LocalNode {
    pub actors: Arc<ActorCounter>,
    pub queue: Arc<RunQueue>,
    pub poller: Arc<ChannelPoller>,
    pub clock: Arc<TickClock>,
    pub detectors: Arc<MessageMonitorFactory>,
}

impl LocalNode {
    /// Node with `live_actors` registered actors.
    pub fn new(live_actors: usize) -> Self {
        Self::with_poll_timeout(live_actors, DEFAULT_POLL_TIMEOUT)
    }

    pub fn with_poll_timeout(live_actors: usize, poll_timeout: Duration) -> Self {
        let queue = Arc::new(RunQueue::new());
        Self {
            actors: Arc::new(ActorCounter::new(live_actors)),
            poller: Arc::new(ChannelPoller::new(Arc::clone(&queue), poll_timeout)),
            queue,
            clock: Arc::new(TickClock::new()),
            detectors: Arc::new(MessageMonitorFactory::new()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(
            self.queue.clone(),
            self.actors.clone(),
            self.detectors.clone(),
            self.poller.clone(),
            self.clock.clone(),
        )
    }
}
