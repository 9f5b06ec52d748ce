use std::fmt;
use std::sync::Arc;

use crate::actors::LiveActors;
use crate::clock::Clock;
use crate::dispatch::Dispatcher;
use crate::poll::Poller;
use crate::supervision::DetectorFactory;

/// Shared handles to every subsystem the worker-thread core drives.
///
/// Cloning is cheap; each spawned thread keeps the `Arc`s it needs.
#[derive(Clone)]
pub struct Collaborators {
    pub dispatcher: Arc<dyn Dispatcher>,
    pub actors: Arc<dyn LiveActors>,
    pub detectors: Arc<dyn DetectorFactory>,
    pub poller: Arc<dyn Poller>,
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    pub fn new(
        dispatcher: Arc<dyn Dispatcher>,
        actors: Arc<dyn LiveActors>,
        detectors: Arc<dyn DetectorFactory>,
        poller: Arc<dyn Poller>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            dispatcher,
            actors,
            detectors,
            poller,
            clock,
        }
    }

    /// Shorthand for `self.actors.is_shutdown()`.
    pub fn is_shutdown(&self) -> bool {
        self.actors.is_shutdown()
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("remaining_actors", &self.actors.remaining())
            .finish_non_exhaustive()
    }
}
