//! # Hang Detection
//!
//! Each worker owns one hang detector for its whole lifetime. The worker's
//! dispatch path records progress on it; the watchdog thread checks it every
//! sweep. That is a single-writer/single-reader pairing with no lock in between,
//! so implementations must keep their fields atomic.

use crate::types::ActorHandle;

/// Per-worker progress tracker.
pub trait HangDetector: Send + Sync {
    /// Record that the worker started delivering a message from `source` to
    /// `destination`. `trigger(NO_ACTOR, NO_ACTOR)` marks the worker idle again.
    fn trigger(&self, source: ActorHandle, destination: ActorHandle);

    /// Compare against the previous check and report a stall if the worker has
    /// been on the same message since then. Called only by the watchdog.
    /// Reporting is the detector's job; a stall never fails the caller.
    fn check(&self);
}

/// Creates one hang detector per worker. Detectors are deleted by dropping them.
pub trait DetectorFactory: Send + Sync {
    fn new_detector(&self) -> Box<dyn HangDetector>;
}
