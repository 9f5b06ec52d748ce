//! # Message Dispatch
//!
//! A worker thread repeatedly asks the dispatcher to process one unit of actor
//! work. The dispatcher owns the message queues; the core only needs to know
//! whether anything happened so it can decide to park.

use crate::supervision::HangDetector;

/// Outcome of a single dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A unit of work was processed. The worker should try again immediately.
    DidWork,
    /// Nothing was ready. The worker may park.
    NoWork,
}

impl Dispatch {
    /// Returns `true` for [`Dispatch::DidWork`].
    pub fn did_work(self) -> bool {
        matches!(self, Dispatch::DidWork)
    }
}

/// Processes actor messages on behalf of worker threads.
///
/// # Contract
/// - `dispatch_one` must be safe to call when no work exists. Workers that wake
///   spuriously call it and re-park on [`Dispatch::NoWork`].
/// - `dispatch_one` must be safe to call at any time relative to the other
///   subsystems, including during shutdown.
/// - The dispatcher should record progress on `detector` around every message it
///   delivers, so the watchdog can tell a busy worker from a stuck one.
pub trait Dispatcher: Send + Sync {
    fn dispatch_one(&self, detector: &dyn HangDetector) -> Dispatch;
}

impl<F> Dispatcher for F
where
    F: Fn(&dyn HangDetector) -> Dispatch + Send + Sync,
{
    fn dispatch_one(&self, detector: &dyn HangDetector) -> Dispatch {
        self(detector)
    }
}
