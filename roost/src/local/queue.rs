use std::fmt;

use crossbeam_queue::SegQueue;

use roost_api::{ActorHandle, Dispatch, Dispatcher, HangDetector, NO_ACTOR};

/// One message delivery: run `task` on behalf of `destination`.
pub struct Job {
    pub source: ActorHandle,
    pub destination: ActorHandle,
    task: Box<dyn FnOnce() + Send>,
}

impl Job {
    pub fn new<F>(source: ActorHandle, destination: ActorHandle, task: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            source,
            destination,
            task: Box::new(task),
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .finish()
    }
}

/// Marks the detector idle again even if the task unwinds.
struct ClearOnDrop<'a>(&'a dyn HangDetector);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.trigger(NO_ACTOR, NO_ACTOR);
    }
}

/// Lock-free global queue of ready jobs.
///
/// Its [`Dispatcher`] impl runs at most one job per call and brackets it with
/// hang-detector triggers, so the watchdog can see a job that never returns.
#[derive(Default)]
pub struct RunQueue {
    jobs: SegQueue<Job>,
}

impl fmt::Debug for RunQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunQueue").field("len", &self.jobs.len()).finish()
    }
}

impl RunQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, job: Job) {
        self.jobs.push(job);
    }

    /// Shorthand for pushing a [`Job`] built from its parts.
    pub fn send<F>(&self, source: ActorHandle, destination: ActorHandle, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.push(Job::new(source, destination, task));
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl Dispatcher for RunQueue {
    fn dispatch_one(&self, detector: &dyn HangDetector) -> Dispatch {
        let Some(job) = self.jobs.pop() else {
            return Dispatch::NoWork;
        };
        detector.trigger(job.source, job.destination);
        let _idle = ClearOnDrop(detector);
        (job.task)();
        Dispatch::DidWork
    }
}
