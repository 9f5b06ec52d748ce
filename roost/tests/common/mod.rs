// Mock collaborators shared by the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use roost::local::ActorCounter;
use roost::thread::{Orchestrator, RunReport, RuntimeConfig, RuntimeError};
use roost_api::{
    ActorHandle, Clock, Collaborators, DetectorFactory, Dispatch, Dispatcher, HangDetector,
    PollStatus, Poller,
};

pub fn current_thread_name() -> String {
    thread::current().name().unwrap_or("unnamed").to_string()
}

/// Fast timings so shutdown completes well inside test timeouts.
pub fn fast_config(workers: usize) -> RuntimeConfig {
    RuntimeConfig {
        thread: workers,
        watchdog_step_ms: 20,
        watchdog_steps: 5,
        ..RuntimeConfig::with_workers(workers)
    }
}

/// Poll `cond` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    cond()
}

// --- Dispatch ---

/// Runs injected jobs, otherwise reports `NoWork`. Records who dispatched.
#[derive(Default)]
pub struct MockDispatcher {
    pending: AtomicUsize,
    pub calls: AtomicUsize,
    pub did_work: AtomicUsize,
    pub threads: Mutex<HashSet<String>>,
    pub calls_by_thread: Mutex<HashMap<String, usize>>,
    pub workers_that_worked: Mutex<Vec<String>>,
}

impl MockDispatcher {
    pub fn inject(&self, jobs: usize) {
        self.pending.fetch_add(jobs, Ordering::SeqCst);
    }

    pub fn calls_snapshot(&self) -> HashMap<String, usize> {
        self.calls_by_thread.lock().unwrap().clone()
    }
}

impl Dispatcher for MockDispatcher {
    fn dispatch_one(&self, detector: &dyn HangDetector) -> Dispatch {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = current_thread_name();
        self.threads.lock().unwrap().insert(name.clone());
        *self
            .calls_by_thread
            .lock()
            .unwrap()
            .entry(name.clone())
            .or_default() += 1;

        let took = self
            .pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !took {
            return Dispatch::NoWork;
        }
        detector.trigger(1, 2);
        self.did_work.fetch_add(1, Ordering::SeqCst);
        self.workers_that_worked.lock().unwrap().push(name);
        detector.trigger(0, 0);
        Dispatch::DidWork
    }
}

// --- Hang detection ---

pub struct MockDetector {
    checks: Arc<AtomicUsize>,
    dropped: Arc<AtomicUsize>,
    checker_threads: Arc<Mutex<HashSet<String>>>,
}

impl HangDetector for MockDetector {
    fn trigger(&self, _source: ActorHandle, _destination: ActorHandle) {}

    fn check(&self) {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.checker_threads
            .lock()
            .unwrap()
            .insert(current_thread_name());
    }
}

impl Drop for MockDetector {
    fn drop(&mut self) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockDetectorFactory {
    pub created: AtomicUsize,
    pub checks: Arc<AtomicUsize>,
    pub dropped: Arc<AtomicUsize>,
    pub checker_threads: Arc<Mutex<HashSet<String>>>,
}

impl DetectorFactory for MockDetectorFactory {
    fn new_detector(&self) -> Box<dyn HangDetector> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Box::new(MockDetector {
            checks: Arc::clone(&self.checks),
            dropped: Arc::clone(&self.dropped),
            checker_threads: Arc::clone(&self.checker_threads),
        })
    }
}

// --- Polling ---

/// Poller fed through a channel of raw codes; idles on timeout.
pub struct MockPoller {
    codes_tx: Mutex<mpsc::Sender<i32>>,
    codes_rx: Mutex<mpsc::Receiver<i32>>,
    pub exit_signalled: AtomicBool,
    pub released: AtomicBool,
    pub polled_after_release: AtomicBool,
    pub polls: AtomicUsize,
    pub poll_threads: Mutex<HashSet<String>>,
    pub panic_on_poll: AtomicBool,
}

impl Default for MockPoller {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            codes_tx: Mutex::new(tx),
            codes_rx: Mutex::new(rx),
            exit_signalled: AtomicBool::new(false),
            released: AtomicBool::new(false),
            polled_after_release: AtomicBool::new(false),
            polls: AtomicUsize::new(0),
            poll_threads: Mutex::new(HashSet::new()),
            panic_on_poll: AtomicBool::new(false),
        }
    }
}

impl MockPoller {
    /// Queue a raw poll result (`0` terminated, `>0` event, `<0` idle).
    pub fn push_code(&self, code: i32) {
        self.codes_tx.lock().unwrap().send(code).unwrap();
    }
}

impl Poller for MockPoller {
    fn poll(&self) -> PollStatus {
        if self.panic_on_poll.load(Ordering::SeqCst) {
            panic!("poller failure");
        }
        self.polls.fetch_add(1, Ordering::SeqCst);
        if self.released.load(Ordering::SeqCst) {
            self.polled_after_release.store(true, Ordering::SeqCst);
        }
        self.poll_threads
            .lock()
            .unwrap()
            .insert(current_thread_name());
        if self.exit_signalled.load(Ordering::SeqCst) {
            return PollStatus::Terminated;
        }
        let code = self
            .codes_rx
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_millis(2))
            .unwrap_or(-1);
        PollStatus::from_code(code)
    }

    fn signal_exit(&self) {
        self.exit_signalled.store(true, Ordering::SeqCst);
    }

    fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

// --- Clock ---

#[derive(Default)]
pub struct MockClock {
    pub advances: AtomicUsize,
    pub threads: Mutex<HashSet<String>>,
    pub panic_on_advance: AtomicBool,
}

impl Clock for MockClock {
    fn advance(&self) {
        if self.panic_on_advance.load(Ordering::SeqCst) {
            panic!("clock failure");
        }
        self.advances.fetch_add(1, Ordering::SeqCst);
        self.threads.lock().unwrap().insert(current_thread_name());
    }
}

// --- Bundle ---

pub struct MockNode {
    pub dispatcher: Arc<MockDispatcher>,
    pub actors: Arc<ActorCounter>,
    pub detectors: Arc<MockDetectorFactory>,
    pub poller: Arc<MockPoller>,
    pub clock: Arc<MockClock>,
}

impl MockNode {
    pub fn new(live_actors: usize) -> Self {
        Self {
            dispatcher: Arc::new(MockDispatcher::default()),
            actors: Arc::new(ActorCounter::new(live_actors)),
            detectors: Arc::new(MockDetectorFactory::default()),
            poller: Arc::new(MockPoller::default()),
            clock: Arc::new(MockClock::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(
            self.dispatcher.clone(),
            self.actors.clone(),
            self.detectors.clone(),
            self.poller.clone(),
            self.clock.clone(),
        )
    }

    /// Run an orchestrator on a background thread; the receiver yields its result.
    pub fn start(&self, config: RuntimeConfig) -> mpsc::Receiver<Result<RunReport, RuntimeError>> {
        let (tx, rx) = mpsc::channel();
        let orchestrator = Orchestrator::new(config, self.collaborators());
        thread::spawn(move || {
            let _ = tx.send(orchestrator.run());
        });
        rx
    }
}
