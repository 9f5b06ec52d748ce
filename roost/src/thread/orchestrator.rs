//! # Thread Orchestrator
//!
//! Owns the lifecycle of the core: creates the monitor, spawns one watchdog,
//! one timer, one socket thread and the configured number of workers, joins
//! them all, then tears the monitor down and releases the poller.
//!
//! All threads are scoped, so they borrow the monitor directly and cannot
//! outlive it. The poller is released only after the socket thread, its sole
//! user, has been joined.

use std::thread::{self, Scope, ScopedJoinHandle};

use tracing::{error, info};

use roost_api::{Collaborators, LiveActors};

use crate::thread::config::RuntimeConfig;
use crate::thread::error::{fatal, RuntimeError};
use crate::thread::monitor::Monitor;
use crate::thread::socket::{SocketExit, SocketLoop};
use crate::thread::timer::TimerLoop;
use crate::thread::watchdog::Watchdog;
use crate::thread::worker::{Worker, WorkerStats};

pub const WATCHDOG_THREAD_NAME: &str = "roost-watchdog";
pub const TIMER_THREAD_NAME: &str = "roost-timer";
pub const SOCKET_THREAD_NAME: &str = "roost-socket";
pub const WORKER_THREAD_PREFIX: &str = "roost-worker-";

/// What every thread reported when it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Per-worker counters, indexed by worker id.
    pub workers: Vec<WorkerStats>,
    pub timer_ticks: u64,
    pub watchdog_sweeps: u64,
    pub socket_exit: SocketExit,
}

impl RunReport {
    /// Total number of units of work dispatched across all workers.
    pub fn dispatched(&self) -> u64 {
        self.workers.iter().map(|w| w.dispatched).sum()
    }
}

#[derive(Debug)]
pub struct Orchestrator {
    config: RuntimeConfig,
    collaborators: Collaborators,
}

impl Orchestrator {
    pub fn new(config: RuntimeConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run every thread of the core until the live-actor count reaches zero.
    ///
    /// Blocks the caller until all threads have joined. Returns
    /// [`RuntimeError::ThreadPanicked`] if any thread died by panic; the
    /// remaining threads are still joined and the poller still released.
    pub fn run(&self) -> Result<RunReport, RuntimeError> {
        self.config.validate()?;
        let worker_count = self.config.thread;
        let monitor = Monitor::new(worker_count, self.collaborators.detectors.as_ref());
        info!(workers = worker_count, "starting worker threads");

        let (report, panicked) = self.run_threads(&monitor);

        // Detectors go with the monitor, after every thread has joined.
        drop(monitor);
        self.collaborators.poller.release();

        if let Some(name) = panicked.into_iter().next() {
            return Err(RuntimeError::ThreadPanicked(name));
        }
        info!(dispatched = report.dispatched(), "all threads joined");
        Ok(report)
    }

    fn run_threads(&self, monitor: &Monitor) -> (RunReport, Vec<String>) {
        let actors: &dyn LiveActors = self.collaborators.actors.as_ref();
        let config = &self.config;

        thread::scope(|scope| {
            let watchdog = spawn(scope, WATCHDOG_THREAD_NAME.to_string(), move || {
                Watchdog::new(monitor, actors, config.watchdog_step(), config.watchdog_steps).run()
            });

            let timer_collaborators = self.collaborators.clone();
            let timer = spawn(scope, TIMER_THREAD_NAME.to_string(), move || {
                TimerLoop::new(
                    monitor,
                    timer_collaborators,
                    config.timer_tick(),
                    config.timer_reserve(),
                )
                .run()
            });

            let socket_collaborators = self.collaborators.clone();
            let socket = spawn(scope, SOCKET_THREAD_NAME.to_string(), move || {
                SocketLoop::new(monitor, socket_collaborators).run()
            });

            let workers: Vec<_> = (0..config.thread)
                .map(|id| {
                    let collaborators = self.collaborators.clone();
                    spawn(scope, format!("{}{}", WORKER_THREAD_PREFIX, id), move || {
                        Worker::new(id, monitor, collaborators).run()
                    })
                })
                .collect();

            let mut panicked = Vec::new();
            let watchdog_sweeps = join(watchdog, &mut panicked).unwrap_or_default();
            let timer_ticks = join(timer, &mut panicked).unwrap_or_default();
            let socket_exit = join(socket, &mut panicked).unwrap_or(SocketExit::Shutdown);
            let workers = workers
                .into_iter()
                .map(|handle| join(handle, &mut panicked).unwrap_or_default())
                .collect();

            let report = RunReport {
                workers,
                timer_ticks,
                watchdog_sweeps,
                socket_exit,
            };
            (report, panicked)
        })
    }
}

fn spawn<'scope, 'env, T, F>(
    scope: &'scope Scope<'scope, 'env>,
    name: String,
    f: F,
) -> ScopedJoinHandle<'scope, T>
where
    F: FnOnce() -> T + Send + 'scope,
    T: Send + 'scope,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn_scoped(scope, f)
        .unwrap_or_else(|e| fatal(&format!("create thread {}", name), e))
}

fn join<T>(handle: ScopedJoinHandle<'_, T>, panicked: &mut Vec<String>) -> Option<T> {
    let name = handle.thread().name().unwrap_or("unnamed").to_string();
    match handle.join() {
        Ok(value) => Some(value),
        Err(_) => {
            error!(thread = %name, "thread terminated by panic");
            panicked.push(name);
            None
        }
    }
}
