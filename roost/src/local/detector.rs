//! # Message Monitor
//!
//! Version-counting hang detector. Every `trigger` bumps a version; every
//! watchdog `check` compares it with the version seen at the previous check.
//! If nothing moved while a message is still being delivered, the destination
//! actor is probably stuck in an endless loop.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use tracing::warn;

use roost_api::{ActorHandle, DetectorFactory, HangDetector, NO_ACTOR};

/// Called with the destination of a stalled message.
pub type StallHook = Arc<dyn Fn(ActorHandle) + Send + Sync>;

pub struct MessageMonitor {
    version: AtomicU32,
    check_version: AtomicU32,
    source: AtomicU32,
    destination: AtomicU32,
    stalls: Arc<AtomicU64>,
    on_stall: Option<StallHook>,
}

impl fmt::Debug for MessageMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageMonitor")
            .field("version", &self.version.load(Ordering::Relaxed))
            .field("destination", &self.destination.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MessageMonitor {
    fn default() -> Self {
        Self::new(Arc::new(AtomicU64::new(0)), None)
    }
}

impl MessageMonitor {
    fn new(stalls: Arc<AtomicU64>, on_stall: Option<StallHook>) -> Self {
        Self {
            version: AtomicU32::new(0),
            check_version: AtomicU32::new(0),
            source: AtomicU32::new(NO_ACTOR),
            destination: AtomicU32::new(NO_ACTOR),
            stalls,
            on_stall,
        }
    }

    /// Stalls reported by this detector (and its siblings, when created by the
    /// same factory).
    pub fn stalls(&self) -> u64 {
        self.stalls.load(Ordering::Relaxed)
    }
}

impl HangDetector for MessageMonitor {
    fn trigger(&self, source: ActorHandle, destination: ActorHandle) {
        self.source.store(source, Ordering::Relaxed);
        self.destination.store(destination, Ordering::Relaxed);
        self.version.fetch_add(1, Ordering::Release);
    }

    fn check(&self) {
        let version = self.version.load(Ordering::Acquire);
        if version != self.check_version.load(Ordering::Relaxed) {
            self.check_version.store(version, Ordering::Relaxed);
            return;
        }

        let destination = self.destination.load(Ordering::Relaxed);
        if destination == NO_ACTOR {
            return;
        }
        let source = self.source.load(Ordering::Relaxed);
        self.stalls.fetch_add(1, Ordering::Relaxed);
        warn!(
            "A message from [ :{:08x} ] to [ :{:08x} ] maybe in an endless loop (version = {})",
            source, destination, version
        );
        if let Some(hook) = &self.on_stall {
            hook(destination);
        }
    }
}

/// Creates [`MessageMonitor`]s that share one stall counter and hook.
#[derive(Default)]
pub struct MessageMonitorFactory {
    stalls: Arc<AtomicU64>,
    on_stall: Option<StallHook>,
}

impl MessageMonitorFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `hook` with the destination actor whenever a stall is detected.
    pub fn with_stall_hook(hook: StallHook) -> Self {
        Self {
            stalls: Arc::new(AtomicU64::new(0)),
            on_stall: Some(hook),
        }
    }

    /// Total stalls reported by every detector this factory created.
    pub fn stalls(&self) -> u64 {
        self.stalls.load(Ordering::Relaxed)
    }
}

impl DetectorFactory for MessageMonitorFactory {
    fn new_detector(&self) -> Box<dyn HangDetector> {
        Box::new(MessageMonitor::new(
            Arc::clone(&self.stalls),
            self.on_stall.clone(),
        ))
    }
}
