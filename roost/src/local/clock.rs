use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use roost_api::Clock;

/// Called once for every centisecond the clock moves past.
pub type TickHook = Box<dyn Fn(u64) + Send + Sync>;

/// Monotonic centisecond clock.
///
/// `advance` catches up with wall time and fires the hook once per elapsed
/// centisecond, so time-driven work never skips a slot even if the timer
/// thread was delayed. Advanced from the timer thread only.
pub struct TickClock {
    origin: Instant,
    current: AtomicU64,
    on_tick: Option<TickHook>,
}

impl fmt::Debug for TickClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickClock").field("now", &self.now()).finish()
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            current: AtomicU64::new(0),
            on_tick: None,
        }
    }

    pub fn with_hook(hook: TickHook) -> Self {
        Self {
            on_tick: Some(hook),
            ..Self::new()
        }
    }

    /// Centiseconds since the clock was created, as of the last `advance`.
    pub fn now(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }
}

impl Clock for TickClock {
    fn advance(&self) {
        let target = (self.origin.elapsed().as_millis() / 10) as u64;
        let previous = self.current.load(Ordering::Acquire);
        if target <= previous {
            return;
        }
        self.current.store(target, Ordering::Release);
        if let Some(hook) = &self.on_tick {
            for tick in previous + 1..=target {
                hook(tick);
            }
        }
    }
}
