use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use roost_api::PlatformSettings;

use crate::thread::error::RuntimeError;

pub const DEFAULT_TIMER_TICK_US: u64 = 2500;
pub const DEFAULT_WATCHDOG_STEP_MS: u64 = 1000;
pub const DEFAULT_WATCHDOG_STEPS: u32 = 5;

// --- Runtime Configuration ---

/// Configuration for a runtime node.
///
/// Every field has a default, so a config file only needs to name what it
/// changes. Durations are stored as plain integers to keep the file format flat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Number of worker threads.
    pub thread: usize,

    /// Timer period in microseconds.
    pub timer_tick_us: u64,

    /// Workers the timer assumes are busy on every tick. The timer only wakes a
    /// worker when at least `thread - timer_busy_reserve` are parked.
    /// `None` means `thread - 1`.
    pub timer_busy_reserve: Option<usize>,

    /// Length of one watchdog sleep increment in milliseconds.
    pub watchdog_step_ms: u64,

    /// Sleep increments between two watchdog sweeps.
    pub watchdog_steps: u32,

    /// Cluster node id.
    pub harbor: u8,

    /// Module search path.
    pub module_path: String,

    /// Logger target. `None` logs to stderr.
    pub logger: Option<String>,

    /// Address of the cluster master.
    pub master: Option<String>,

    /// Local harbor listen address.
    pub local: Option<String>,

    /// Master listen address. When set, this node also runs the master actor.
    pub standalone: Option<String>,

    /// Name of the initial script.
    pub start: String,

    /// Module that runs the launcher and the initial script.
    pub script_module: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            thread: num_cpus::get(),
            timer_tick_us: DEFAULT_TIMER_TICK_US,
            timer_busy_reserve: None,
            watchdog_step_ms: DEFAULT_WATCHDOG_STEP_MS,
            watchdog_steps: DEFAULT_WATCHDOG_STEPS,
            harbor: 1,
            module_path: "./service/?.so".to_string(),
            logger: None,
            master: None,
            local: None,
            standalone: None,
            start: "main".to_string(),
            script_module: "script".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Config with defaults and `thread` workers.
    pub fn with_workers(thread: usize) -> Self {
        Self {
            thread,
            ..Default::default()
        }
    }

    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, RuntimeError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check the values the thread core depends on.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.thread == 0 {
            return Err(RuntimeError::InvalidConfig(
                "thread must be at least 1".to_string(),
            ));
        }
        if self.timer_tick_us == 0 {
            return Err(RuntimeError::InvalidConfig(
                "timer_tick_us must be positive".to_string(),
            ));
        }
        if self.watchdog_step_ms == 0 {
            return Err(RuntimeError::InvalidConfig(
                "watchdog_step_ms must be positive".to_string(),
            ));
        }
        if self.watchdog_steps == 0 {
            return Err(RuntimeError::InvalidConfig(
                "watchdog_steps must be at least 1".to_string(),
            ));
        }
        if let Some(reserve) = self.timer_busy_reserve {
            if reserve > self.thread {
                return Err(RuntimeError::InvalidConfig(format!(
                    "timer_busy_reserve ({}) exceeds thread ({})",
                    reserve, self.thread
                )));
            }
        }
        Ok(())
    }

    pub fn timer_tick(&self) -> Duration {
        Duration::from_micros(self.timer_tick_us)
    }

    pub fn watchdog_step(&self) -> Duration {
        Duration::from_millis(self.watchdog_step_ms)
    }

    /// Busy-exempt count the timer passes to every wakeup.
    pub fn timer_reserve(&self) -> usize {
        self.timer_busy_reserve
            .unwrap_or_else(|| self.thread.saturating_sub(1))
    }

    /// Subset handed to the platform when its subsystems are initialized.
    pub fn platform_settings(&self) -> PlatformSettings {
        PlatformSettings {
            harbor: self.harbor,
            module_path: self.module_path.clone(),
        }
    }
}
