#![doc = " Worker-thread core: monitor state, the four loop kinds and their orchestrator."]

pub mod config;
pub mod error;
pub mod monitor;
pub mod orchestrator;
pub mod socket;
pub mod timer;
pub mod watchdog;
pub mod worker;

pub use config::RuntimeConfig;
pub use error::{BootError, RuntimeError};
pub use monitor::{Monitor, Parked};
pub use orchestrator::{Orchestrator, RunReport};
pub use socket::{SocketExit, SocketLoop};
pub use timer::TimerLoop;
pub use watchdog::Watchdog;
pub use worker::{Worker, WorkerStats};
