// Roost Runtime
//
// Worker-thread core of an actor runtime: a fixed pool of workers drains actor
// message queues while timer, socket and watchdog threads drive time, network
// polling and liveness supervision.

pub mod boot;
pub mod local;
pub mod logging;
pub mod thread;

pub use boot::boot;
pub use thread::{BootError, Orchestrator, RunReport, RuntimeConfig, RuntimeError};
