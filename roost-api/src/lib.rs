//! # Roost Runtime API
//!
//! Contracts between the roost worker-thread core and the subsystems it drives
//! but does not own: message dispatch, the live-actor registry, per-worker hang
//! detection, network polling, the clock, and the platform bootstrap.
//!
//! Every contract is `Send + Sync`. The core shares a single instance of each
//! across all of its threads, so implementations must tolerate concurrent calls.
//!
//! ## Module Organization
//!
//! - [`types`]: Actor handles and other small shared types
//! - [`dispatch`]: One-unit-of-work message dispatch
//! - [`actors`]: Live-actor count used as the global shutdown signal
//! - [`supervision`]: Hang detectors and their factory
//! - [`poll`]: Network event polling
//! - [`clock`]: Global time source
//! - [`platform`]: Subsystem initialization and actor launch for bootstrap
//! - [`collaborators`]: Bundle of shared collaborator handles
//! - [`errors`]: Errors reported by platform services

pub mod actors;
pub mod clock;
pub mod collaborators;
pub mod dispatch;
pub mod errors;
pub mod platform;
pub mod poll;
pub mod supervision;
pub mod types;

pub use actors::LiveActors;
pub use clock::Clock;
pub use collaborators::Collaborators;
pub use dispatch::{Dispatch, Dispatcher};
pub use errors::ServiceError;
pub use platform::{Platform, PlatformSettings};
pub use poll::{PollStatus, Poller};
pub use supervision::{DetectorFactory, HangDetector};
pub use types::{ActorHandle, NO_ACTOR};
