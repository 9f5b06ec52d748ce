//! # Platform Service Errors
//!
//! Errors reported by [`Platform`](crate::platform::Platform) implementations
//! while the runtime node is being brought up.

use thiserror::Error;

/// Failure reported by a platform service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// A subsystem could not be initialized.
    #[error("Subsystem {subsystem} failed to initialize: {reason}")]
    InitFailed { subsystem: String, reason: String },

    /// A name could not be bound to an actor handle.
    #[error("Cannot register name {name}: {reason}")]
    RegisterFailed { name: String, reason: String },

    /// The cluster (harbor) service could not be started.
    #[error("Harbor unavailable: {0}")]
    HarborUnavailable(String),

    /// Catch-all for platform specific failures.
    #[error("Platform error: {0}")]
    Other(String),
}
