use std::fmt::Display;

use thiserror::Error;

use roost_api::ServiceError;

/// Errors from the worker-thread core and its configuration.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Thread {0} panicked")]
    ThreadPanicked(String),
    #[error("Internal runtime error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Errors raised while bringing a runtime node up.
#[derive(Error, Debug)]
pub enum BootError {
    #[error("Subsystem initialization failed: {0}")]
    ServiceInit(#[from] ServiceError),
    #[error("Launch logger error: {0}")]
    LoggerUnavailable(String),
    #[error("Init fail: master ({0})")]
    MasterUnavailable(String),
    #[error("Init fail: no master ({0})")]
    HarborStart(String),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl BootError {
    /// Whether the node must terminate the process rather than return.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BootError::LoggerUnavailable(_))
    }
}

/// Report an unrecoverable environment failure and terminate the process.
///
/// Used when the host cannot support the threading model at all: a thread that
/// cannot be spawned or a lock that can no longer be taken.
pub fn fatal(context: &str, error: impl Display) -> ! {
    tracing::error!(context = context, error = %error, "unrecoverable runtime failure");
    eprintln!("{}: {}", context, error);
    std::process::exit(1)
}
