//! # Network Polling
//!
//! The socket thread calls [`Poller::poll`] in a tight loop. The poller itself
//! is expected to block internally until an event arrives or a timeout passes.

/// Result of a single poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// The poll subsystem has shut down. This is the authoritative end signal
    /// for the socket thread.
    Terminated,
    /// An event was dequeued and handed to its target actor's queue.
    Event,
    /// Nothing happened (timeout or transient condition).
    Idle,
}

impl PollStatus {
    /// Map a raw poll code: `0` terminated, positive event, negative idle.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => PollStatus::Terminated,
            c if c > 0 => PollStatus::Event,
            _ => PollStatus::Idle,
        }
    }

    /// Raw code for this status (`0`, `1` or `-1`).
    pub fn code(self) -> i32 {
        match self {
            PollStatus::Terminated => 0,
            PollStatus::Event => 1,
            PollStatus::Idle => -1,
        }
    }
}

impl From<i32> for PollStatus {
    fn from(code: i32) -> Self {
        PollStatus::from_code(code)
    }
}

/// Network event source driven by the socket thread.
pub trait Poller: Send + Sync {
    /// Poll once.
    fn poll(&self) -> PollStatus;

    /// Ask the poller to unblock and report [`PollStatus::Terminated`] from now
    /// on. Must be idempotent.
    fn signal_exit(&self);

    /// Release poller resources. Called exactly once, after the socket thread
    /// (the only caller of `poll`) has exited.
    fn release(&self);
}
