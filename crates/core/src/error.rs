//! Error types shared across the cogspace workspace.
//!
//! Every fallible public operation in the workspace returns
//! [`Result<T>`], a thin alias over [`CogError`]: invalid input,
//! missing entities, queue backpressure, timeouts, runtime lifecycle
//! violations, OS resource failures, and allocation failure.

use thiserror::Error;

/// Result type alias used throughout the cogspace workspace.
pub type Result<T> = std::result::Result<T, CogError>;

/// Unified error type for all cogspace operations.
#[derive(Debug, Error)]
pub enum CogError {
    /// A caller supplied a malformed input: a null/foreign atom reference,
    /// an out-of-range truth value, or similar.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A lookup by id or name found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// A bounded message queue was at capacity.
    #[error("queue full")]
    QueueFull,

    /// A blocking operation's deadline elapsed with nothing to report.
    #[error("timed out")]
    TimedOut,

    /// `start` was called on a runtime that is already running.
    #[error("already running")]
    AlreadyRunning,

    /// An operation requiring a running runtime was attempted while stopped.
    #[error("not running")]
    NotRunning,

    /// Failure to obtain an OS-level resource (thread, shared region, etc).
    #[error("OS resource failure: {0}")]
    OsResource(String),

    /// Allocation failure on an operation that allocates.
    #[error("out of memory")]
    OutOfMemory,
}

impl CogError {
    /// True for errors that stem from caller-supplied bad input, as
    /// opposed to runtime or resource failures.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            CogError::InvalidArgument(_) | CogError::NotFound(_)
        )
    }

    /// True for errors a caller can reasonably retry (queue pressure,
    /// scheduling deadlines) rather than treat as a hard failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CogError::QueueFull | CogError::TimedOut)
    }
}
