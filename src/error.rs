//! Error types and result alias

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BrowserError>;

/// Every failure a queued action can report.
///
/// `Session::run` stops at the first error and returns it unchanged, so the
/// variant tells the caller exactly which kind of step failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrowserError {
    /// Neither an explicit selector nor a selected one was available
    #[error("Nothing is selected")]
    NoSelection,

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Element is not an input: {0}")]
    NotAnInput(String),

    /// A poll did not see its condition become true before the deadline
    #[error("Timed out after {}ms waiting for {condition}", .timeout.as_millis())]
    Timeout { condition: String, timeout: Duration },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Assertion failed: {0}")]
    Assertion(AssertionFailure),

    /// The session was exited and can no longer run actions
    #[error("Session is closed")]
    SessionClosed,

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Opaque failure reported by the browser engine, e.g. a script that threw
    #[error("Engine error: {0}")]
    Engine(String),

    /// Reading or writing a local file failed
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl BrowserError {
    pub(crate) fn engine(err: impl fmt::Display) -> Self {
        BrowserError::Engine(err.to_string())
    }
}

impl From<serde_json::Error> for BrowserError {
    fn from(err: serde_json::Error) -> Self {
        BrowserError::InvalidOptions(err.to_string())
    }
}

/// Details of an expectation mismatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    /// Resolved selector the assertion targeted, if any
    pub selector: Option<String>,
    pub expected: String,
    pub actual: String,
    /// Human readable summary
    pub message: String,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
