//! Error types for the test rig
//!
//! Two layers: `OpError` is what an operation or lifecycle hook fails with,
//! `Error` is what a run surfaces to the caller. An unexpected operation
//! failure is wrapped with a cause string identifying the failing call; a
//! hook failure during a healthy run surfaces raw.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised by an operation or lifecycle hook.
///
/// Carries a human-readable message plus an optional machine-readable code
/// that [`expect_failure`](crate::failure::expect_failure) can assert
/// against. Comparable and cloneable so a captured error can be checked for
/// identity after the run.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct OpError {
    /// What went wrong
    pub message: String,
    /// Optional machine-readable code (e.g. "ENOENT")
    pub code: Option<String>,
}

impl OpError {
    /// Create an error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Create an error carrying a machine-readable code
    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

impl From<&str> for OpError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for OpError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Main error type for the runner
#[derive(Error, Debug)]
pub enum Error {
    // === Run failures ===
    /// An operation failed unexpectedly. The run stopped after the remaining
    /// lifecycle hooks executed; the original error is kept as the source.
    #[error("\n{source}\n{cause} ... Execution aborted!")]
    Aborted {
        /// Identifies the failing call, including the forwarded arguments
        cause: String,
        /// The operation error that aborted the run
        #[source]
        source: OpError,
    },

    /// A lifecycle hook failed while the run was still healthy; the hook's
    /// error surfaces unwrapped.
    #[error(transparent)]
    Hook(#[from] OpError),

    // === Fatal input errors ===
    /// Malformed arguments to `expect_failure`
    #[error("Invalid failure expectation: {0}")]
    FailureSpec(String),
}

impl Error {
    /// The operation error underlying this failure, when there is one
    pub fn op_error(&self) -> Option<&OpError> {
        match self {
            Self::Aborted { source, .. } | Self::Hook(source) => Some(source),
            Self::FailureSpec(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aborted_message_embeds_original_and_cause() {
        let err = Error::Aborted {
            cause: "Execution failed for: await Suite.b()".to_string(),
            source: OpError::new("y"),
        };
        let msg = err.to_string();
        assert!(msg.contains("\ny\n"));
        assert!(msg.contains("Execution failed for: await Suite.b()"));
        assert!(msg.ends_with("... Execution aborted!"));
    }

    #[test]
    fn hook_error_is_transparent() {
        let err = Error::Hook(OpError::new("setup exploded"));
        assert_eq!(err.to_string(), "setup exploded");
    }

    #[test]
    fn op_error_identity_survives_wrapping() {
        let original = OpError::with_code("gone", "ENOENT");
        let err = Error::Aborted {
            cause: "Execution failed for: await Suite.load()".to_string(),
            source: original.clone(),
        };
        assert_eq!(err.op_error(), Some(&original));
    }
}
