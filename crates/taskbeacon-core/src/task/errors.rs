//! Validation and lifecycle errors for task handles.
//!
//! These errors are designed to be serializable and carry the offending
//! value, so adapter layers can surface them across FFI or wire boundaries
//! without losing detail.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse error taxonomy mirroring the host-facing contract.
///
/// Every [`TaskError`] variant maps onto exactly one of these categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The caller supplied an argument outside the documented domain.
    InvalidArgument,
    /// The operation is not permitted in the handle's current lifecycle state.
    InvalidState,
}

impl ErrorCategory {
    /// String representation for wire protocols and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::InvalidState => "invalid_state",
        }
    }
}

/// Error type for task reporting operations.
///
/// All failures are synchronous and local to the call that caused them; a
/// failed call leaves the handle's prior state untouched.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq)]
pub enum TaskError {
    /// Construction was attempted with an empty title.
    #[error("task title must be a non-empty string")]
    EmptyTitle,

    /// A task kind string did not name an enumerated kind.
    #[error("unknown task kind: {value}")]
    UnknownKind {
        /// The unrecognized kind string.
        value: String,
    },

    /// Determinate progress outside the inclusive `[0, 100]` range.
    #[error("progress {value} is outside [0, 100]")]
    ProgressOutOfRange {
        /// The out-of-range value.
        value: f64,
    },

    /// Progress was NaN or infinite.
    #[error("progress must be finite, got {value}")]
    NonFiniteProgress {
        /// The non-finite value.
        value: f64,
    },

    /// Time-remaining estimate was negative, NaN, or infinite.
    #[error("time remaining must be a finite non-negative number of seconds, got {value}")]
    InvalidTimeRemaining {
        /// The rejected value.
        value: f64,
    },

    /// The reporter's owning execution context has been torn down.
    #[error("owning execution context has been destroyed")]
    ContextDestroyed,
}

impl TaskError {
    /// Create an empty-title error.
    #[must_use]
    pub const fn empty_title() -> Self {
        Self::EmptyTitle
    }

    /// Create an unknown-kind error.
    pub fn unknown_kind(value: impl Into<String>) -> Self {
        Self::UnknownKind {
            value: value.into(),
        }
    }

    /// Create an out-of-range progress error.
    #[must_use]
    pub const fn progress_out_of_range(value: f64) -> Self {
        Self::ProgressOutOfRange { value }
    }

    /// Create a non-finite progress error.
    #[must_use]
    pub const fn non_finite_progress(value: f64) -> Self {
        Self::NonFiniteProgress { value }
    }

    /// Create an invalid time-remaining error.
    #[must_use]
    pub const fn invalid_time_remaining(value: f64) -> Self {
        Self::InvalidTimeRemaining { value }
    }

    /// Create a context-destroyed error.
    #[must_use]
    pub const fn context_destroyed() -> Self {
        Self::ContextDestroyed
    }

    /// Which side of the two-value taxonomy this error falls on.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyTitle
            | Self::UnknownKind { .. }
            | Self::ProgressOutOfRange { .. }
            | Self::NonFiniteProgress { .. }
            | Self::InvalidTimeRemaining { .. } => ErrorCategory::InvalidArgument,
            Self::ContextDestroyed => ErrorCategory::InvalidState,
        }
    }

    /// Check if this is an argument-validation failure.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self.category(), ErrorCategory::InvalidArgument)
    }

    /// Check if this is a lifecycle-state failure.
    #[must_use]
    pub const fn is_invalid_state(&self) -> bool {
        matches!(self.category(), ErrorCategory::InvalidState)
    }

    /// Convert to a developer-friendly message with a corrective hint.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyTitle => {
                "Task title is empty. Provide a short human-readable description.".to_string()
            }
            Self::UnknownKind { value } => {
                format!("Unknown task kind '{value}'. Use 'determinate' or 'indeterminate'.")
            }
            Self::ProgressOutOfRange { value } => {
                format!("Progress {value} is outside the inclusive range [0, 100].")
            }
            Self::NonFiniteProgress { value } => {
                format!("Progress must be a finite number, got {value}.")
            }
            Self::InvalidTimeRemaining { value } => {
                format!(
                    "Time remaining must be a finite non-negative number of seconds, got {value}."
                )
            }
            Self::ContextDestroyed => {
                "The owning execution context is gone; no further task operations are possible."
                    .to_string()
            }
        }
    }
}

/// Convenience result type for task reporting operations.
pub type TaskResult<T> = Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_errors_categorize_as_invalid_argument() {
        for err in [
            TaskError::empty_title(),
            TaskError::unknown_kind("spinner"),
            TaskError::progress_out_of_range(101.0),
            TaskError::non_finite_progress(f64::NAN),
            TaskError::invalid_time_remaining(-1.0),
        ] {
            assert_eq!(err.category(), ErrorCategory::InvalidArgument);
            assert!(err.is_invalid_argument());
            assert!(!err.is_invalid_state());
        }
    }

    #[test]
    fn context_destroyed_categorizes_as_invalid_state() {
        let err = TaskError::context_destroyed();
        assert_eq!(err.category(), ErrorCategory::InvalidState);
        assert!(err.is_invalid_state());
    }

    #[test]
    fn errors_serialize_and_round_trip() {
        let err = TaskError::progress_out_of_range(150.0);
        let json = serde_json::to_string(&err).unwrap();
        let back: TaskError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn user_messages_name_the_offending_value() {
        assert!(
            TaskError::unknown_kind("bogus")
                .user_message()
                .contains("bogus")
        );
        assert!(
            TaskError::progress_out_of_range(150.0)
                .user_message()
                .contains("150")
        );
    }
}
