//! Core domain types for progress-tracked tasks.
//!
//! Pure data types with no I/O dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::errors::TaskError;

/// Unique identifier for one progress-tracked task.
///
/// Assigned by the reporter at creation time. The identifier is the key the
/// host uses to correlate registration, progress, and closure events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a fresh task ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether a task's progress is expressible as a fraction of total work.
///
/// Immutable after construction; determines whether the numeric `progress`
/// argument of an update carries meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Progress is a meaningful percentage in `[0, 100]`.
    Determinate,
    /// The task is merely "in progress, duration unknown".
    Indeterminate,
}

impl TaskKind {
    /// String representation for wire protocols and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Determinate => "determinate",
            Self::Indeterminate => "indeterminate",
        }
    }

    /// Parse from a string at an untyped boundary.
    ///
    /// For embedders whose construction call crosses a stringly-typed FFI or
    /// IPC surface before reaching [`TaskReporter::create`]: unlike enum
    /// deserialization this reports the offending value as the argument
    /// error the caller must surface.
    ///
    /// [`TaskReporter::create`]: super::TaskReporter::create
    pub fn parse(s: &str) -> Result<Self, TaskError> {
        match s {
            "determinate" => Ok(Self::Determinate),
            "indeterminate" => Ok(Self::Indeterminate),
            other => Err(TaskError::unknown_kind(other)),
        }
    }

    /// Whether numeric progress values are meaningful for this kind.
    #[must_use]
    pub const fn is_determinate(&self) -> bool {
        matches!(self, Self::Determinate)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a task handle.
///
/// Starts at `Active` and transitions to `Closed` exactly once; there is no
/// way back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// The owner may still report updates.
    Active,
    /// No further updates will occur.
    Closed,
}

impl TaskState {
    /// String representation for wire protocols and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }

    /// Whether the handle still accepts updates.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a task stopped reporting.
///
/// Carried on the closure event because host retention policy differs between
/// a deliberate close and a handle whose owning context disappeared. Neither
/// value says anything about success or failure of the underlying work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// The owner called `close()`.
    Explicit,
    /// The handle was destroyed without a `close()` call.
    Abandoned,
}

impl CloseReason {
    /// String representation for wire protocols and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the code that owns a reporter.
///
/// Supplied by the environment when it hands out the reporter capability,
/// never by the task code itself. Opaque to the core; the host decides how
/// to render it (e.g. an origin string in UI).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskOrigin(String);

impl TaskOrigin {
    /// Create an origin from an environment-supplied identity string.
    pub fn new(origin: impl Into<String>) -> Self {
        Self(origin.into())
    }

    /// Get the identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last-reported progress values for a task.
///
/// `progress` is populated only for determinate tasks; indeterminate updates
/// structurally cannot surface a percentage. Both fields remain readable
/// after closure as the final snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Last accepted progress percentage (`0.0`–`100.0`), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Last reported estimate of seconds until completion, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<f64>,
}

impl ProgressSnapshot {
    /// Snapshot with no reported values yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            progress: None,
            time_remaining: None,
        }
    }

    /// Whether anything has been reported.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.progress.is_none() && self.time_remaining.is_none()
    }
}

/// The immutable part of a task handle.
///
/// Everything the host may query at any time without touching mutable state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    /// Unique identifier of the task.
    pub id: TaskId,
    /// Human-readable description of the task. Non-empty.
    pub title: String,
    /// Determinate or indeterminate.
    pub kind: TaskKind,
    /// Identity of the owning code.
    pub origin: TaskOrigin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_round_trips_known_values() {
        assert_eq!(TaskKind::parse("determinate").unwrap(), TaskKind::Determinate);
        assert_eq!(
            TaskKind::parse("indeterminate").unwrap(),
            TaskKind::Indeterminate
        );
    }

    #[test]
    fn kind_parse_rejects_unknown_value() {
        let err = TaskKind::parse("spinner").unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("spinner"));
    }

    #[test]
    fn task_ids_are_unique() {
        assert_ne!(TaskId::new(), TaskId::new());
    }

    #[test]
    fn empty_snapshot_has_no_values() {
        let snapshot = ProgressSnapshot::empty();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.progress, None);
        assert_eq!(snapshot.time_remaining, None);
    }

    #[test]
    fn snapshot_serializes_camel_case_and_skips_unset() {
        let snapshot = ProgressSnapshot {
            progress: Some(42.0),
            time_remaining: None,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"progress\":42.0"));
        assert!(!json.contains("timeRemaining"));

        let full = ProgressSnapshot {
            progress: Some(42.0),
            time_remaining: Some(7.5),
        };
        let json = serde_json::to_string(&full).unwrap();
        assert!(json.contains("\"timeRemaining\":7.5"));
    }
}
