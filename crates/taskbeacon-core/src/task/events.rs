//! Task events - discriminated union for everything a handle tells the host.
//!
//! The host (user agent, UI layer) consumes these to drive observer-visible
//! state. Per-handle event order equals the order the owner issued the calls.

use serde::{Deserialize, Serialize};

use super::types::{CloseReason, ProgressSnapshot, TaskDescriptor, TaskId, TaskKind, TaskOrigin};

/// Single discriminated union for all task notification events.
///
/// Serialized with a `type` tag so untyped consumers can treat it as a
/// discriminated union:
///
/// ```json
/// { "type": "task_progress", "id": "…", "progress": 75.0, "timeRemaining": 30.0 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// A new task was registered and should become observable.
    TaskRegistered {
        /// Unique identifier of the task.
        id: TaskId,
        /// Human-readable task description.
        title: String,
        /// Determinate or indeterminate.
        kind: TaskKind,
        /// Identity of the owning code, supplied by the environment.
        origin: TaskOrigin,
    },

    /// The owner reported new progress values.
    TaskProgress {
        /// Unique identifier of the task.
        id: TaskId,
        /// Progress percentage (`0.0`–`100.0`). Always absent for
        /// indeterminate tasks, whose updates carry no numeric meaning.
        #[serde(skip_serializing_if = "Option::is_none")]
        progress: Option<f64>,
        /// Estimated seconds until completion, if reported.
        #[serde(rename = "timeRemaining", skip_serializing_if = "Option::is_none")]
        time_remaining: Option<f64>,
    },

    /// No further updates will occur for this task.
    ///
    /// Carries the final snapshot so the host can render "completed at 100%"
    /// differently from "abandoned at 42%". Says nothing about success or
    /// failure of the underlying work.
    TaskClosed {
        /// Unique identifier of the task.
        id: TaskId,
        /// Explicit close versus abandonment.
        reason: CloseReason,
        /// Final reported progress percentage, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        progress: Option<f64>,
        /// Final reported time-remaining estimate, if any.
        #[serde(rename = "timeRemaining", skip_serializing_if = "Option::is_none")]
        time_remaining: Option<f64>,
    },
}

impl TaskEvent {
    /// Create a registration event from a handle descriptor.
    #[must_use]
    pub fn registered(descriptor: &TaskDescriptor) -> Self {
        Self::TaskRegistered {
            id: descriptor.id,
            title: descriptor.title.clone(),
            kind: descriptor.kind,
            origin: descriptor.origin.clone(),
        }
    }

    /// Create a progress event from the current snapshot.
    #[must_use]
    pub const fn progress(id: TaskId, snapshot: ProgressSnapshot) -> Self {
        Self::TaskProgress {
            id,
            progress: snapshot.progress,
            time_remaining: snapshot.time_remaining,
        }
    }

    /// Create a closure event carrying the final snapshot.
    #[must_use]
    pub const fn closed(id: TaskId, reason: CloseReason, snapshot: ProgressSnapshot) -> Self {
        Self::TaskClosed {
            id,
            reason,
            progress: snapshot.progress,
            time_remaining: snapshot.time_remaining,
        }
    }

    /// Get the task ID from any event type.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        match self {
            Self::TaskRegistered { id, .. }
            | Self::TaskProgress { id, .. }
            | Self::TaskClosed { id, .. } => *id,
        }
    }

    /// Get the snapshot carried by this event, if it carries one.
    #[must_use]
    pub const fn snapshot(&self) -> Option<ProgressSnapshot> {
        match self {
            Self::TaskRegistered { .. } => None,
            Self::TaskProgress {
                progress,
                time_remaining,
                ..
            }
            | Self::TaskClosed {
                progress,
                time_remaining,
                ..
            } => Some(ProgressSnapshot {
                progress: *progress,
                time_remaining: *time_remaining,
            }),
        }
    }

    /// Get the event name for wire protocols.
    ///
    /// This provides consistent event naming across transports.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::TaskRegistered { .. } => "task:registered",
            Self::TaskProgress { .. } => "task:progress",
            Self::TaskClosed { .. } => "task:closed",
        }
    }
}
