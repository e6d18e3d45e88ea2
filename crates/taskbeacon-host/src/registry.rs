//! Observed-task registry.
//!
//! The reference bookkeeping a host keeps about tasks announced to it:
//! which tasks exist, their latest snapshot, and how they ended. Retention
//! differs by closure reason - explicitly closed tasks stay visible with
//! their final snapshot so a UI can render "completed at 100%", while
//! abandoned tasks belong to a torn-down context and are evicted after
//! logging, the host-side cleanup the owner never performed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use taskbeacon_core::{
    CloseReason, ProgressSnapshot, TaskEvent, TaskEventEmitter, TaskId, TaskKind, TaskOrigin,
    TaskState,
};

/// Everything the host tracks about one observed task.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservedTask {
    /// Human-readable description, as registered.
    pub title: String,
    /// Determinate or indeterminate.
    pub kind: TaskKind,
    /// Identity of the owning code.
    pub origin: TaskOrigin,
    /// Active or closed, from the host's point of view.
    pub state: TaskState,
    /// Latest reported values (final snapshot once closed).
    pub snapshot: ProgressSnapshot,
    /// How the task ended, once it has.
    pub close_reason: Option<CloseReason>,
    /// When the registration event arrived.
    pub registered_at: DateTime<Utc>,
}

/// Host-side table of observed tasks, driven entirely by task events.
///
/// Implements [`TaskEventEmitter`] so it can be wired directly as (or behind)
/// the observer capability handed to reporters. Events for one task arrive in
/// the order the owner issued them; the table therefore always holds the
/// latest snapshot.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    tasks: Arc<Mutex<HashMap<TaskId, ObservedTask>>>,
}

impl TaskRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, HashMap<TaskId, ObservedTask>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up one observed task.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<ObservedTask> {
        self.lock_tasks().get(&id).cloned()
    }

    /// All tasks still reporting.
    #[must_use]
    pub fn active(&self) -> Vec<(TaskId, ObservedTask)> {
        self.lock_tasks()
            .iter()
            .filter(|(_, task)| task.state.is_active())
            .map(|(id, task)| (*id, task.clone()))
            .collect()
    }

    /// Whether a task is currently tracked (active or retained after close).
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.lock_tasks().contains_key(&id)
    }

    /// Number of tracked tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_tasks().len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_tasks().is_empty()
    }

    fn on_registered(&self, id: TaskId, title: String, kind: TaskKind, origin: TaskOrigin) {
        tracing::info!(%id, %title, %kind, %origin, "observing new task");
        self.lock_tasks().insert(
            id,
            ObservedTask {
                title,
                kind,
                origin,
                state: TaskState::Active,
                snapshot: ProgressSnapshot::empty(),
                close_reason: None,
                registered_at: Utc::now(),
            },
        );
    }

    fn on_progress(&self, id: TaskId, snapshot: ProgressSnapshot) {
        let mut tasks = self.lock_tasks();
        match tasks.get_mut(&id) {
            Some(task) if task.state.is_active() => {
                task.snapshot = snapshot;
            }
            Some(_) => {
                tracing::debug!(%id, "progress for closed task ignored");
            }
            None => {
                tracing::debug!(%id, "progress for unknown task ignored");
            }
        }
    }

    fn on_closed(&self, id: TaskId, reason: CloseReason, snapshot: ProgressSnapshot) {
        let mut tasks = self.lock_tasks();
        match reason {
            CloseReason::Explicit => {
                if let Some(task) = tasks.get_mut(&id) {
                    task.state = TaskState::Closed;
                    task.close_reason = Some(reason);
                    task.snapshot = snapshot;
                    tracing::info!(%id, title = %task.title, ?snapshot, "task closed");
                } else {
                    tracing::debug!(%id, "closure for unknown task ignored");
                }
            }
            CloseReason::Abandoned => {
                if let Some(task) = tasks.remove(&id) {
                    tracing::warn!(
                        %id,
                        title = %task.title,
                        ?snapshot,
                        "task abandoned, evicting from observation"
                    );
                } else {
                    tracing::debug!(%id, "abandonment for unknown task ignored");
                }
            }
        }
    }
}

impl TaskEventEmitter for TaskRegistry {
    fn emit(&self, event: TaskEvent) {
        match event {
            TaskEvent::TaskRegistered {
                id,
                title,
                kind,
                origin,
            } => self.on_registered(id, title, kind, origin),
            TaskEvent::TaskProgress {
                id,
                progress,
                time_remaining,
            } => self.on_progress(
                id,
                ProgressSnapshot {
                    progress,
                    time_remaining,
                },
            ),
            TaskEvent::TaskClosed {
                id,
                reason,
                progress,
                time_remaining,
            } => self.on_closed(
                id,
                reason,
                ProgressSnapshot {
                    progress,
                    time_remaining,
                },
            ),
        }
    }

    fn clone_box(&self) -> Box<dyn TaskEventEmitter> {
        Box::new(self.clone())
    }
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskbeacon_core::TaskDescriptor;

    fn registered(registry: &TaskRegistry, title: &str, kind: TaskKind) -> TaskId {
        let descriptor = TaskDescriptor {
            id: TaskId::new(),
            title: title.to_string(),
            kind,
            origin: TaskOrigin::new("https://example.com"),
        };
        registry.emit(TaskEvent::registered(&descriptor));
        descriptor.id
    }

    #[test]
    fn registration_makes_task_observable() {
        let registry = TaskRegistry::new();
        let id = registered(&registry, "Uploading files…", TaskKind::Determinate);

        let task = registry.get(id).unwrap();
        assert_eq!(task.title, "Uploading files…");
        assert_eq!(task.state, TaskState::Active);
        assert!(task.snapshot.is_empty());
        assert_eq!(registry.active().len(), 1);
    }

    #[test]
    fn progress_overwrites_snapshot_latest_wins() {
        let registry = TaskRegistry::new();
        let id = registered(&registry, "Uploading files…", TaskKind::Determinate);

        for value in [10.0, 50.0, 90.0] {
            registry.emit(TaskEvent::progress(
                id,
                ProgressSnapshot {
                    progress: Some(value),
                    time_remaining: None,
                },
            ));
        }

        assert_eq!(registry.get(id).unwrap().snapshot.progress, Some(90.0));
    }

    #[test]
    fn explicit_closure_is_retained_with_final_snapshot() {
        let registry = TaskRegistry::new();
        let id = registered(&registry, "Uploading files…", TaskKind::Determinate);

        registry.emit(TaskEvent::closed(
            id,
            CloseReason::Explicit,
            ProgressSnapshot {
                progress: Some(100.0),
                time_remaining: Some(0.0),
            },
        ));

        let task = registry.get(id).unwrap();
        assert_eq!(task.state, TaskState::Closed);
        assert_eq!(task.close_reason, Some(CloseReason::Explicit));
        assert_eq!(task.snapshot.progress, Some(100.0));
        assert!(registry.active().is_empty());
    }

    #[test]
    fn abandonment_evicts_the_task() {
        let registry = TaskRegistry::new();
        let id = registered(&registry, "Syncing…", TaskKind::Indeterminate);

        registry.emit(TaskEvent::closed(
            id,
            CloseReason::Abandoned,
            ProgressSnapshot::empty(),
        ));

        assert!(!registry.contains(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn progress_after_closure_does_not_resurrect_snapshot() {
        let registry = TaskRegistry::new();
        let id = registered(&registry, "Uploading files…", TaskKind::Determinate);
        registry.emit(TaskEvent::closed(
            id,
            CloseReason::Explicit,
            ProgressSnapshot {
                progress: Some(75.0),
                time_remaining: Some(30.0),
            },
        ));

        registry.emit(TaskEvent::progress(
            id,
            ProgressSnapshot {
                progress: Some(99.0),
                time_remaining: None,
            },
        ));

        assert_eq!(registry.get(id).unwrap().snapshot.progress, Some(75.0));
    }

    #[test]
    fn events_for_unknown_tasks_are_dropped_without_damage() {
        let registry = TaskRegistry::new();
        let known = registered(&registry, "Uploading files…", TaskKind::Determinate);

        let stranger = TaskId::new();
        registry.emit(TaskEvent::progress(
            stranger,
            ProgressSnapshot {
                progress: Some(5.0),
                time_remaining: None,
            },
        ));
        registry.emit(TaskEvent::closed(
            stranger,
            CloseReason::Abandoned,
            ProgressSnapshot::empty(),
        ));

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(known));
    }

    #[test]
    fn independent_tasks_are_tracked_independently() {
        let registry = TaskRegistry::new();
        let upload = registered(&registry, "Uploading files…", TaskKind::Determinate);
        let sync = registered(&registry, "Syncing…", TaskKind::Indeterminate);

        registry.emit(TaskEvent::progress(
            upload,
            ProgressSnapshot {
                progress: Some(50.0),
                time_remaining: None,
            },
        ));
        registry.emit(TaskEvent::closed(
            sync,
            CloseReason::Abandoned,
            ProgressSnapshot::empty(),
        ));

        assert_eq!(registry.get(upload).unwrap().snapshot.progress, Some(50.0));
        assert!(!registry.contains(sync));
    }
}
