//! The environment-facing factory for progress handles.
//!
//! A reporter is the capability the environment hands to task code: it
//! carries the owner's identity and the injected host emitter, so task code
//! never reaches into ambient global state to announce itself.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::ports::TaskEventEmitter;

use super::coalesce::UpdateCoalescer;
use super::errors::{TaskError, TaskResult};
use super::handle::ProgressHandle;
use super::types::{TaskDescriptor, TaskId, TaskKind, TaskOrigin};

/// Factory for [`ProgressHandle`]s, scoped to one owning execution context.
///
/// Cloning a reporter shares the destruction flag: once the environment
/// tears the context down, every clone refuses to create new handles.
#[derive(Clone)]
pub struct TaskReporter {
    origin: TaskOrigin,
    emitter: Arc<dyn TaskEventEmitter>,
    min_emit_interval: Option<Duration>,
    destroyed: Arc<AtomicBool>,
}

impl TaskReporter {
    /// Create a reporter for the given owner identity, wired to the host
    /// observer.
    pub fn new(origin: TaskOrigin, emitter: Arc<dyn TaskEventEmitter>) -> Self {
        Self {
            origin,
            emitter,
            min_emit_interval: None,
            destroyed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Coalesce progress notifications from handles created by this
    /// reporter: at most one changed snapshot per `interval`, and snapshots
    /// identical to the last delivered one are not re-sent at all.
    ///
    /// The handle always retains the most recent values regardless of
    /// coalescing; only host refresh frequency is limited.
    #[must_use]
    pub fn with_min_emit_interval(mut self, interval: Duration) -> Self {
        self.min_emit_interval = Some(interval);
        self
    }

    /// Identity of the owning code.
    #[must_use]
    pub const fn origin(&self) -> &TaskOrigin {
        &self.origin
    }

    /// Create a new progress handle in the active state.
    ///
    /// `title` must be non-empty after trimming. Registration is announced to
    /// the host before this returns.
    pub fn create(&self, title: impl Into<String>, kind: TaskKind) -> TaskResult<ProgressHandle> {
        if self.destroyed.load(Ordering::Acquire) {
            return Err(TaskError::context_destroyed());
        }
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskError::empty_title());
        }

        let descriptor = TaskDescriptor {
            id: TaskId::new(),
            title,
            kind,
            origin: self.origin.clone(),
        };
        Ok(ProgressHandle::register(
            descriptor,
            Arc::clone(&self.emitter),
            self.min_emit_interval.map(UpdateCoalescer::new),
        ))
    }

    /// Mark the owning execution context as destroyed.
    ///
    /// Called by the environment on context teardown. Subsequent `create`
    /// calls fail with a state error; handles already handed out report
    /// abandonment when they are dropped with the context.
    pub fn destroy(&self) {
        if !self.destroyed.swap(true, Ordering::AcqRel) {
            tracing::debug!(origin = %self.origin, "task reporter context destroyed");
        }
    }

    /// Whether the owning execution context has been torn down.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for TaskReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskReporter")
            .field("origin", &self.origin)
            .field("min_emit_interval", &self.min_emit_interval)
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}
