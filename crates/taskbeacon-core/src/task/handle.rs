//! The progress handle state machine.
//!
//! One handle per logical long-running operation. The owner drives it with
//! `update` and `close`; the host observes through the emitter injected at
//! creation. All mutation happens under one lock, and the matching event is
//! emitted while it is held, so per-handle observation order equals call
//! order and the closed transition is observed exactly once.

use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::TaskEventEmitter;

use super::coalesce::UpdateCoalescer;
use super::errors::{TaskError, TaskResult};
use super::events::TaskEvent;
use super::types::{
    CloseReason, ProgressSnapshot, TaskDescriptor, TaskId, TaskKind, TaskOrigin, TaskState,
};

/// Inclusive bounds for determinate progress.
const PROGRESS_MIN: f64 = 0.0;
const PROGRESS_MAX: f64 = 100.0;

struct Shared {
    state: TaskState,
    snapshot: ProgressSnapshot,
    coalescer: Option<UpdateCoalescer>,
}

/// Host-observable proxy for one logical long-running operation.
///
/// Created through [`TaskReporter::create`](super::TaskReporter::create),
/// updated as the operation advances, and closed when it concludes. A handle
/// has exactly one owner and is deliberately not `Clone`; dropping it while
/// still active is abandonment and is reported to the host as such.
pub struct ProgressHandle {
    descriptor: TaskDescriptor,
    emitter: Arc<dyn TaskEventEmitter>,
    shared: Mutex<Shared>,
}

impl ProgressHandle {
    /// Construct a handle and announce it to the host.
    ///
    /// Validation of title and kind happens in the reporter; by the time we
    /// get here the descriptor is well-formed.
    pub(crate) fn register(
        descriptor: TaskDescriptor,
        emitter: Arc<dyn TaskEventEmitter>,
        coalescer: Option<UpdateCoalescer>,
    ) -> Self {
        tracing::debug!(
            id = %descriptor.id,
            title = %descriptor.title,
            kind = %descriptor.kind,
            origin = %descriptor.origin,
            "task registered"
        );
        emitter.emit(TaskEvent::registered(&descriptor));
        Self {
            descriptor,
            emitter,
            shared: Mutex::new(Shared {
                state: TaskState::Active,
                snapshot: ProgressSnapshot::empty(),
                coalescer,
            }),
        }
    }

    fn lock_shared(&self) -> std::sync::MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Report new progress values.
    ///
    /// `progress` must be finite, and within the inclusive `[0, 100]` range
    /// for determinate tasks. For indeterminate tasks the numeric value is
    /// accepted but carries no meaning: it is neither stored nor surfaced to
    /// the host. `time_remaining`, if given, is a finite non-negative number
    /// of seconds.
    ///
    /// Fire-and-forget: never blocks on the host, returns nothing beyond
    /// success or a validation failure. A failed call leaves the previous
    /// snapshot untouched.
    ///
    /// Calling `update` on a closed handle is a documented silent no-op.
    /// Abandonment can race a lingering update from the owner; treating that
    /// as an error would make correct callers fallible for no benefit.
    pub fn update(&self, progress: f64, time_remaining: Option<f64>) -> TaskResult<()> {
        if !progress.is_finite() {
            return Err(TaskError::non_finite_progress(progress));
        }
        if self.descriptor.kind.is_determinate()
            && !(PROGRESS_MIN..=PROGRESS_MAX).contains(&progress)
        {
            return Err(TaskError::progress_out_of_range(progress));
        }
        if let Some(seconds) = time_remaining {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(TaskError::invalid_time_remaining(seconds));
            }
        }

        let mut shared = self.lock_shared();
        if shared.state == TaskState::Closed {
            return Ok(());
        }

        shared.snapshot = ProgressSnapshot {
            progress: if self.descriptor.kind.is_determinate() {
                Some(progress)
            } else {
                None
            },
            time_remaining,
        };

        // Snapshot is stored before the gate, so a suppressed notification
        // still leaves the latest values as the source of truth.
        let snapshot = shared.snapshot;
        let notify = match shared.coalescer.as_mut() {
            Some(coalescer) => coalescer.offer(snapshot),
            None => true,
        };
        if notify {
            self.emitter
                .emit(TaskEvent::progress(self.descriptor.id, snapshot));
        }
        Ok(())
    }

    /// Announce that no further updates will occur.
    ///
    /// Idempotent: the first call transitions the handle to closed and
    /// notifies the host with the final snapshot; later calls do nothing.
    /// Closing communicates only "no further updates", not an outcome -
    /// success or failure of the underlying work travels through other
    /// channels.
    pub fn close(&self) {
        let mut shared = self.lock_shared();
        if shared.state == TaskState::Closed {
            return;
        }
        shared.state = TaskState::Closed;
        tracing::debug!(
            id = %self.descriptor.id,
            title = %self.descriptor.title,
            "task closed"
        );
        self.emitter.emit(TaskEvent::closed(
            self.descriptor.id,
            CloseReason::Explicit,
            shared.snapshot,
        ));
    }

    /// Unique identifier of the task.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.descriptor.id
    }

    /// Human-readable description, immutable for the handle's lifetime.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.descriptor.title
    }

    /// Determinate or indeterminate, immutable for the handle's lifetime.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.descriptor.kind
    }

    /// Identity of the owning code.
    #[must_use]
    pub const fn origin(&self) -> &TaskOrigin {
        &self.descriptor.origin
    }

    /// The immutable part of the handle, queryable by the host at any time.
    #[must_use]
    pub const fn descriptor(&self) -> &TaskDescriptor {
        &self.descriptor
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> TaskState {
        self.lock_shared().state
    }

    /// Last-reported values; remains readable after closure as the final
    /// snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.lock_shared().snapshot
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        let mut shared = self.lock_shared();
        if shared.state == TaskState::Closed {
            return;
        }
        shared.state = TaskState::Closed;
        tracing::warn!(
            id = %self.descriptor.id,
            title = %self.descriptor.title,
            "active task handle dropped, reporting abandonment"
        );
        self.emitter.emit(TaskEvent::closed(
            self.descriptor.id,
            CloseReason::Abandoned,
            shared.snapshot,
        ));
    }
}

impl std::fmt::Debug for ProgressHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.lock_shared();
        f.debug_struct("ProgressHandle")
            .field("descriptor", &self.descriptor)
            .field("state", &shared.state)
            .field("snapshot", &shared.snapshot)
            .finish_non_exhaustive()
    }
}
