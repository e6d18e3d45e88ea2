//! Event emitter trait for host observation.
//!
//! This module defines the abstraction through which handles notify the host.
//! Implementations handle transport details (in-process registries, channels,
//! IPC to a UI process, etc.).

use crate::task::TaskEvent;

/// Trait for delivering task events to the host.
///
/// This is the capability the environment injects into a reporter; the core
/// never reaches into ambient global state to find its observer.
///
/// # Contract
///
/// - `emit` must not block: handles call it while holding their state lock,
///   and the owner's `update`/`close` calls are fire-and-forget.
/// - Events emitted through one handle arrive in call order; implementations
///   must preserve that order per task.
///
/// # Implementations
///
/// - [`NoopEmitter`] - for tests and contexts with nothing observing
/// - Host adapters (task registry, broadcast fan-out, etc.)
pub trait TaskEventEmitter: Send + Sync {
    /// Deliver a task event to the host.
    ///
    /// Implementations should buffer or forward asynchronously; this method
    /// must not block the reporting caller.
    fn emit(&self, event: TaskEvent);

    /// Clone this emitter into a boxed trait object.
    ///
    /// `Clone` cannot appear on an object-safe trait, so composite emitters
    /// that need to duplicate their observers go through this instead.
    fn clone_box(&self) -> Box<dyn TaskEventEmitter>;
}

/// An emitter with nothing attached: every event is discarded.
///
/// Stands in for the host observer in handle-side validation tests and in
/// headless embeddings that have no UI to refresh.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    /// Create a new no-op emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TaskEventEmitter for NoopEmitter {
    fn emit(&self, _event: TaskEvent) {}

    fn clone_box(&self) -> Box<dyn TaskEventEmitter> {
        Box::new(self.clone())
    }
}
