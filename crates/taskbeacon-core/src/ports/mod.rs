//! Port definitions (trait abstractions) for host integration.

mod event_emitter;

pub use event_emitter::{NoopEmitter, TaskEventEmitter};
