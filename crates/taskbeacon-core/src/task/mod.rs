//! Task progress domain: handle lifecycle, validation, and events.
//!
//! # Structure
//!
//! - `types` - pure data types (ids, kinds, states, snapshots)
//! - `errors` - validation and lifecycle errors
//! - `events` - the discriminated union delivered to the host
//! - `handle` - the per-task state machine
//! - `reporter` - the environment-facing handle factory
//! - `coalesce` - host refresh rate limiting

mod coalesce;
mod errors;
mod events;
mod handle;
mod reporter;
mod types;

pub use coalesce::UpdateCoalescer;
pub use errors::{ErrorCategory, TaskError, TaskResult};
pub use events::TaskEvent;
pub use handle::ProgressHandle;
pub use reporter::TaskReporter;
pub use types::{
    CloseReason, ProgressSnapshot, TaskDescriptor, TaskId, TaskKind, TaskOrigin, TaskState,
};
