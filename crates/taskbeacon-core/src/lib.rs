//! Progress-notification handles for long-running tasks.
//!
//! A [`ProgressHandle`] is a host-observable proxy for one logical
//! long-running operation: created by the owning code via a [`TaskReporter`],
//! updated as the operation advances, and closed (explicitly or by
//! abandonment) when it concludes. The host observes through the
//! [`TaskEventEmitter`] port injected at reporter construction; this crate
//! contains no transport or UI, only the contract.
//!
//! ```
//! use std::sync::Arc;
//! use taskbeacon_core::{NoopEmitter, TaskKind, TaskOrigin, TaskReporter};
//!
//! let reporter = TaskReporter::new(
//!     TaskOrigin::new("https://example.com"),
//!     Arc::new(NoopEmitter::new()),
//! );
//! let handle = reporter.create("Uploading files…", TaskKind::Determinate)?;
//! handle.update(25.0, Some(120.0))?;
//! handle.update(75.0, Some(30.0))?;
//! handle.close();
//! # Ok::<(), taskbeacon_core::TaskError>(())
//! ```
#![deny(unused_crate_dependencies)]

pub mod ports;
pub mod task;

// Re-export commonly used types for convenience
pub use ports::{NoopEmitter, TaskEventEmitter};
pub use task::{
    CloseReason, ErrorCategory, ProgressHandle, ProgressSnapshot, TaskDescriptor, TaskError,
    TaskEvent, TaskId, TaskKind, TaskOrigin, TaskReporter, TaskResult, TaskState, UpdateCoalescer,
};
