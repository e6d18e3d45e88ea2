//! Reference host-side adapters for taskbeacon.
//!
//! The core defines what a handle must be able to tell the host; this crate
//! provides the host half for in-process embedding:
//!
//! - [`TaskRegistry`] - queryable table of observed tasks with the retention
//!   split between explicit closure and abandonment
//! - [`EventBroadcaster`] - bounded broadcast fan-out for async observers
//! - [`FanoutEmitter`] - wires several observers behind one emitter
//!   capability
//!
//! A real user agent replaces these with its own UI plumbing; the contract it
//! must satisfy is the same [`TaskEventEmitter`](taskbeacon_core::TaskEventEmitter)
//! port.

pub mod broadcast;
pub mod registry;

pub use broadcast::{EventBroadcaster, FanoutEmitter};
pub use registry::{ObservedTask, TaskRegistry};
