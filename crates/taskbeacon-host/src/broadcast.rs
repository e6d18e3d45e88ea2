//! Broadcast fan-out for task events.
//!
//! Decouples the host's rendering schedule from the owner's call sites: the
//! handle side emits synchronously, async observers consume from a bounded
//! broadcast channel on their own time. Slow observers may miss events if
//! the buffer overflows; the registry remains the source of truth for the
//! latest snapshot.

use std::sync::Arc;

use taskbeacon_core::{TaskEvent, TaskEventEmitter};
use tokio::sync::broadcast;

/// Broadcast-channel emitter for async host observers.
///
/// Multiple observers can subscribe and receive the same events
/// simultaneously. Emitting with no subscribers attached is fine; the event
/// is simply dropped.
#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<TaskEvent>,
}

impl EventBroadcaster {
    /// Create a broadcaster with the specified channel capacity.
    ///
    /// `capacity` bounds how many events can be buffered per lagging
    /// subscriber before it starts missing events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a broadcaster with default capacity (256 events).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(256)
    }

    /// Subscribe a new observer.
    ///
    /// The receiver sees every event emitted after this call, in emission
    /// order. Wrap it in `tokio_stream::wrappers::BroadcastStream` for
    /// stream-based consumption.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.sender.subscribe()
    }

    /// Number of currently attached observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl TaskEventEmitter for EventBroadcaster {
    fn emit(&self, event: TaskEvent) {
        // No subscribers is fine; drop the event.
        let _ = self.sender.send(event);
    }

    fn clone_box(&self) -> Box<dyn TaskEventEmitter> {
        Box::new(self.clone())
    }
}

/// Composite emitter forwarding each event to several observers.
///
/// The usual wiring is a [`TaskRegistry`](crate::TaskRegistry) for queryable
/// state plus an [`EventBroadcaster`] for push delivery. Forwarding happens
/// in order, synchronously, so per-task ordering is preserved for every
/// observer.
#[derive(Clone, Default)]
pub struct FanoutEmitter {
    emitters: Vec<Arc<dyn TaskEventEmitter>>,
}

impl FanoutEmitter {
    /// Create an empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer to the fan-out.
    #[must_use]
    pub fn with(mut self, emitter: Arc<dyn TaskEventEmitter>) -> Self {
        self.emitters.push(emitter);
        self
    }
}

impl TaskEventEmitter for FanoutEmitter {
    fn emit(&self, event: TaskEvent) {
        for emitter in &self.emitters {
            emitter.emit(event.clone());
        }
    }

    fn clone_box(&self) -> Box<dyn TaskEventEmitter> {
        Box::new(self.clone())
    }
}

impl std::fmt::Debug for FanoutEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutEmitter")
            .field("observers", &self.emitters.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskbeacon_core::{ProgressSnapshot, TaskId};
    use tokio_test::assert_ok;

    fn progress_event(value: f64) -> TaskEvent {
        TaskEvent::progress(
            TaskId::new(),
            ProgressSnapshot {
                progress: Some(value),
                time_remaining: None,
            },
        )
    }

    #[tokio::test]
    async fn subscribers_receive_events_in_emission_order() {
        let broadcaster = EventBroadcaster::with_defaults();
        let mut receiver = broadcaster.subscribe();

        let id = TaskId::new();
        for value in [10.0, 50.0, 90.0] {
            broadcaster.emit(TaskEvent::progress(
                id,
                ProgressSnapshot {
                    progress: Some(value),
                    time_remaining: None,
                },
            ));
        }

        let mut observed = Vec::new();
        for _ in 0..3 {
            let event = tokio_test::assert_ok!(receiver.recv().await);
            if let TaskEvent::TaskProgress { progress, .. } = event {
                observed.push(progress);
            }
        }
        assert_eq!(observed, vec![Some(10.0), Some(50.0), Some(90.0)]);
    }

    #[tokio::test]
    async fn multiple_subscribers_see_the_same_events() {
        let broadcaster = EventBroadcaster::new(16);
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 2);

        broadcaster.emit(progress_event(42.0));

        let a = tokio_test::assert_ok!(first.recv().await);
        let b = tokio_test::assert_ok!(second.recv().await);
        assert_eq!(a, b);
    }

    #[test]
    fn emitting_without_subscribers_does_not_fail() {
        let broadcaster = EventBroadcaster::new(4);
        broadcaster.emit(progress_event(1.0));
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn events_serialize_for_wire_delivery() {
        let broadcaster = EventBroadcaster::with_defaults();
        let mut receiver = broadcaster.subscribe();

        broadcaster.emit(progress_event(75.0));

        let event = tokio_test::assert_ok!(receiver.recv().await);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"task_progress\""));
        assert!(json.contains("\"progress\":75.0"));
    }

    #[tokio::test]
    async fn fanout_forwards_to_every_observer() {
        let broadcaster_a = EventBroadcaster::new(8);
        let broadcaster_b = EventBroadcaster::new(8);
        let mut recv_a = broadcaster_a.subscribe();
        let mut recv_b = broadcaster_b.subscribe();

        let fanout = FanoutEmitter::new()
            .with(Arc::new(broadcaster_a))
            .with(Arc::new(broadcaster_b));
        fanout.emit(progress_event(33.0));

        let a = tokio_test::assert_ok!(recv_a.recv().await);
        let b = tokio_test::assert_ok!(recv_b.recv().await);
        assert_eq!(a, b);
    }
}
