//! Update coalescing.
//!
//! A reporter configured with a minimum emit interval hands each of its
//! handles one of these gates. The gate sees every accepted snapshot and
//! decides which are worth a host refresh: values identical to the last
//! delivery never are, and changed values go out at most once per interval.
//! Latest-wins survives suppression because the handle stores the newest
//! snapshot unconditionally and closure always ships the final one.

use std::time::{Duration, Instant};

use super::types::ProgressSnapshot;

/// Decides which accepted snapshots are delivered to the host.
#[derive(Debug)]
pub struct UpdateCoalescer {
    min_interval: Duration,
    last_delivery: Option<(Instant, ProgressSnapshot)>,
}

impl UpdateCoalescer {
    /// Create a gate delivering at most one changed snapshot per
    /// `min_interval`.
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_delivery: None,
        }
    }

    /// Offer the newest accepted snapshot; returns whether the host should
    /// be notified now.
    ///
    /// The first offer is always delivered. A snapshot equal to the last
    /// delivered one is suppressed outright, whatever the clock says - a
    /// repaint with identical values refreshes nothing.
    pub fn offer(&mut self, snapshot: ProgressSnapshot) -> bool {
        let now = Instant::now();
        match self.last_delivery {
            Some((_, delivered)) if delivered == snapshot => false,
            Some((at, _)) if now.duration_since(at) < self.min_interval => false,
            _ => {
                self.last_delivery = Some((now, snapshot));
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percent(progress: f64) -> ProgressSnapshot {
        ProgressSnapshot {
            progress: Some(progress),
            time_remaining: None,
        }
    }

    #[test]
    fn first_snapshot_is_always_delivered() {
        let mut gate = UpdateCoalescer::new(Duration::from_millis(25));
        assert!(gate.offer(percent(5.0)));
    }

    #[test]
    fn changed_snapshots_are_limited_to_one_per_interval() {
        let mut gate = UpdateCoalescer::new(Duration::from_millis(25));
        assert!(gate.offer(percent(5.0)));
        assert!(!gate.offer(percent(6.0)));
        assert!(!gate.offer(percent(7.0)));

        std::thread::sleep(Duration::from_millis(30));
        assert!(gate.offer(percent(8.0)));
    }

    #[test]
    fn unchanged_snapshot_is_suppressed_regardless_of_interval() {
        let mut gate = UpdateCoalescer::new(Duration::ZERO);
        assert!(gate.offer(percent(50.0)));
        assert!(!gate.offer(percent(50.0)));
        assert!(gate.offer(percent(51.0)));
    }

    #[test]
    fn time_remaining_change_alone_counts_as_changed() {
        let mut gate = UpdateCoalescer::new(Duration::ZERO);
        assert!(gate.offer(ProgressSnapshot {
            progress: Some(50.0),
            time_remaining: Some(60.0),
        }));
        assert!(gate.offer(ProgressSnapshot {
            progress: Some(50.0),
            time_remaining: Some(55.0),
        }));
    }
}
