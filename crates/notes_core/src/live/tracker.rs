//! Table invalidation tracking.
//!
//! Writers bump a version counter after their statement commits; observers
//! hold a `watch` receiver and re-run their query whenever the version moves.
//! Bursts of writes coalesce into one wake-up, and a woken observer always
//! reads the latest committed state.

use log::debug;
use tokio::sync::watch;

#[derive(Debug)]
pub struct InvalidationTracker {
    version: watch::Sender<u64>,
}

impl Default for InvalidationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl InvalidationTracker {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self { version }
    }

    /// Marks `table` as changed. Must only be called after the write committed.
    pub fn notify(&self, table: &'static str) {
        self.version.send_modify(|version| *version = version.wrapping_add(1));
        debug!(
            "event=table_invalidated module=live table={table} version={} observers={}",
            self.version(),
            self.version.receiver_count()
        );
    }

    /// Current change counter.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::InvalidationTracker;

    #[test]
    fn notify_bumps_version_without_receivers() {
        let tracker = InvalidationTracker::new();
        tracker.notify("notes");
        tracker.notify("notes");
        assert_eq!(tracker.version(), 2);
    }

    #[tokio::test]
    async fn subscriber_wakes_on_notify() {
        let tracker = InvalidationTracker::new();
        let mut changes = tracker.subscribe();
        tracker.notify("notes");
        changes.changed().await.unwrap();
        assert_eq!(*changes.borrow_and_update(), 1);
    }
}
