//! Task completion tracking
//!
//! Every walk task owns a [`TaskHandle`]. A handle carries one clone of the
//! result-stream sender and counts itself in the tracker while alive. The
//! result stream closes when the last handle is dropped, which is exactly the
//! moment no task can emit anymore.

use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::core::model::MatchEvent;

#[derive(Debug, Default)]
pub struct TaskTracker {
    in_flight: AtomicUsize,
    started: AtomicU64,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the root task, giving it the only original sender
    pub fn register(&self, events: Sender<MatchEvent>) -> TaskHandle<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::Relaxed);
        TaskHandle {
            events,
            tracker: self,
        }
    }

    /// Tasks registered but not yet finished
    pub fn outstanding(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Tasks registered since the tracker was created
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }
}

/// Membership of one task in the walk
#[derive(Debug)]
pub struct TaskHandle<'a> {
    events: Sender<MatchEvent>,
    tracker: &'a TaskTracker,
}

impl<'a> TaskHandle<'a> {
    /// Register a child task
    pub fn fork(&self) -> TaskHandle<'a> {
        self.tracker.register(self.events.clone())
    }

    pub fn events(&self) -> &Sender<MatchEvent> {
        &self.events
    }
}

impl Drop for TaskHandle<'_> {
    fn drop(&mut self) {
        // the sender field is dropped after this, so the count is already
        // down when a receiver observes the disconnect
        self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{unbounded, RecvTimeoutError};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_stream_closes_after_last_handle() {
        let tracker = TaskTracker::new();
        let (tx, rx) = unbounded();

        let root = tracker.register(tx);
        let child = root.fork();
        let grandchild = child.fork();
        assert_eq!(tracker.outstanding(), 3);
        assert_eq!(tracker.started(), 3);

        drop(root);
        drop(child);
        assert_eq!(
            rx.recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Timeout)
        );

        drop(grandchild);
        assert_eq!(tracker.outstanding(), 0);
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_outstanding_is_zero_once_stream_closes() {
        let tracker = TaskTracker::new();
        let (tx, rx) = unbounded::<MatchEvent>();

        thread::scope(|s| {
            let root = tracker.register(tx);
            for _ in 0..8 {
                let handle = root.fork();
                s.spawn(move || {
                    thread::sleep(Duration::from_millis(5));
                    drop(handle);
                });
            }
            drop(root);

            for _ in rx.iter() {}
            assert_eq!(tracker.outstanding(), 0);
        });

        assert_eq!(tracker.started(), 9);
    }
}
