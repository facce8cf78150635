//! One-shot cancellation broadcast
//!
//! The signal is a flag plus a channel whose only sender is dropped when the
//! signal fires. Dropping the sender disconnects every receiver at once, so a
//! task blocked in `select!` on a send wakes up as soon as the walk is
//! cancelled.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug)]
pub struct CancellationSignal {
    fired: AtomicBool,
    trigger: Mutex<Option<Sender<()>>>,
    watch: Receiver<()>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        let (trigger, watch) = bounded(0);
        Self {
            fired: AtomicBool::new(false),
            trigger: Mutex::new(Some(trigger)),
            watch,
        }
    }

    /// Fire the signal.
    ///
    /// Returns `true` only for the call that actually fired it.
    pub fn cancel(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        let trigger = match self.trigger.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        drop(trigger);
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Receiver that becomes ready (disconnected) once the signal fires.
    ///
    /// Nothing is ever sent on it.
    pub fn watch(&self) -> &Receiver<()> {
        &self.watch
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::new()
    }
}
