//! Concurrency budget
//!
//! A fixed number of tokens shared by every walk task. A task that wants to
//! hand a subdirectory to a new thread must hold a token for as long as that
//! thread runs. Acquisition never blocks: when no token is left the caller
//! walks the subdirectory itself.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Lock-free counting semaphore with a non-blocking acquire
#[derive(Debug)]
pub struct ConcurrencyBudget {
    capacity: usize,
    in_use: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyBudget {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            in_use: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Take one token if any is left
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        let mut current = self.in_use.load(Ordering::Relaxed);
        loop {
            if current >= self.capacity {
                return None;
            }
            match self.in_use.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    self.peak.fetch_max(current + 1, Ordering::Relaxed);
                    return Some(Permit { budget: self });
                }
                Err(actual) => current = actual,
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tokens currently held
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Acquire)
    }

    /// Highest number of tokens ever held at once
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }
}

/// A held token, returned to the budget on drop
#[derive(Debug)]
pub struct Permit<'a> {
    budget: &'a ConcurrencyBudget,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.budget.in_use.fetch_sub(1, Ordering::AcqRel);
    }
}
