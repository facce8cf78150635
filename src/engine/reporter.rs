//! Traversal error reporting
//!
//! An unreadable directory never fails the search. Unless errors are
//! suppressed, the walk hands the failure to an [`ErrorReporter`] and moves on
//! with the rest of the tree.

use std::io;
use std::path::Path;
use tracing::warn;

/// Receives one notification per directory that could not be listed
pub trait ErrorReporter: Sync {
    fn report(&self, dir: &Path, err: &io::Error);
}

/// Reports traversal errors as `tracing` warnings
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, dir: &Path, err: &io::Error) {
        warn!("Error reading directory {}: {}", dir.display(), err);
    }
}
