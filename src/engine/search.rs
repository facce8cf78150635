//! Search coordinator
//!
//! Wires the dispatcher tasks to the collector: the root task runs on its own
//! thread, the calling thread drains the result stream, and the walk is over
//! once the stream closes.

use crossbeam_channel::bounded;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

use crate::core::model::{MatchEvent, SearchOutcome, SearchRequest, WalkMetrics};
use crate::engine::budget::ConcurrencyBudget;
use crate::engine::cancel::CancellationSignal;
use crate::engine::collector::{Collector, MatchSink, NullSink, StopRule};
use crate::engine::dispatcher::{DirWork, Dispatcher};
use crate::engine::lifecycle::TaskTracker;
use crate::engine::lister::{DirLister, FsLister};
use crate::engine::matcher::Matcher;
use crate::engine::reporter::{ErrorReporter, LogReporter};
use crate::error::Result;

/// Search the filesystem with the default collaborators
pub fn search(request: &SearchRequest) -> Result<SearchOutcome> {
    Searcher::new(request).run(&mut NullSink)
}

/// A search with explicit collaborators
pub struct Searcher<'a> {
    request: &'a SearchRequest,
    lister: &'a dyn DirLister,
    reporter: &'a dyn ErrorReporter,
}

impl<'a> Searcher<'a> {
    pub fn new(request: &'a SearchRequest) -> Self {
        Self {
            request,
            lister: &FsLister,
            reporter: &LogReporter,
        }
    }

    /// Use `lister` instead of reading the real filesystem
    pub fn lister(mut self, lister: &'a dyn DirLister) -> Self {
        self.lister = lister;
        self
    }

    /// Send unreadable-directory notifications to `reporter`
    pub fn reporter(mut self, reporter: &'a dyn ErrorReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Check the request without reading any directory
    pub fn validate(&self) -> Result<()> {
        Matcher::from_request(self.request).map(|_| ())
    }

    /// Run the walk, passing every accepted match to `sink`.
    ///
    /// Fails only if the regex pattern does not compile, before any directory
    /// is read.
    pub fn run(&self, sink: &mut dyn MatchSink) -> Result<SearchOutcome> {
        let request = self.request;
        let matcher = Matcher::from_request(request)?;
        let start = Instant::now();

        let budget = ConcurrencyBudget::new(request.max_workers);
        let cancel = CancellationSignal::new();
        let tracker = TaskTracker::new();
        let dispatcher = Dispatcher::new(
            &matcher,
            self.lister,
            self.reporter,
            &budget,
            &cancel,
            request.suppress_errors,
        );
        let mut collector = Collector::new(StopRule::for_request(request), &cancel);
        let (events_tx, events_rx) = bounded::<MatchEvent>(0);

        debug!(
            root = %request.root.display(),
            workers = budget.capacity(),
            return_early = request.return_early,
            "starting search"
        );

        thread::scope(|scope| {
            let root_task = tracker.register(events_tx);
            let root = DirWork::root(&request.root);
            let dispatcher = &dispatcher;
            scope.spawn(move || dispatcher.walk(scope, root, root_task));

            collector.drain(&events_rx, sink);
            debug_assert_eq!(tracker.outstanding(), 0);
        });

        let counters = dispatcher.counters();
        let metrics = WalkMetrics {
            dirs_listed: counters.dirs_listed.load(Ordering::Relaxed),
            errors: counters.errors.load(Ordering::Relaxed),
            tasks_spawned: counters.tasks_spawned.load(Ordering::Relaxed),
            tasks_inline: counters.tasks_inline.load(Ordering::Relaxed),
            peak_workers: budget.peak(),
            cancelled: cancel.is_cancelled(),
        };
        let elapsed = start.elapsed();

        info!(
            dirs = metrics.dirs_listed,
            errors = metrics.errors,
            tasks = tracker.started(),
            peak_workers = metrics.peak_workers,
            cancelled = metrics.cancelled,
            elapsed_ms = elapsed.as_millis() as u64,
            "search finished"
        );

        Ok(SearchOutcome {
            file_found: collector.file_found(),
            dir_found: collector.dir_found(),
            stats: collector.stats(),
            metrics,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_search_counts_all_matches() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::create_dir_all(temp.path().join("a/c")).unwrap();
        fs::write(temp.path().join("a/b/target.txt"), "x").unwrap();
        fs::write(temp.path().join("a/c/target.txt"), "x").unwrap();

        let request = SearchRequest::new(temp.path()).file_name("target.txt");
        let outcome = search(&request).unwrap();

        assert!(outcome.file_found);
        assert!(!outcome.dir_found);
        assert_eq!(outcome.stats.files_found, 2);
        assert_eq!(outcome.metrics.dirs_listed, 4);
        assert!(!outcome.metrics.cancelled);
    }

    #[test]
    fn test_search_rejects_bad_pattern() {
        let temp = tempdir().unwrap();
        let request = SearchRequest::new(temp.path()).pattern("[invalid");
        let err = search(&request).unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern { .. }));
    }

    #[test]
    fn test_validate_checks_pattern_only() {
        let missing = SearchRequest::new("/no/such/root").pattern("^ok$");
        assert!(Searcher::new(&missing).validate().is_ok());

        let invalid = SearchRequest::new("/no/such/root").pattern("(unclosed");
        let err = Searcher::new(&invalid).validate().unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern { .. }));
    }

    #[test]
    fn test_search_missing_root_is_not_fatal() {
        let temp = tempdir().unwrap();
        let request = SearchRequest::new(temp.path().join("missing"))
            .file_name("x")
            .suppress_errors(true);
        let outcome = search(&request).unwrap();

        assert!(!outcome.file_found);
        assert_eq!(outcome.metrics.errors, 1);
        assert_eq!(outcome.metrics.dirs_listed, 0);
    }

    #[test]
    fn test_sink_sees_every_counted_match() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("logs/old")).unwrap();
        fs::write(temp.path().join("logs/a.log"), "x").unwrap();
        fs::write(temp.path().join("logs/old/b.log"), "x").unwrap();

        let request = SearchRequest::new(temp.path()).pattern(r"\.log$");
        let mut seen: Vec<MatchEvent> = Vec::new();
        let outcome = Searcher::new(&request).run(&mut seen).unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(outcome.stats.regex_matches, 2);
        assert!(outcome.file_found);
    }
}
