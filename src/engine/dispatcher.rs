//! Directory dispatcher
//!
//! Lists one directory, emits a [`MatchEvent`] per satisfied criterion of each
//! entry, then continues into every subdirectory. A subdirectory runs on a new
//! thread when the budget has a token left and inline otherwise, so the walk
//! never waits for capacity.

use crossbeam_channel::select;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, Scope};
use tracing::{debug, warn};

use crate::core::model::MatchEvent;
use crate::core::paths::join_relative;
use crate::engine::budget::{ConcurrencyBudget, Permit};
use crate::engine::cancel::CancellationSignal;
use crate::engine::lifecycle::TaskHandle;
use crate::engine::lister::{DirItem, DirLister};
use crate::engine::matcher::Matcher;
use crate::engine::reporter::ErrorReporter;

/// A directory waiting to be walked
#[derive(Debug, Clone)]
pub struct DirWork {
    pub path: PathBuf,
    pub relative: String,
    pub depth: usize,
}

impl DirWork {
    pub fn root(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            relative: String::new(),
            depth: 0,
        }
    }

    fn child(&self, item: &DirItem) -> Self {
        Self {
            path: self.path.join(&item.raw_name),
            relative: join_relative(&self.relative, &item.name),
            depth: self.depth + 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct DispatchCounters {
    pub dirs_listed: AtomicU64,
    pub errors: AtomicU64,
    pub tasks_spawned: AtomicU64,
    pub tasks_inline: AtomicU64,
}

/// Shared, read-only walk context handed to every task
pub struct Dispatcher<'a> {
    matcher: &'a Matcher,
    lister: &'a dyn DirLister,
    reporter: &'a dyn ErrorReporter,
    budget: &'a ConcurrencyBudget,
    cancel: &'a CancellationSignal,
    suppress_errors: bool,
    counters: DispatchCounters,
}

type Handoff<'a> = Arc<Mutex<Option<(DirWork, TaskHandle<'a>, Permit<'a>)>>>;

/// A subdirectory left for the current thread
type Deferred<'a> = (DirWork, TaskHandle<'a>);

impl<'a> Dispatcher<'a> {
    pub fn new(
        matcher: &'a Matcher,
        lister: &'a dyn DirLister,
        reporter: &'a dyn ErrorReporter,
        budget: &'a ConcurrencyBudget,
        cancel: &'a CancellationSignal,
        suppress_errors: bool,
    ) -> Self {
        Self {
            matcher,
            lister,
            reporter,
            budget,
            cancel,
            suppress_errors,
            counters: DispatchCounters::default(),
        }
    }

    pub fn counters(&self) -> &DispatchCounters {
        &self.counters
    }

    /// Walk one directory and everything below it.
    ///
    /// Subdirectories that get a budget token run on their own thread. The
    /// rest are kept on an explicit stack and walked by this call, so tree
    /// depth never grows the call stack. `task` is this directory's membership
    /// in the walk; it is released once the directory is finished, unreadable,
    /// or abandoned on cancellation.
    pub fn walk<'scope, 'env>(
        &'scope self,
        scope: &'scope Scope<'scope, 'env>,
        work: DirWork,
        task: TaskHandle<'scope>,
    ) {
        let mut pending = vec![(work, task)];
        while let Some((work, task)) = pending.pop() {
            let inline = self.walk_dir(scope, work, task);
            if self.cancel.is_cancelled() {
                return;
            }
            // reversed so the first subdirectory is popped first
            pending.extend(inline.into_iter().rev());
        }
    }

    /// List one directory and emit its matches.
    ///
    /// Returns the subdirectories the caller has to walk itself.
    fn walk_dir<'scope, 'env>(
        &'scope self,
        scope: &'scope Scope<'scope, 'env>,
        work: DirWork,
        task: TaskHandle<'scope>,
    ) -> Vec<Deferred<'scope>> {
        let items = match self.lister.list(&work.path) {
            Ok(items) => items,
            Err(err) => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                if !self.suppress_errors {
                    self.reporter.report(&work.path, &err);
                }
                return Vec::new();
            }
        };
        self.counters.dirs_listed.fetch_add(1, Ordering::Relaxed);
        debug!(
            path = %work.path.display(),
            depth = work.depth,
            entries = items.len(),
            "listed directory"
        );

        let mut inline = Vec::new();
        for item in items {
            if self.cancel.is_cancelled() {
                return Vec::new();
            }

            let child = work.child(&item);
            for kind in self.matcher.classify(&item) {
                let event = MatchEvent {
                    path: child.path.clone(),
                    relative: child.relative.clone(),
                    is_dir: item.is_dir,
                    kind,
                    depth: child.depth,
                };
                if !self.emit(&task, event) {
                    return Vec::new();
                }
            }

            if item.is_dir {
                inline.extend(self.schedule(scope, child, &task));
            }
        }
        inline
    }

    /// Hand an event to the collector, giving up if the walk is cancelled first
    fn emit(&self, task: &TaskHandle<'_>, event: MatchEvent) -> bool {
        select! {
            send(task.events(), event) -> res => res.is_ok(),
            recv(self.cancel.watch()) -> _ => false,
        }
    }

    /// Start `work` on a new thread if the budget allows, otherwise hand it
    /// back to be walked inline
    fn schedule<'scope, 'env>(
        &'scope self,
        scope: &'scope Scope<'scope, 'env>,
        work: DirWork,
        parent: &TaskHandle<'scope>,
    ) -> Option<Deferred<'scope>> {
        if self.cancel.is_cancelled() {
            return None;
        }

        match self.budget.try_acquire() {
            Some(permit) => self.spawn(scope, work, parent.fork(), permit),
            None => {
                self.counters.tasks_inline.fetch_add(1, Ordering::Relaxed);
                Some((work, parent.fork()))
            }
        }
    }

    fn spawn<'scope, 'env>(
        &'scope self,
        scope: &'scope Scope<'scope, 'env>,
        work: DirWork,
        task: TaskHandle<'scope>,
        permit: Permit<'scope>,
    ) -> Option<Deferred<'scope>> {
        let id = self.counters.tasks_spawned.fetch_add(1, Ordering::Relaxed);
        debug!(path = %work.path.display(), depth = work.depth, task = id, "spawning walk task");

        let handoff: Handoff<'scope> = Arc::new(Mutex::new(Some((work, task, permit))));
        let thread_handoff = Arc::clone(&handoff);

        let spawned = thread::Builder::new()
            .name(format!("dirseek-walk-{}", id))
            .spawn_scoped(scope, move || {
                if let Some((work, task, _permit)) = take(&thread_handoff) {
                    self.walk(scope, work, task);
                }
            });

        match spawned {
            Ok(_) => None,
            Err(err) => {
                warn!("Failed to spawn walk thread, continuing inline: {}", err);
                let (work, task, permit) = take(&handoff)?;
                drop(permit);
                self.counters.tasks_spawned.fetch_sub(1, Ordering::Relaxed);
                self.counters.tasks_inline.fetch_add(1, Ordering::Relaxed);
                Some((work, task))
            }
        }
    }
}

fn take<T>(slot: &Mutex<Option<T>>) -> Option<T> {
    match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{MatchKind, SearchRequest};
    use crate::engine::lifecycle::TaskTracker;
    use crate::engine::lister::FsLister;
    use crate::engine::reporter::LogReporter;
    use crossbeam_channel::unbounded;
    use std::fs;
    use tempfile::tempdir;

    fn run_walk(request: &SearchRequest, workers: usize) -> (Vec<MatchEvent>, u64) {
        let matcher = Matcher::from_request(request).unwrap();
        let budget = ConcurrencyBudget::new(workers);
        let cancel = CancellationSignal::new();
        let tracker = TaskTracker::new();
        let dispatcher =
            Dispatcher::new(&matcher, &FsLister, &LogReporter, &budget, &cancel, true);
        let (tx, rx) = unbounded();

        thread::scope(|scope| {
            let root = tracker.register(tx);
            dispatcher.walk(scope, DirWork::root(&request.root), root);
        });

        let dirs = dispatcher.counters().dirs_listed.load(Ordering::Relaxed);
        (rx.try_iter().collect(), dirs)
    }

    #[test]
    fn test_walk_emits_relative_paths_and_depth() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/b/target.txt"), "x").unwrap();

        let request = SearchRequest::new(temp.path()).file_name("target.txt");
        let (events, dirs) = run_walk(&request, 4);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, MatchKind::File);
        assert_eq!(events[0].relative, "a/b/target.txt");
        assert_eq!(events[0].path, temp.path().join("a/b/target.txt"));
        assert_eq!(events[0].depth, 3);
        assert!(!events[0].is_dir);
        assert_eq!(dirs, 3);
    }

    #[test]
    fn test_inline_walk_keeps_listing_order() {
        let temp = tempdir().unwrap();
        for name in ["c.log", "a.log", "b.log"] {
            fs::write(temp.path().join(name), "x").unwrap();
        }

        let request = SearchRequest::new(temp.path()).pattern(r"\.log$");
        let (events, _) = run_walk(&request, 0);

        let names: Vec<_> = events.iter().map(|e| e.relative.as_str()).collect();
        assert_eq!(names, vec!["a.log", "b.log", "c.log"]);
    }

    #[test]
    fn test_regex_and_name_events_for_one_entry() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("target.txt"), "x").unwrap();

        let request = SearchRequest::new(temp.path())
            .file_name("target.txt")
            .pattern("^target");
        let (events, _) = run_walk(&request, 0);

        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![MatchKind::Regex, MatchKind::File]);
    }

    #[test]
    fn test_cancelled_walk_lists_nothing_further() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();

        let request = SearchRequest::new(temp.path()).dir_name("b");
        let matcher = Matcher::from_request(&request).unwrap();
        let budget = ConcurrencyBudget::new(2);
        let cancel = CancellationSignal::new();
        let tracker = TaskTracker::new();
        let dispatcher =
            Dispatcher::new(&matcher, &FsLister, &LogReporter, &budget, &cancel, true);
        let (tx, rx) = unbounded();
        cancel.cancel();

        thread::scope(|scope| {
            let root = tracker.register(tx);
            dispatcher.walk(scope, DirWork::root(temp.path()), root);
        });

        assert_eq!(rx.try_iter().count(), 0);
        assert_eq!(dispatcher.counters().dirs_listed.load(Ordering::Relaxed), 1);
        assert_eq!(tracker.outstanding(), 0);
    }
}
