//! Search data model
//!
//! A search is described by an immutable [`SearchRequest`], produces a stream of
//! [`MatchEvent`]s while it runs, and ends with a [`SearchOutcome`].

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default concurrency budget for a search
pub const DEFAULT_WORKERS: usize = 10;

/// Everything a single search needs to know before it starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Directory the walk starts from
    pub root: PathBuf,

    /// Exact file name to look for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Exact directory name to look for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir_name: Option<String>,

    /// Regex matched against every entry name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Stop walking as soon as the requested targets have been seen
    pub return_early: bool,

    /// Maximum number of concurrently spawned walk tasks
    pub max_workers: usize,

    /// Do not report directories that cannot be read
    pub suppress_errors: bool,
}

impl SearchRequest {
    /// Create a request rooted at `root` with no targets
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_name: None,
            dir_name: None,
            pattern: None,
            return_early: false,
            max_workers: DEFAULT_WORKERS,
            suppress_errors: false,
        }
    }

    /// Look for files with exactly this name (empty means none)
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = non_empty(name.into());
        self
    }

    /// Look for directories with exactly this name (empty means none)
    pub fn dir_name(mut self, name: impl Into<String>) -> Self {
        self.dir_name = non_empty(name.into());
        self
    }

    /// Match entry names against this regex (empty means none)
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = non_empty(pattern.into());
        self
    }

    pub fn return_early(mut self, yes: bool) -> Self {
        self.return_early = yes;
        self
    }

    pub fn max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    pub fn suppress_errors(mut self, yes: bool) -> Self {
        self.suppress_errors = yes;
        self
    }

    /// Whether any of file name, directory name or pattern was requested
    pub fn has_target(&self) -> bool {
        self.file_name.is_some() || self.dir_name.is_some() || self.pattern.is_some()
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Why an entry was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    File,
    Dir,
    Regex,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::File => "file",
            MatchKind::Dir => "dir",
            MatchKind::Regex => "regex",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single match found during the walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchEvent {
    /// Root joined with the entry's location
    pub path: PathBuf,

    /// Location relative to the root, using '/' as separator
    pub relative: String,

    pub is_dir: bool,

    pub kind: MatchKind,

    /// Depth below the root (root entries are depth 1)
    pub depth: usize,
}

/// Match counters maintained by the collector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub regex_matches: usize,
    pub files_found: usize,
    pub dirs_found: usize,
}

impl SearchStats {
    pub fn total(&self) -> usize {
        self.regex_matches + self.files_found + self.dirs_found
    }
}

/// Walk-level counters, for diagnostics only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalkMetrics {
    /// Directories successfully listed
    pub dirs_listed: u64,

    /// Directories that could not be listed
    pub errors: u64,

    /// Subdirectories handed to a new thread
    pub tasks_spawned: u64,

    /// Subdirectories walked inline because the budget was exhausted
    pub tasks_inline: u64,

    /// Highest number of spawned tasks running at the same time
    pub peak_workers: usize,

    /// Whether the walk was stopped early
    pub cancelled: bool,
}

/// Final result of a search
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub file_found: bool,
    pub dir_found: bool,
    pub stats: SearchStats,
    pub metrics: WalkMetrics,

    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}
