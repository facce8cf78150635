//! dirseek - Concurrent directory-tree search
//!
//! dirseek walks a directory tree looking for entries with an exact file name,
//! an exact directory name, and/or a name matching a regex:
//! - Subdirectories are walked on up to `max_workers` extra threads, and
//!   inline once that budget is used up
//! - Matches from every thread flow to a single collector that keeps the
//!   statistics
//! - With `return_early`, the collector stops the walk once the requested
//!   targets have been seen
//!
//! ```no_run
//! use dirseek::{search, SearchRequest};
//!
//! let request = SearchRequest::new(".").file_name("Cargo.toml");
//! let outcome = search(&request)?;
//! println!("found {} file(s)", outcome.stats.files_found);
//! # Ok::<(), dirseek::SearchError>(())
//! ```

pub mod cli;
pub mod core;
pub mod engine;
pub mod error;
pub mod report;

pub use crate::core::model::{
    MatchEvent, MatchKind, SearchOutcome, SearchRequest, SearchStats, WalkMetrics,
};
pub use crate::engine::collector::{MatchSink, NullSink};
pub use crate::engine::lister::{DirItem, DirLister, FsLister};
pub use crate::engine::reporter::{ErrorReporter, LogReporter};
pub use crate::engine::search::{search, Searcher};
pub use crate::error::SearchError;
