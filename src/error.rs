//! Error types for dirseek
//!
//! Only configuration problems surface from a search. Per-directory read
//! failures are handled inside the walk and never abort it.

use thiserror::Error;

/// Errors returned by [`crate::search`] and [`crate::Searcher::run`]
#[derive(Error, Debug)]
pub enum SearchError {
    /// The regex pattern failed to compile
    #[error("invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
