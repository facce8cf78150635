//! Engine module - The concurrent tree walk
//!
//! Provides:
//! - dispatcher: per-directory walk tasks with bounded fan-out
//! - collector: single consumer of match events, owner of the statistics
//! - lifecycle: task tracking that closes the result stream
//! - search: the entry point tying them together
//! - budget, cancel: the concurrency and cancellation primitives
//! - lister, matcher, reporter: directory listing, entry classification and
//!   error reporting seams

pub mod budget;
pub mod cancel;
pub mod collector;
pub mod dispatcher;
pub mod lifecycle;
pub mod lister;
pub mod matcher;
pub mod reporter;
pub mod search;
