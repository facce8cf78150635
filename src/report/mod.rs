//! Report module - Where accepted matches end up
//!
//! Provides:
//! - console: live match lines and the final summary on stdout
//! - logfile: timestamped match log with a statistics block

pub mod console;
pub mod logfile;
