//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Search data model (requests, match events, statistics)
//! - Rendering of matches and summaries for the console
//! - Path normalization utilities

pub mod model;
pub mod paths;
pub mod render;
