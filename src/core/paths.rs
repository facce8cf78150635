//! Path utilities
//!
//! Relative paths reported by the walk always use '/' as separator, whatever
//! the platform.

/// Append an entry name to an already normalized relative location
pub fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}
