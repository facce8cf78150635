//! Directory listing primitive
//!
//! The walk only needs the name of each entry and whether it is a directory.
//! Names are kept twice: the raw OS name to build child paths, and a lossy
//! UTF-8 copy for matching and display.
//! [`DirLister`] keeps that seam open so tests can drive the walk with an
//! in-memory tree or inject read failures.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirItem {
    pub name: String,
    pub raw_name: OsString,
    pub is_dir: bool,
}

impl DirItem {
    pub fn new(raw_name: OsString, is_dir: bool) -> Self {
        Self {
            name: raw_name.to_string_lossy().into_owned(),
            raw_name,
            is_dir,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(OsString::from(name.into()), false)
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self::new(OsString::from(name.into()), true)
    }
}

/// Lists the immediate entries of one directory
pub trait DirLister: Sync {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirItem>>;
}

/// Lists real directories with `std::fs::read_dir`.
///
/// Entries are sorted by name. Symlinks are never reported as directories,
/// so the walk does not follow them.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl DirLister for FsLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirItem>> {
        let mut items = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            items.push(DirItem::new(entry.file_name(), is_dir));
        }
        items.sort_by(|a, b| a.raw_name.cmp(&b.raw_name));
        Ok(items)
    }
}
