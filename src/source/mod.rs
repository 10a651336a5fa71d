//! Read-only hierarchical sources
//!
//! A source tree is anything that can list the immediate children of a
//! directory and open a file for sequential reading. Paths handed to a source
//! are relative to its root; the empty path and `.` both name the root.

mod dir;
mod memory;

pub use dir::DirTree;
pub use memory::MemoryTree;

use crate::error::SourceError;
use std::io::Read;
use std::path::{Component, Path};

/// Kind of a source entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// A single child of a source directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceEntry {
    name: String,
    kind: EntryKind,
}

impl SourceEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    /// Name of the entry, unique among its siblings
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Read-only tree of files and directories
pub trait SourceTree {
    /// List the immediate children of `dir`.
    ///
    /// Implementations must return children in a deterministic order so that
    /// traversal order is reproducible.
    fn read_dir(&self, dir: &Path) -> Result<Vec<SourceEntry>, SourceError>;

    /// Open the file at `path` for sequential reading
    fn open(&self, path: &Path) -> Result<Box<dyn Read + '_>, SourceError>;
}

impl<T: SourceTree + ?Sized> SourceTree for &T {
    fn read_dir(&self, dir: &Path) -> Result<Vec<SourceEntry>, SourceError> {
        (**self).read_dir(dir)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read + '_>, SourceError> {
        (**self).open(path)
    }
}

/// Normalize a root-relative path into a `/`-separated key.
///
/// `.` components are dropped. Absolute paths and `..` components cannot
/// name anything inside a source and are reported as not found.
pub(crate) fn normalize_key(path: &Path) -> Result<String, SourceError> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(name) => match name.to_str() {
                Some(name) => segments.push(name),
                None => return Err(SourceError::NotFound(path.to_path_buf())),
            },
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(SourceError::NotFound(path.to_path_buf()));
            }
        }
    }
    Ok(segments.join("/"))
}
