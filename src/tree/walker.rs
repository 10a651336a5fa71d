//! Breadth-first walker over a read-only source tree

use crate::error::SourceError;
use crate::source::{SourceEntry, SourceTree};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Counters collected during a walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Directories whose children were listed, including the start directory
    pub directories_listed: usize,
    /// Entries handed to the visitor
    pub entries_visited: usize,
}

/// An entry together with the directory that contains it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub parent: PathBuf,
    pub entry: SourceEntry,
}

impl WalkEntry {
    /// Root-relative path of the entry itself
    pub fn path(&self) -> PathBuf {
        self.parent.join(self.entry.name())
    }
}

/// Iterative breadth-first walker.
///
/// Directories are expanded from a FIFO queue, never by recursion, so stack
/// depth stays constant however deep the source is. A directory is queued
/// exactly once, at the moment it is first seen as an entry, and listed
/// exactly once.
pub struct Walker<'a, S: SourceTree + ?Sized> {
    source: &'a S,
    start: PathBuf,
}

impl<'a, S: SourceTree + ?Sized> Walker<'a, S> {
    /// Walker starting at the root of `source`
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            start: PathBuf::new(),
        }
    }

    /// Walker starting at `start`, a directory inside `source`
    pub fn from_path(source: &'a S, start: impl Into<PathBuf>) -> Self {
        Self {
            source,
            start: start.into(),
        }
    }

    /// Visit every entry below the start directory.
    ///
    /// `visit` receives the entry's immediate parent directory and the entry.
    /// The first error, whether from listing a directory at any depth or from
    /// the visitor, stops the walk and is returned.
    pub fn walk<F, E>(&self, mut visit: F) -> Result<WalkSummary, E>
    where
        F: FnMut(&Path, &SourceEntry) -> Result<(), E>,
        E: From<SourceError>,
    {
        let mut summary = WalkSummary::default();
        let mut pending: VecDeque<PathBuf> = VecDeque::new();
        pending.push_back(self.start.clone());

        while let Some(dir) = pending.pop_front() {
            let children = self.source.read_dir(&dir)?;
            summary.directories_listed += 1;
            trace!(dir = %dir.display(), children = children.len(), "Listed source directory");

            for child in &children {
                if child.is_dir() {
                    pending.push_back(dir.join(child.name()));
                }
                visit(&dir, child)?;
                summary.entries_visited += 1;
            }
        }

        debug!(
            start = %self.start.display(),
            directories = summary.directories_listed,
            entries = summary.entries_visited,
            "Walk complete"
        );
        Ok(summary)
    }

    /// Collect every entry in visitation order
    pub fn entries(&self) -> Result<Vec<WalkEntry>, SourceError> {
        let mut entries = Vec::new();
        self.walk(|parent, entry| {
            entries.push(WalkEntry {
                parent: parent.to_path_buf(),
                entry: entry.clone(),
            });
            Ok::<(), SourceError>(())
        })?;
        Ok(entries)
    }
}

/// Walk `source` from `start`, calling `visit` for every entry
pub fn walk<S, F, E>(source: &S, start: impl Into<PathBuf>, visit: F) -> Result<WalkSummary, E>
where
    S: SourceTree + ?Sized,
    F: FnMut(&Path, &SourceEntry) -> Result<(), E>,
    E: From<SourceError>,
{
    Walker::from_path(source, start).walk(visit)
}
