//! In-memory source tree built from a flat list of file paths

use super::{normalize_key, SourceEntry, SourceTree};
use crate::error::SourceError;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Read-only tree held entirely in memory.
///
/// Files are stored flat, keyed by their `/`-separated path; directories are
/// implied by the files beneath them. Directories with no files can be added
/// explicitly. Listings are sorted by name.
///
/// ```
/// use unfurl::source::MemoryTree;
///
/// static ASSETS: &[(&str, &[u8])] = &[
///     ("web/index.html", b"<html></html>"),
///     ("web/css/site.css", b"body {}"),
/// ];
///
/// let tree = MemoryTree::from_static(ASSETS).unwrap();
/// assert!(tree.contains_file("web/css/site.css"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    files: BTreeMap<String, Cow<'static, [u8]>>,
    dirs: BTreeSet<String>,
}

fn parent_key(key: &str) -> &str {
    key.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

fn leaf_name(key: &str) -> &str {
    key.rsplit_once('/').map(|(_, name)| name).unwrap_or(key)
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a static table such as one filled with `include_bytes!`
    pub fn from_static(
        entries: &'static [(&'static str, &'static [u8])],
    ) -> Result<Self, SourceError> {
        let mut tree = Self::new();
        for (path, content) in entries {
            tree.insert_file(path, Cow::Borrowed(*content))?;
        }
        Ok(tree)
    }

    /// Build a tree from owned `(path, bytes)` pairs
    pub fn from_entries<I, P, C>(entries: I) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<Path>,
        C: Into<Vec<u8>>,
    {
        let mut tree = Self::new();
        for (path, content) in entries {
            tree.insert_file(path, Cow::Owned(content.into()))?;
        }
        Ok(tree)
    }

    /// Add a file, implicitly adding every ancestor directory
    pub fn insert_file(
        &mut self,
        path: impl AsRef<Path>,
        content: impl Into<Cow<'static, [u8]>>,
    ) -> Result<&mut Self, SourceError> {
        let path = path.as_ref();
        let key = normalize_key(path)?;
        if key.is_empty() || self.dirs.contains(&key) {
            return Err(SourceError::NotAFile(path.to_path_buf()));
        }
        self.insert_ancestors(&key, path)?;
        self.files.insert(key, content.into());
        Ok(self)
    }

    /// Add a directory (and its ancestors), which may stay empty
    pub fn insert_dir(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, SourceError> {
        let path = path.as_ref();
        let key = normalize_key(path)?;
        if key.is_empty() {
            return Ok(self);
        }
        if self.files.contains_key(&key) {
            return Err(SourceError::NotADirectory(path.to_path_buf()));
        }
        self.insert_ancestors(&key, path)?;
        self.dirs.insert(key);
        Ok(self)
    }

    fn insert_ancestors(&mut self, key: &str, path: &Path) -> Result<(), SourceError> {
        let mut parent = parent_key(key);
        while !parent.is_empty() {
            if self.files.contains_key(parent) {
                return Err(SourceError::NotADirectory(PathBuf::from(parent)));
            }
            if !self.dirs.insert(parent.to_string()) {
                break;
            }
            parent = parent_key(parent);
        }
        tracing::trace!(path = %path.display(), "Registered in-memory entry");
        Ok(())
    }

    pub fn contains_file(&self, path: impl AsRef<Path>) -> bool {
        normalize_key(path.as_ref())
            .map(|key| self.files.contains_key(&key))
            .unwrap_or(false)
    }

    pub fn contains_dir(&self, path: impl AsRef<Path>) -> bool {
        normalize_key(path.as_ref())
            .map(|key| key.is_empty() || self.dirs.contains(&key))
            .unwrap_or(false)
    }

    /// Number of files in the tree
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of directories in the tree, excluding the root
    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    /// Iterate file paths and contents in sorted path order
    pub fn files(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(k, v)| (k.as_str(), &**v))
    }
}

impl SourceTree for MemoryTree {
    fn read_dir(&self, dir: &Path) -> Result<Vec<SourceEntry>, SourceError> {
        let key = normalize_key(dir)?;
        if !key.is_empty() && !self.dirs.contains(&key) {
            if self.files.contains_key(&key) {
                return Err(SourceError::NotADirectory(dir.to_path_buf()));
            }
            return Err(SourceError::NotFound(dir.to_path_buf()));
        }

        let mut children: BTreeMap<&str, SourceEntry> = BTreeMap::new();
        for child in self.dirs.iter().filter(|d| parent_key(d) == key) {
            let name = leaf_name(child);
            children.insert(name, SourceEntry::directory(name));
        }
        for child in self.files.keys().filter(|f| parent_key(f) == key) {
            let name = leaf_name(child);
            children.insert(name, SourceEntry::file(name));
        }
        Ok(children.into_values().collect())
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read + '_>, SourceError> {
        let key = normalize_key(path)?;
        match self.files.get(&key) {
            Some(content) => Ok(Box::new(Cursor::new(&**content))),
            None if key.is_empty() || self.dirs.contains(&key) => {
                Err(SourceError::NotAFile(path.to_path_buf()))
            }
            None => Err(SourceError::NotFound(path.to_path_buf())),
        }
    }
}
