//! Source tree backed by a directory on the local filesystem

use super::{normalize_key, SourceEntry, SourceTree};
use crate::error::SourceError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Read-only view of an on-disk directory.
///
/// Only regular files and directories are exposed. Symbolic links and other
/// special entries are skipped, as are names that are not valid UTF-8.
#[derive(Debug, Clone)]
pub struct DirTree {
    root: PathBuf,
}

impl DirTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf, SourceError> {
        let key = normalize_key(path)?;
        if key.is_empty() {
            Ok(self.root.clone())
        } else {
            Ok(self.root.join(key))
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SourceError {
    if source.kind() == std::io::ErrorKind::NotFound {
        SourceError::NotFound(path.to_path_buf())
    } else {
        SourceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl SourceTree for DirTree {
    fn read_dir(&self, dir: &Path) -> Result<Vec<SourceEntry>, SourceError> {
        let full = self.resolve(dir)?;
        let metadata = std::fs::metadata(&full).map_err(|e| io_error(dir, e))?;
        if !metadata.is_dir() {
            return Err(SourceError::NotADirectory(dir.to_path_buf()));
        }

        let walker = WalkDir::new(&full)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        let mut entries = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| io_error(dir, e.into()))?;
            let file_type = entry.file_type();

            let Some(name) = entry.file_name().to_str() else {
                warn!(
                    path = %entry.path().display(),
                    "Skipping source entry with non UTF-8 name"
                );
                continue;
            };

            if file_type.is_dir() {
                entries.push(SourceEntry::directory(name));
            } else if file_type.is_file() {
                entries.push(SourceEntry::file(name));
            } else {
                warn!(
                    path = %entry.path().display(),
                    "Skipping unsupported source entry (symlink or special file)"
                );
            }
        }

        Ok(entries)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read + '_>, SourceError> {
        let full = self.resolve(path)?;
        let metadata = std::fs::symlink_metadata(&full).map_err(|e| io_error(path, e))?;
        if !metadata.is_file() {
            return Err(SourceError::NotAFile(path.to_path_buf()));
        }
        let file = File::open(&full).map_err(|e| io_error(path, e))?;
        Ok(Box::new(BufReader::new(file)))
    }
}
