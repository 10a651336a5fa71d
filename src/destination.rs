//! Writable destination filesystems
//!
//! Paths passed to a [`Destination`] are relative to its root. The root is
//! always an explicit value; nothing here consults the process working
//! directory.

use std::fs::{DirBuilder, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Directory mode used when none is configured (rwxr-xr-x)
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Result of probing a destination path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    Present,
    Missing,
}

/// Writable filesystem the reconciler materializes into
pub trait Destination {
    /// Create `path` and every missing ancestor. Succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Probe `path`.
    ///
    /// Only a "not found" failure maps to [`Existence::Missing`]; every other
    /// failure is returned as an error.
    fn probe(&self, path: &Path) -> io::Result<Existence>;

    /// Whether `path` is an existing directory. Errors read as `false`.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create or truncate the file at `path` and open it for writing
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>>;

    /// Human readable location of `path`, used in logs
    fn display_path(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// Destination rooted at a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalDestination {
    root: PathBuf,
    dir_mode: u32,
}

impl LocalDestination {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dir_mode: DEFAULT_DIR_MODE,
        }
    }

    /// Override the permission bits used for created directories
    pub fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir_mode(&self) -> u32 {
        self.dir_mode
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Destination for LocalDestination {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.dir_mode);
        }
        builder.create(self.full_path(path))
    }

    fn probe(&self, path: &Path) -> io::Result<Existence> {
        match std::fs::metadata(self.full_path(path)) {
            Ok(_) => Ok(Existence::Present),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Existence::Missing),
            Err(e) => Err(e),
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.full_path(path).is_dir()
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        let file = File::create(self.full_path(path))?;
        Ok(Box::new(file))
    }

    fn display_path(&self, path: &Path) -> PathBuf {
        self.full_path(path)
    }
}
