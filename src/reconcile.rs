//! Reconciliation of a source tree against a destination
//!
//! Every operation is a single breadth-first walk of the source. The policy
//! only changes what happens to each file; directories are always created
//! (idempotently, with every missing ancestor).
//!
//! | Policy   | Existing file          | Missing file                  |
//! |----------|------------------------|-------------------------------|
//! | `tree`   | untouched              | not created                   |
//! | `touch`  | untouched              | created empty                 |
//! | `create` | overwritten from source| created from source           |
//! | `patch`  | untouched              | created, filled per [`PatchFill`] |

use crate::destination::{Destination, Existence, LocalDestination};
use crate::error::{ReconcileError, UnknownPolicy};
use crate::source::SourceTree;
use crate::tree::walker::Walker;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Per-file write policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Replicate directories only
    Tree,
    /// Create missing files empty, leave existing files alone
    Touch,
    /// Write every file from the source, overwriting existing ones
    Create,
    /// Create missing files, leave existing files alone
    Patch,
}

impl Policy {
    pub const ALL: [Policy; 4] = [Policy::Tree, Policy::Touch, Policy::Create, Policy::Patch];

    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Tree => "tree",
            Policy::Touch => "touch",
            Policy::Create => "create",
            Policy::Patch => "patch",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}

/// Content written by the patch policy for files missing at the destination.
///
/// `Empty` creates zero-length files. That is how patching has always behaved,
/// even though the intent is to restore missing files; `Source` copies the
/// source bytes instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchFill {
    #[default]
    Empty,
    Source,
}

/// Knobs shared by all policies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub patch_fill: PatchFill,
}

/// What a reconcile run did, with destination-relative paths in visit order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub policy: Policy,
    /// Directories ensured to exist
    pub directories: Vec<PathBuf>,
    /// Files that did not exist and were created
    pub created: Vec<PathBuf>,
    /// Files written from source without checking for a previous file
    pub written: Vec<PathBuf>,
    /// Files left as they were
    pub skipped: Vec<PathBuf>,
}

impl ReconcileReport {
    fn new(policy: Policy) -> Self {
        Self {
            policy,
            directories: Vec::new(),
            created: Vec::new(),
            written: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Number of files the run wrote to
    pub fn files_changed(&self) -> usize {
        self.created.len() + self.written.len()
    }
}

/// Dry-run result: what a policy would change at the destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcilePreview {
    pub policy: Policy,
    pub missing_directories: Vec<PathBuf>,
    /// Directory paths occupied by something other than a directory
    pub conflicts: Vec<PathBuf>,
    pub would_create: Vec<PathBuf>,
    pub would_overwrite: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

impl ReconcilePreview {
    pub fn is_noop(&self) -> bool {
        self.missing_directories.is_empty()
            && self.conflicts.is_empty()
            && self.would_create.is_empty()
            && self.would_overwrite.is_empty()
    }
}

/// Applies policies from one source to one destination
pub struct Reconciler<'a, S: SourceTree + ?Sized, D: Destination + ?Sized> {
    source: &'a S,
    dest: &'a D,
    options: ReconcileOptions,
}

impl<'a, S: SourceTree + ?Sized, D: Destination + ?Sized> Reconciler<'a, S, D> {
    pub fn new(source: &'a S, dest: &'a D) -> Self {
        Self {
            source,
            dest,
            options: ReconcileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    /// Run `policy` over the whole source tree.
    ///
    /// Stops at the first failure. Anything written before the failure stays
    /// on disk.
    pub fn apply(&self, policy: Policy) -> Result<ReconcileReport, ReconcileError> {
        info!(policy = %policy, "Reconcile starting");
        let mut report = ReconcileReport::new(policy);

        Walker::new(self.source).walk::<_, ReconcileError>(|dir, entry| {
            let path = dir.join(entry.name());
            if entry.is_dir() {
                self.ensure_dir(&path)?;
                report.directories.push(path);
                return Ok(());
            }

            match policy {
                Policy::Tree => report.skipped.push(path),
                Policy::Create => {
                    self.copy_file(&path)?;
                    report.written.push(path);
                }
                Policy::Touch | Policy::Patch => {
                    if self.exists(&path)? {
                        debug!(
                            path = %self.dest.display_path(&path).display(),
                            "File exists, leaving untouched"
                        );
                        report.skipped.push(path);
                        return Ok(());
                    }
                    match (policy, self.options.patch_fill) {
                        (Policy::Patch, PatchFill::Source) => self.copy_file(&path)?,
                        _ => self.touch_file(&path)?,
                    }
                    report.created.push(path);
                }
            }
            Ok(())
        })?;

        info!(
            policy = %policy,
            directories = report.directories.len(),
            created = report.created.len(),
            written = report.written.len(),
            skipped = report.skipped.len(),
            "Reconcile complete"
        );
        Ok(report)
    }

    /// Report what `apply(policy)` would change without writing anything.
    ///
    /// Files are probed only where `apply` would probe them, plus under
    /// `create` to tell overwrites from new files. A probe failure there is
    /// not fatal since `create` writes either way.
    pub fn preview(&self, policy: Policy) -> Result<ReconcilePreview, ReconcileError> {
        let mut preview = ReconcilePreview {
            policy,
            missing_directories: Vec::new(),
            conflicts: Vec::new(),
            would_create: Vec::new(),
            would_overwrite: Vec::new(),
            unchanged: Vec::new(),
        };

        Walker::new(self.source).walk::<_, ReconcileError>(|dir, entry| {
            let path = dir.join(entry.name());
            // Nothing below a conflicting path can be created
            if preview.conflicts.iter().any(|blocked| path.starts_with(blocked)) {
                return Ok(());
            }

            if entry.is_dir() {
                if !self.dest.is_dir(&path) {
                    match self.dest.probe(&path) {
                        Ok(Existence::Present) => preview.conflicts.push(path),
                        Ok(Existence::Missing) | Err(_) => preview.missing_directories.push(path),
                    }
                }
                return Ok(());
            }

            match policy {
                Policy::Tree => preview.unchanged.push(path),
                Policy::Create => match self.dest.probe(&path) {
                    Ok(Existence::Missing) => preview.would_create.push(path),
                    Ok(Existence::Present) | Err(_) => preview.would_overwrite.push(path),
                },
                Policy::Touch | Policy::Patch => {
                    if self.exists(&path)? {
                        preview.unchanged.push(path);
                    } else {
                        preview.would_create.push(path);
                    }
                }
            }
            Ok(())
        })?;

        Ok(preview)
    }

    fn ensure_dir(&self, path: &Path) -> Result<(), ReconcileError> {
        self.dest
            .create_dir_all(path)
            .map_err(|source| ReconcileError::CreateDir {
                path: self.dest.display_path(path),
                source,
            })?;
        debug!(path = %self.dest.display_path(path).display(), "Directory ensured");
        Ok(())
    }

    fn exists(&self, path: &Path) -> Result<bool, ReconcileError> {
        match self.dest.probe(path) {
            Ok(Existence::Present) => Ok(true),
            Ok(Existence::Missing) => Ok(false),
            Err(source) => Err(ReconcileError::AmbiguousExistence {
                path: self.dest.display_path(path),
                source,
            }),
        }
    }

    fn touch_file(&self, path: &Path) -> Result<(), ReconcileError> {
        self.dest
            .create(path)
            .map_err(|source| ReconcileError::CreateFile {
                path: self.dest.display_path(path),
                source,
            })?;
        debug!(path = %self.dest.display_path(path).display(), "Created empty file");
        Ok(())
    }

    fn copy_file(&self, path: &Path) -> Result<(), ReconcileError> {
        let mut reader = self.source.open(path)?;
        let mut writer = self
            .dest
            .create(path)
            .map_err(|source| ReconcileError::CreateFile {
                path: self.dest.display_path(path),
                source,
            })?;
        let copy_err = |source: std::io::Error| ReconcileError::Copy {
            path: self.dest.display_path(path),
            source,
        };
        let bytes = std::io::copy(&mut reader, &mut writer).map_err(copy_err)?;
        writer.flush().map_err(copy_err)?;
        debug!(path = %self.dest.display_path(path).display(), bytes, "Wrote file from source");
        Ok(())
    }
}

fn run<S: SourceTree + ?Sized>(
    source: &S,
    dest_root: &Path,
    policy: Policy,
) -> Result<ReconcileReport, ReconcileError> {
    let dest = LocalDestination::new(dest_root);
    Reconciler::new(source, &dest).apply(policy)
}

/// Replicate the directory structure of `source` under `dest_root`
pub fn tree<S: SourceTree + ?Sized>(
    source: &S,
    dest_root: impl AsRef<Path>,
) -> Result<ReconcileReport, ReconcileError> {
    run(source, dest_root.as_ref(), Policy::Tree)
}

/// Replicate `source` under `dest_root` with empty files, keeping existing files
pub fn touch<S: SourceTree + ?Sized>(
    source: &S,
    dest_root: impl AsRef<Path>,
) -> Result<ReconcileReport, ReconcileError> {
    run(source, dest_root.as_ref(), Policy::Touch)
}

/// Write every file of `source` under `dest_root`, overwriting existing files
pub fn create<S: SourceTree + ?Sized>(
    source: &S,
    dest_root: impl AsRef<Path>,
) -> Result<ReconcileReport, ReconcileError> {
    run(source, dest_root.as_ref(), Policy::Create)
}

/// Create files of `source` missing under `dest_root`, keeping existing files.
///
/// Missing files are created empty; use [`Reconciler`] with
/// [`PatchFill::Source`] to restore their content instead.
pub fn patch<S: SourceTree + ?Sized>(
    source: &S,
    dest_root: impl AsRef<Path>,
) -> Result<ReconcileReport, ReconcileError> {
    run(source, dest_root.as_ref(), Policy::Patch)
}
