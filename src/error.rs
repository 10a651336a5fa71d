//! Error types for bundle materialization.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a source tree
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Source path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Source path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Failed to read source path {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reconciling a source tree against a destination
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The probe failed for a reason other than the path being absent.
    #[error("Cannot determine whether {} exists: {source}", path.display())]
    AmbiguousExistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create file {}: {source}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy contents into {}: {source}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReconcileError {
    /// Destination path the failure refers to, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ReconcileError::Source(_) => None,
            ReconcileError::CreateDir { path, .. }
            | ReconcileError::AmbiguousExistence { path, .. }
            | ReconcileError::CreateFile { path, .. }
            | ReconcileError::Copy { path, .. } => Some(path),
        }
    }
}

/// Application-level errors surfaced by configuration, logging and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Reconcile failed: {0}")]
    Reconcile(#[from] ReconcileError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// A policy name that does not match any reconciliation policy
#[derive(Debug, Error)]
#[error("Unknown policy '{0}' (expected tree, touch, create or patch)")]
pub struct UnknownPolicy(pub String);
