//! Configuration System
//!
//! Layered configuration: built-in defaults, the user's global config file,
//! workspace config files, then `UNFURL_` environment variables. Values are
//! validated after loading.

use crate::destination::DEFAULT_DIR_MODE;
use crate::logging::LoggingConfig;
use crate::reconcile::{PatchFill, Policy, ReconcileOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnfurlConfig {
    /// Directory to read the source tree from (CLI only)
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Destination root; the workspace root when unset
    #[serde(default)]
    pub destination: Option<PathBuf>,

    /// Policy used by `unfurl apply`
    #[serde(default = "default_policy")]
    pub policy: Policy,

    /// Reconciliation settings
    #[serde(default)]
    pub reconcile: ReconcileSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_policy() -> Policy {
    Policy::Patch
}

/// Settings that tune the reconciler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileSettings {
    /// Content for files the patch policy creates
    #[serde(default)]
    pub patch_fill: PatchFill,

    /// Octal permission bits for created directories, e.g. "755"
    #[serde(default = "default_dir_mode")]
    pub dir_mode: String,
}

fn default_dir_mode() -> String {
    format!("{:o}", DEFAULT_DIR_MODE)
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            patch_fill: PatchFill::default(),
            dir_mode: default_dir_mode(),
        }
    }
}

impl ReconcileSettings {
    /// Parse `dir_mode` as octal permission bits
    pub fn dir_mode(&self) -> Result<u32, String> {
        let raw = self.dir_mode.trim();
        let digits = raw
            .strip_prefix("0o")
            .or_else(|| raw.strip_prefix("0O"))
            .unwrap_or(raw);
        let mode = u32::from_str_radix(digits, 8)
            .map_err(|_| format!("dir_mode '{}' is not an octal number", self.dir_mode))?;
        if mode > 0o7777 {
            return Err(format!("dir_mode '{}' is out of range", self.dir_mode));
        }
        Ok(mode)
    }

    pub fn options(&self) -> ReconcileOptions {
        ReconcileOptions {
            patch_fill: self.patch_fill,
        }
    }
}

impl Default for UnfurlConfig {
    fn default() -> Self {
        Self {
            source: None,
            destination: None,
            policy: default_policy(),
            reconcile: ReconcileSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Reconcile(String),
    Path(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Reconcile(msg) => write!(f, "Reconcile: {}", msg),
            ValidationError::Path(msg) => write!(f, "Path: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl UnfurlConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.reconcile.dir_mode() {
            errors.push(ValidationError::Reconcile(e));
        }

        if let Some(dest) = &self.destination {
            if dest.as_os_str().is_empty() {
                errors.push(ValidationError::Path(
                    "destination cannot be empty".to_string(),
                ));
            }
        }
        if let Some(source) = &self.source {
            if source.as_os_str().is_empty() {
                errors.push(ValidationError::Path("source cannot be empty".to_string()));
            }
        }

        if let Err(e) = crate::logging::validate_format(&self.logging.format) {
            errors.push(ValidationError::Logging(e.to_string()));
        }
        if let Err(e) = crate::logging::validate_output(&self.logging.output) {
            errors.push(ValidationError::Logging(e.to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
