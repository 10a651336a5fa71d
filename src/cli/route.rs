//! CLI route: run context and the single route table.

use crate::cli::parse::{Commands, FillArg, RunArgs};
use crate::cli::presentation::{
    format_preview_json, format_preview_text, format_report_json, format_report_text,
};
use crate::config::{ConfigLoader, UnfurlConfig};
use crate::destination::{Destination, LocalDestination};
use crate::error::ApiError;
use crate::reconcile::{PatchFill, Policy, Reconciler};
use crate::source::DirTree;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime context for CLI execution: workspace, loaded config and resolved roots.
pub struct RunContext {
    workspace_root: PathBuf,
    config: UnfurlConfig,
    source_override: Option<PathBuf>,
    dest_override: Option<PathBuf>,
}

impl RunContext {
    /// Create run context from the workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };

        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;

        Ok(Self {
            workspace_root,
            config,
            source_override: None,
            dest_override: None,
        })
    }

    /// Paths given on the command line take precedence over configured ones
    pub fn with_overrides(mut self, source: Option<PathBuf>, dest: Option<PathBuf>) -> Self {
        self.source_override = source;
        self.dest_override = dest;
        self
    }

    pub fn config(&self) -> &UnfurlConfig {
        &self.config
    }

    /// Source directory: CLI flag, then config (relative to the workspace)
    pub fn source_root(&self) -> Result<PathBuf, ApiError> {
        if let Some(source) = &self.source_override {
            return Ok(source.clone());
        }
        self.config
            .source
            .as_ref()
            .map(|s| self.workspace_root.join(s))
            .ok_or_else(|| {
                ApiError::ConfigError(
                    "No source directory; pass --source or set `source` in unfurl.toml"
                        .to_string(),
                )
            })
    }

    /// Destination root: CLI flag, then config (relative to the workspace), then the workspace
    pub fn destination_root(&self) -> PathBuf {
        let dest = match (&self.dest_override, &self.config.destination) {
            (Some(dest), _) => dest.clone(),
            (None, Some(dest)) => self.workspace_root.join(dest),
            (None, None) => self.workspace_root.clone(),
        };
        dunce::canonicalize(&dest).unwrap_or(dest)
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Tree(args) => self.run_policy(Policy::Tree, args),
            Commands::Touch(args) => self.run_policy(Policy::Touch, args),
            Commands::Create(args) => self.run_policy(Policy::Create, args),
            Commands::Patch(args) => self.run_policy(Policy::Patch, args),
            Commands::Apply(args) => self.run_policy(self.config.policy, args),
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }

    fn run_policy(&self, policy: Policy, args: &RunArgs) -> Result<String, ApiError> {
        if args.format != "text" && args.format != "json" {
            return Err(ApiError::ConfigError(format!(
                "Invalid output format: {} (must be 'text' or 'json')",
                args.format
            )));
        }

        let source_root = self.source_root()?;
        if !source_root.is_dir() {
            return Err(ApiError::InvalidPath(format!(
                "Source {} is not a directory",
                source_root.display()
            )));
        }
        let source = DirTree::new(&source_root);

        let dest_root = self.destination_root();
        ensure_disjoint(&source_root, &dest_root)?;
        let dir_mode = self
            .config
            .reconcile
            .dir_mode()
            .map_err(ApiError::ConfigError)?;
        let dest = LocalDestination::new(&dest_root).with_dir_mode(dir_mode);

        let mut options = self.config.reconcile.options();
        if let Some(fill) = args.fill {
            options.patch_fill = match fill {
                FillArg::Empty => PatchFill::Empty,
                FillArg::Source => PatchFill::Source,
            };
        }
        let reconciler = Reconciler::new(&source, &dest).with_options(options);

        info!(
            policy = %policy,
            source = %source_root.display(),
            destination = %dest_root.display(),
            preview = args.list,
            "Running reconcile command"
        );

        if args.list {
            let preview = reconciler.preview(policy)?;
            return match args.format.as_str() {
                "json" => format_preview_json(&preview, &dest_root),
                _ => Ok(format_preview_text(&preview, &dest_root)),
            };
        }

        ensure_root(&dest, &dest_root)?;
        let report = reconciler.apply(policy)?;
        match args.format.as_str() {
            "json" => format_report_json(&report, &dest_root),
            _ => Ok(format_report_text(&report, &dest_root)),
        }
    }
}

/// Reject a destination that is the source or lies inside it.
///
/// Writing into the source truncates files before they are read, and a
/// destination nested in the source is listed again as source content.
fn ensure_disjoint(source_root: &Path, dest_root: &Path) -> Result<(), ApiError> {
    let source = dunce::canonicalize(source_root).map_err(|e| {
        ApiError::InvalidPath(format!(
            "Cannot resolve source {}: {}",
            source_root.display(),
            e
        ))
    })?;
    let dest = resolve_existing_prefix(dest_root);
    if dest.starts_with(&source) {
        return Err(ApiError::InvalidPath(format!(
            "Destination {} overlaps source {}; choose a destination outside the source",
            dest.display(),
            source.display()
        )));
    }
    Ok(())
}

/// Canonicalize the longest existing ancestor of `path` and re-append the rest
fn resolve_existing_prefix(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut missing = Vec::new();
    let mut current = absolute.as_path();
    loop {
        if let Ok(canonical) = dunce::canonicalize(current) {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                current = parent;
            }
            _ => return absolute,
        }
    }
}

/// The destination root itself is created before any entry is written
fn ensure_root(dest: &LocalDestination, dest_root: &Path) -> Result<(), ApiError> {
    dest.create_dir_all(Path::new("")).map_err(|e| {
        ApiError::InvalidPath(format!(
            "Cannot create destination {}: {}",
            dest_root.display(),
            e
        ))
    })
}
