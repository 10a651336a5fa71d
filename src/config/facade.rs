//! Config loader: assembles sources in precedence order and deserializes.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::UnfurlConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`UnfurlConfig`] from files and the environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global config file,
    /// `<workspace>/unfurl.toml`, `<workspace>/unfurl.<UNFURL_ENV>.toml`,
    /// `UNFURL_*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<UnfurlConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: UnfurlConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from a single file, on top of the defaults only
    pub fn load_from_file(path: &Path) -> Result<UnfurlConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let config = builder
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        debug!(path = %path.display(), "Configuration loaded from file");
        Ok(config)
    }

    /// Location of the global config file, if one can be determined
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
