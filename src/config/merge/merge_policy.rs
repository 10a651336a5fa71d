//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
/// Later sources replace individual keys, never whole tables.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("policy", "patch")?
        .set_default("reconcile.patch_fill", "empty")?
        .set_default("reconcile.dir_mode", "755")
}
