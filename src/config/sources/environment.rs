//! Environment source: UNFURL_DESTINATION, UNFURL_RECONCILE__PATCH_FILL, ...

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Add `UNFURL_`-prefixed environment variables; `__` separates nested keys.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("UNFURL")
            .prefix_separator("_")
            .separator("__"),
    )
}
