//! Workspace config file source: <workspace>/.reftree.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up at the workspace root
pub const WORKSPACE_CONFIG_FILE: &str = ".reftree.toml";

pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_CONFIG_FILE)
}

/// Add the workspace config file to builder if present. Overrides the global file.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> ConfigBuilder<DefaultState> {
    let path = workspace_config_path(workspace_root);
    if path.exists() {
        debug!(config_path = %path.display(), "Using workspace configuration");
        builder.add_source(File::from(path.as_path()).required(false))
    } else {
        builder
    }
}
