//! Configuration System
//!
//! Layered configuration built with the `config` crate. Sources, from lowest to
//! highest precedence: built-in defaults, the global file, the workspace file
//! and `REFTREE_*` environment variables.
//!
//! The repository root is never stored globally; callers read it from
//! [`ReftreeConfig::repository_root`] and pass it to path resolution.

use crate::error::{BuildError, ConfigError};
use crate::logging::LoggingConfig;
use crate::tree::{ListingSource, NodeRef, RefTree, TreeBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

mod merge;
mod sources;

pub use sources::global_file::global_config_path;
pub use sources::workspace_file::{workspace_config_path, WORKSPACE_CONFIG_FILE};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReftreeConfig {
    /// Checkout directory that absolute node paths are anchored at
    #[serde(default = "default_repository_root")]
    pub repository_root: PathBuf,

    /// Reference built when none is named
    #[serde(default = "default_reference")]
    pub default_reference: String,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_repository_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_reference() -> String {
    "HEAD".to_string()
}

impl Default for ReftreeConfig {
    fn default() -> Self {
        Self {
            repository_root: default_repository_root(),
            default_reference: default_reference(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ReftreeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repository_root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "repository_root cannot be empty".to_string(),
            ));
        }
        if self.default_reference.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_reference cannot be empty".to_string(),
            ));
        }
        if self.default_reference.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "default_reference cannot contain whitespace: {:?}",
                self.default_reference
            )));
        }
        self.logging
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("logging: {}", e)))
    }

    /// Build the tree of the configured default reference
    pub fn build_default<S>(&self, source: &S) -> Result<RefTree, BuildError>
    where
        S: ListingSource + ?Sized,
    {
        TreeBuilder::from_source(source, &self.default_reference)
    }

    /// On-disk location of `node` inside the configured checkout
    pub fn absolute_path(&self, node: &NodeRef<'_>) -> PathBuf {
        node.absolute_path(&self.repository_root)
    }

    /// Render as TOML, e.g. to seed a workspace file
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(format!("Failed to serialize config: {}", e)))
    }
}

/// Loads [`ReftreeConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace
    pub fn load(workspace_root: &Path) -> Result<ReftreeConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder);
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root);
        let builder = sources::environment::add_to_builder(builder);

        let config: ReftreeConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(
            repository_root = %config.repository_root.display(),
            default_reference = %config.default_reference,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load configuration from a single file on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<ReftreeConfig, ConfigError> {
        let config: ReftreeConfig = merge::merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
