//! ConfigLoader: builds a [`BotConfig`] from every source in precedence order.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::BotConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the user-level file, then workspace files, then the
    /// environment.
    pub fn load(workspace_root: &Path) -> Result<BotConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load a single explicit file. The environment still overrides it.
    pub fn load_from_file(path: &Path) -> Result<BotConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Path of the user-level config file, if a home directory is known.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
