//! Config path resolution helpers.

use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "octo.toml";

/// `<config_dir>/octo/octo.toml`
pub fn primary_config_path(config_dir: &Path) -> PathBuf {
    config_dir.join("octo").join(CONFIG_FILE_NAME)
}

/// `~/.config/octopus/cli_config.json`, shared with the Octopus CLI tooling.
pub fn legacy_config_path(home_dir: &Path) -> PathBuf {
    home_dir
        .join(".config")
        .join("octopus")
        .join("cli_config.json")
}
