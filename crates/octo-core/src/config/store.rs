//! Locates and loads the server configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use super::paths::{legacy_config_path, primary_config_path};
use super::{OctoConfig, ServerConfig, parser};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    candidates: Vec<PathBuf>,
}

impl ConfigStore {
    /// Search the user's config directory, then the legacy location.
    pub fn from_default_locations() -> anyhow::Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let config_dir = dirs::config_dir().unwrap_or_else(|| home_dir.join(".config"));

        Ok(Self::from_dirs(&config_dir, &home_dir))
    }

    pub fn from_dirs(config_dir: &Path, home_dir: &Path) -> Self {
        Self {
            candidates: vec![
                primary_config_path(config_dir),
                legacy_config_path(home_dir),
            ],
        }
    }

    /// Use exactly one file; it must exist.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            candidates: vec![path.into()],
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists on disk.
    pub fn config_path(&self) -> anyhow::Result<&Path> {
        self.candidates
            .iter()
            .find(|path| path.exists())
            .map(PathBuf::as_path)
            .ok_or_else(|| {
                let searched = self
                    .candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                anyhow::anyhow!("Configuration file not found: {}", searched)
            })
    }

    pub fn load_file(&self) -> anyhow::Result<OctoConfig> {
        let path = self.config_path()?;
        debug!("Loading configuration from {}", path.display());
        parser::parse_config_file(path)
    }

    pub fn load(&self) -> anyhow::Result<ServerConfig> {
        let path = self.config_path()?.to_path_buf();
        self.load_file()?
            .into_server_config()
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }
}
