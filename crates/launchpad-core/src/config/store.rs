//! Config store for loading and saving launchpad.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{CONFIG_FILE_NAME, LauncherConfig, parser};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Store at `<config dir>/launchpad/launchpad.toml`.
    pub fn from_default_location() -> anyhow::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("launchpad");
        Ok(Self::in_dir(config_dir))
    }

    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_dir.into().join(CONFIG_FILE_NAME),
        }
    }

    pub fn from_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the file, or defaults when it does not exist.
    pub fn load(&self) -> anyhow::Result<LauncherConfig> {
        if !self.config_path.exists() {
            return Ok(LauncherConfig::new());
        }
        parser::parse_launchpad_toml(&self.config_path)
    }

    /// Load the file and apply environment overrides.
    pub fn load_with_env(&self) -> anyhow::Result<LauncherConfig> {
        let mut config = self.load()?;
        config.apply_env_overrides();
        config
            .validate()
            .context("Invalid configuration after applying environment overrides")?;
        Ok(config)
    }

    pub fn save(&self, config: &LauncherConfig) -> anyhow::Result<()> {
        config.validate()?;
        let content = parser::to_toml(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;
        Ok(())
    }
}
