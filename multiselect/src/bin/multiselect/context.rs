use anyhow::{Context, Result};
use multiselect::Settings;
use std::path::{Path, PathBuf};

/// Name of the settings file looked up from the working directory upwards.
pub const CONFIG_FILE: &str = "multiselect.toml";

/// Settings resolved for a CLI invocation
pub struct ConfigContext {
    /// Settings file that was loaded, if any
    pub config_path: Option<PathBuf>,
    /// Effective settings
    pub settings: Settings,
}

impl ConfigContext {
    /// Load settings from an explicit path, or discover them from the current directory
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let current_dir =
                    std::env::current_dir().context("Failed to get current directory")?;
                Self::find_from(&current_dir)
            }
        }
    }

    /// Walk from `start` through its ancestors looking for the settings file
    pub fn find_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(CONFIG_FILE);
            if candidate.is_file() {
                return Self::from_path(&candidate);
            }

            if !current.pop() {
                return Ok(Self {
                    config_path: None,
                    settings: Settings::default(),
                });
            }
        }
    }

    /// Load settings from a file that must exist
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("Config file {} does not exist", path.display());
        }
        let settings = Settings::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        Ok(Self {
            config_path: Some(path.to_path_buf()),
            settings,
        })
    }
}
