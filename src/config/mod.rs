//! Configuration management for Libris

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Selected theme name
    pub theme: String,

    /// Custom theme overrides (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_theme: Option<Theme>,

    /// Override for the directory holding the shelf slot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Vim mode enabled
    pub vim_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "Tokyo Night".to_string(),
            custom_theme: None,
            data_dir: None,
            vim_mode: true,
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "libris").context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the default data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "libris").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Directory holding the shelf slot: the configured override, or the
    /// platform data directory
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::data_dir(),
        }
    }

    /// Get the active theme
    pub fn active_theme(&self) -> Theme {
        self.custom_theme.clone().unwrap_or_else(Theme::tokyo_night)
    }
}
