use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_NAME: &str = "mcp-sync";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<Defaults>,
}

/// Values used when the matching command-line flag is absent
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Defaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claude_config: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    /// `false` behaves like passing `--no-backup` on every run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
}

impl AppConfig {
    /// Load the application configuration from the default path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Unable to determine the config directory
    /// - Unable to read the config file (other than it not existing)
    /// - The config file contains invalid TOML
    pub fn load() -> Result<Option<Self>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config at {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Get the path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if unable to determine the config directory
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
            Ok(PathBuf::from(config_home).join(APP_NAME).join("config.toml"))
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            anyhow::bail!("Could not determine config directory")
        }
    }

    pub fn defaults(&self) -> Defaults {
        self.defaults.clone().unwrap_or_default()
    }
}
