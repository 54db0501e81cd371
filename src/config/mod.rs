//! Configuration storage
//!
//! The backend base URL is resolved exactly once at process start
//! (file, then `CHATVAULT_BASE_URL`, then the `--base-url` flag) and passed
//! explicitly to the client constructor; nothing reads it ad hoc per call.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_page_size() -> u32 {
    50
}

/// Application configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the chat-archive backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Default page size for list requests.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Hide conversations the backend flagged as ads.
    #[serde(default)]
    pub exclude_ads: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            exclude_ads: false,
        }
    }
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "chatvault", "chatvault")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir).context("Failed to create config directory")?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Apply overrides in precedence order: env, then CLI flag.
    pub fn with_overrides(mut self, cli_base_url: Option<String>) -> Self {
        if let Ok(url) = std::env::var("CHATVAULT_BASE_URL") {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        if let Some(url) = cli_base_url {
            self.base_url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.page_size, 50);
        assert!(!config.exclude_ads);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("base_url = \"http://vault:9000\"").unwrap();
        assert_eq!(config.base_url, "http://vault:9000");
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_cli_flag_wins() {
        let config = Config::default().with_overrides(Some("http://flag:1".to_string()));
        assert_eq!(config.base_url, "http://flag:1");
    }
}
