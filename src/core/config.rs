use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable that overrides `api_key` from the config file.
pub const API_KEY_ENV: &str = "CURRENCY_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.currencylayer.com";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub api_key: Option<String>,
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been created there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "xrate", "xrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// The access key to send with every request, taking the environment
    /// variable over the config file.
    pub fn api_key(&self) -> Result<String> {
        self.api_key_with_override(std::env::var(API_KEY_ENV).ok())
    }

    pub fn api_key_with_override(&self, env_key: Option<String>) -> Result<String> {
        env_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .map(|k| k.trim().to_string())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured. Set {} or add `api_key` to the config file",
                    API_KEY_ENV
                )
            })
    }
}
