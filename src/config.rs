use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SweepError};

/// Gmail caps messages.list at 500 results per page
const MAX_PAGE_SIZE: u32 = 500;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// OAuth2 client-secret file (installed-application JSON descriptor)
    #[serde(default = "default_credentials_path")]
    pub credentials: PathBuf,
    /// Token cache written after the first interactive consent
    #[serde(default = "default_token_cache_path")]
    pub token_cache: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials: default_credentials_path(),
            token_cache: default_token_cache_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("volume/credentials.json")
}

fn default_token_cache_path() -> PathBuf {
    PathBuf::from("token.json")
}

fn default_page_size() -> u32 {
    500
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        // A missing config file is not an error; everything has a default
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SweepError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| SweepError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sweep.page_size == 0 || self.sweep.page_size > MAX_PAGE_SIZE {
            return Err(SweepError::ConfigError(format!(
                "sweep.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.sweep.page_size
            )));
        }
        Ok(())
    }
}
