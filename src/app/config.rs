use crate::app::keys::KeyConfig;
use crate::player::spotify::DEFAULT_API_BASE_URL;
use crate::stack::ControllerOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const TOKEN_ENV_VAR: &str = "SPOTIFY_ACCESS_TOKEN";

/// User-editable configuration, stored in `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Bearer token; the environment variable wins when set
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
    #[serde(default = "default_top_tracks_max")]
    pub top_tracks_max: usize,
    #[serde(default = "default_top_tracks_batch")]
    pub top_tracks_batch: u32,
    #[serde(default = "default_seek_step")]
    pub seek_step_secs: i64,
    #[serde(default)]
    pub keys: KeyConfig,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_refresh_interval() -> u64 {
    3000
}

fn default_queue_size() -> usize {
    30
}

fn default_top_tracks_max() -> usize {
    200
}

fn default_top_tracks_batch() -> u32 {
    50
}

fn default_seek_step() -> i64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            access_token: None,
            request_timeout_secs: default_request_timeout(),
            refresh_interval_ms: default_refresh_interval(),
            queue_size: default_queue_size(),
            top_tracks_max: default_top_tracks_max(),
            top_tracks_batch: default_top_tracks_batch(),
            seek_step_secs: default_seek_step(),
            keys: KeyConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn get_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hopstack")
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    pub fn get_log_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hopstack")
            .join("logs")
    }

    /// Loads `path`, or the default location when `None`.
    ///
    /// A missing file at the default location is created with defaults; a missing
    /// explicit path is an error. A malformed file is always an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::get_config_path(), false),
        };

        if !path.exists() {
            if explicit {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            let config = Self::default();
            if let Err(e) = config.save(&path) {
                warn!("Could not write default config to {}: {}", path.display(), e);
            }
            return Ok(config);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token_with(std::env::var(TOKEN_ENV_VAR).ok())
    }

    fn access_token_with(&self, env_token: Option<String>) -> Option<String> {
        env_token
            .or_else(|| self.access_token.clone())
            .filter(|t| !t.trim().is_empty())
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            top_tracks_max: self.top_tracks_max,
            top_tracks_batch: self.top_tracks_batch,
        }
    }
}
