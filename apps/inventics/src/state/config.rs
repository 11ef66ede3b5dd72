//! # Configuration State
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     INVENTICS_DB_PATH=./data/inventics.db                              │
//! │     GEMINI_API_KEY=...                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/inventics/inventics.toml (Linux)                         │
//! │     ~/Library/Application Support/com.inventics.app/inventics.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/var/lib/inventics/inventics.db"
//!
//! [inventory]
//! low_stock_threshold = 50
//! default_user = "Admin"
//!
//! [ai]
//! api_key = "..."
//! models = ["gemini-flash-lite-latest", "gemini-2.5-flash"]
//! ```
//!
//! Read-only after startup, so commands share it without a lock.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use inventics_ai::{AiSettings, DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_MODELS};
use inventics_core::DEFAULT_LOW_STOCK_THRESHOLD;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "inventics.toml";
const DATABASE_FILE: &str = "inventics.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine the application directories")]
    NoProjectDirs,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Products strictly below this quantity count as low stock.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,

    /// User recorded on movements when the caller names none.
    #[serde(default = "default_user")]
    pub default_user: String,
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

fn default_user() -> String {
    "Admin".to_string()
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            low_stock_threshold: default_low_stock_threshold(),
            default_user: default_user(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Rotation order for chat and analysis.
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    #[serde(default = "default_image_model")]
    pub image_model: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            models: default_models(),
            image_model: default_image_model(),
        }
    }
}

// =============================================================================
// ConfigState
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigState {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub inventory: InventorySettings,

    #[serde(default)]
    pub ai: AiConfig,
}

impl ConfigState {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (inventics.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoProjectDirs)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.inventory.low_stock_threshold < 0 {
            return Err(ConfigError::Invalid(
                "low_stock_threshold must not be negative".into(),
            ));
        }

        if self.inventory.default_user.trim().is_empty() {
            return Err(ConfigError::Invalid("default_user must not be empty".into()));
        }

        if self.ai.models.iter().all(|m| m.trim().is_empty()) {
            return Err(ConfigError::Invalid("at least one AI model is required".into()));
        }

        if !self.ai.base_url.starts_with("http://") && !self.ai.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "AI base URL must start with http:// or https://, got: {}",
                self.ai.base_url
            )));
        }

        Ok(())
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// `GEMINI_API_KEY` wins over `API_KEY`. `INVENTICS_AI_MODELS` is a
    /// comma-separated list.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("INVENTICS_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(threshold) = lookup("INVENTICS_LOW_STOCK_THRESHOLD") {
            match threshold.trim().parse::<i64>() {
                Ok(t) => self.inventory.low_stock_threshold = t,
                Err(_) => warn!(value = %threshold, "Ignoring invalid low stock threshold"),
            }
        }

        if let Some(user) = lookup("INVENTICS_USER") {
            self.inventory.default_user = user;
        }

        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
            if !key.trim().is_empty() {
                self.ai.api_key = Some(key);
            }
        }

        if let Some(models) = lookup("INVENTICS_AI_MODELS") {
            let parsed: Vec<String> = models
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect();
            if !parsed.is_empty() {
                debug!(models = ?parsed, "Overriding AI models from environment");
                self.ai.models = parsed;
            }
        }

        if let Some(url) = lookup("INVENTICS_AI_BASE_URL") {
            self.ai.base_url = url;
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "inventics", "app")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Database file to open: the configured path or the platform data dir.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs().ok_or(ConfigError::NoProjectDirs)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join(DATABASE_FILE))
    }

    pub fn ai_settings(&self) -> AiSettings {
        AiSettings {
            api_key: self.ai.api_key.clone(),
            base_url: self.ai.base_url.clone(),
            models: self
                .ai
                .models
                .iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            image_model: self.ai.image_model.clone(),
        }
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.inventory.low_stock_threshold
    }

    /// The given user, or the configured default when blank.
    pub fn user_or_default<'a>(&'a self, user: Option<&'a str>) -> &'a str {
        match user.map(str::trim) {
            Some(u) if !u.is_empty() => u,
            _ => &self.inventory.default_user,
        }
    }
}
