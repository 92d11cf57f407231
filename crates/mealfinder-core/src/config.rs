use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::search::DEFAULT_LOOKUP_CONCURRENCY;
use crate::store::{JsonFileStore, DEFAULT_SLOT};

/// Main configuration structure
///
/// Loaded from `<config_dir>/mealfinder/config.toml`; the CLI can point at
/// another file and override the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path; a missing file means defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to disk
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// XDG config dir on Linux, Application Support on macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::Config("Could not find config directory".into()))?
            .join("mealfinder");

        Ok(config_dir.join("config.toml"))
    }

    /// The pantry store this config describes
    pub fn ingredient_store(&self) -> crate::Result<JsonFileStore> {
        let dir = match &self.storage.data_dir {
            Some(dir) => dir.clone(),
            None => JsonFileStore::default_dir()?,
        };
        Ok(JsonFileStore::new(dir, &self.storage.slot))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// TheMealDB base URL; the public test key "1" works out of the box
    #[serde(default = "default_api_url")]
    pub base_url: String,
}

fn default_api_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where the pantry lives (default: platform data dir)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Slot name, becomes `<slot>.json`
    #[serde(default = "default_slot")]
    pub slot: String,
}

fn default_slot() -> String {
    DEFAULT_SLOT.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            slot: default_slot(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Detail lookups in flight during a multi-ingredient search
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,
}

fn default_lookup_concurrency() -> usize {
    DEFAULT_LOOKUP_CONCURRENCY
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            lookup_concurrency: default_lookup_concurrency(),
        }
    }
}
