//! Configuration management for Koma.
//!
//! Handles loading, saving, and validating configuration from
//! platform-specific config directories.

use crate::error::ConfigError;
use crate::session::ViewMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application name used for config directory.
const APP_NAME: &str = "Koma";

/// Default config filename.
const CONFIG_FILENAME: &str = "config.toml";

/// Placeholder that every page template must contain.
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where series and episodes live.
    pub store: StoreConfig,

    /// Where page images live.
    pub storage: StorageConfig,

    /// Page discovery settings.
    pub probe: ProbeConfig,

    /// Episode fallback settings.
    pub fallback: FallbackConfig,

    /// Reader defaults.
    pub reader: ReaderConfig,
}

/// Content store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Flat JSON catalog file.
    #[default]
    File,
    /// Remote REST API.
    Rest,
}

/// Content store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Which backend to use.
    pub backend: StoreBackend,

    /// Catalog file for the `file` backend.
    pub path: PathBuf,

    /// Base URL for the `rest` backend (e.g. `https://example.com/api`).
    pub api_url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            path: PathBuf::from("mangas.json"),
            api_url: None,
        }
    }
}

/// Object storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Plain HTTP host, probed with `HEAD`.
    Http,
    /// Firebase storage bucket, probed with `HEAD`.
    Firebase,
    /// Local directory.
    #[default]
    Local,
}

/// Object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Which backend to use.
    pub backend: StorageBackend,

    /// Base URL for `http`, and the public URL prefix for `local`.
    pub base_url: Option<String>,

    /// Bucket name for `firebase`.
    pub bucket: Option<String>,

    /// Root directory for `local`.
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            base_url: None,
            bucket: None,
            root: PathBuf::from("public"),
        }
    }
}

/// Page discovery configuration.
///
/// Extension order matters: the first existing variant wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Candidate extensions in priority order.
    pub extensions: Vec<String>,

    /// URL returned for pages that could not be found.
    pub placeholder_url: String,

    /// Per-candidate existence check timeout in milliseconds.
    pub timeout_ms: u64,

    /// Page stem template with `{slug}`, `{episode}` and `{page}`.
    pub page_template: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            extensions: ["webp", "jpeg", "jpg", "png"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            placeholder_url: "/images/placeholder.webp".to_string(),
            timeout_ms: 3000,
            page_template: "images/{slug}/ep{episode}/page{page}".to_string(),
        }
    }
}

impl ProbeConfig {
    /// Returns the per-candidate timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Builds the extension-less stem for one page.
    pub fn page_stem(&self, slug: &str, episode: &str, page: u32) -> String {
        self.page_template
            .replace("{slug}", slug)
            .replace("{episode}", episode)
            .replace(PAGE_PLACEHOLDER, &page.to_string())
    }
}

/// Episode fallback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// How many unlisted episode numbers may be tried; listed ones always are.
    pub max_steps: u32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self { max_steps: 100 }
    }
}

/// Reader defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// View mode a new session starts in.
    pub default_mode: ViewModeSetting,
}

/// View mode as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewModeSetting {
    #[default]
    Continuous,
    Paginated,
}

impl From<ViewModeSetting> for ViewMode {
    fn from(setting: ViewModeSetting) -> Self {
        match setting {
            ViewModeSetting::Continuous => ViewMode::Continuous,
            ViewModeSetting::Paginated => ViewMode::Paginated { page: 0 },
        }
    }
}

impl Config {
    /// Returns the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the full path to the config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILENAME))
    }

    /// Loads configuration from the default location.
    ///
    /// If the config file doesn't exist, creates a default one.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe.extensions.is_empty() {
            return Err(invalid("probe.extensions", "must list at least one extension"));
        }

        if self.probe.timeout_ms == 0 {
            return Err(invalid("probe.timeout_ms", "must be greater than 0"));
        }

        if !self.probe.page_template.contains(PAGE_PLACEHOLDER) {
            return Err(invalid("probe.page_template", "must contain {page}"));
        }

        if self.store.backend == StoreBackend::Rest && self.store.api_url.is_none() {
            return Err(ConfigError::MissingValue(
                "store.api_url (required for the rest backend)".to_string(),
            ));
        }

        match self.storage.backend {
            StorageBackend::Http if self.storage.base_url.is_none() => {
                Err(ConfigError::MissingValue(
                    "storage.base_url (required for the http backend)".to_string(),
                ))
            }
            StorageBackend::Firebase if self.storage.bucket.is_none() => {
                Err(ConfigError::MissingValue(
                    "storage.bucket (required for the firebase backend)".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.probe.extensions, vec!["webp", "jpeg", "jpg", "png"]);
        assert_eq!(config.probe.timeout(), Duration::from_secs(3));
        assert_eq!(config.fallback.max_steps, 100);
        assert_eq!(config.store.backend, StoreBackend::File);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_page_stem() {
        let probe = ProbeConfig::default();
        assert_eq!(
            probe.page_stem("demo-series", "3", 12),
            "images/demo-series/ep3/page12"
        );
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = Config::default();
        config.probe.extensions = vec!["png".to_string()];
        config.reader.default_mode = ViewModeSetting::Paginated;
        let file = NamedTempFile::new().unwrap();

        config.save_to(file.path()).unwrap();

        let loaded = Config::load_from(file.path()).unwrap();
        assert_eq!(loaded.probe, config.probe);
        assert_eq!(loaded.reader.default_mode, ViewModeSetting::Paginated);
    }

    #[test]
    fn test_load_creates_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILENAME);

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.fallback.max_steps, 100);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            "[store]\nbackend = \"rest\"\napi_url = \"https://example.com/api\"\n",
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Rest);
        assert_eq!(config.probe, ProbeConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.probe.extensions.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.probe.page_template = "images/{slug}/ep{episode}".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.storage.backend = StorageBackend::Firebase;
        assert!(config.validate().is_err());
        config.storage.bucket = Some("demo.appspot.com".to_string());
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.store.backend = StoreBackend::Rest;
        assert!(config.validate().is_err());
    }
}
