//! Application Configuration
//!
//! Persists user settings as TOML:
//! - Installed SDK version
//! - Terminal output preferences

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ApmError, Result};

/// File name of the configuration inside the config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Installed SDK settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SdkConfig {
    /// API version of the installed SDK. Absent until the first
    /// installation finishes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<u32>,
}

/// Terminal output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiConfig {
    /// Width of the bar part of determined progress indicators
    pub progress_width: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { progress_width: 30 }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Configuration version for migrations
    pub version: u32,
    /// SDK settings
    #[serde(default)]
    pub sdk: SdkConfig,
    /// Terminal settings
    #[serde(default)]
    pub ui: UiConfig,
    /// File the configuration is saved to. Unbound configurations live
    /// only in memory.
    #[serde(skip)]
    file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            sdk: SdkConfig::default(),
            ui: UiConfig::default(),
            file: None,
        }
    }
}

/// Read/write access to the installed SDK version marker.
pub trait InstalledVersionStore {
    /// Installed SDK version, if any.
    fn installed_version(&self) -> Option<u32>;

    /// Records a new installed version and persists it.
    fn set_installed_version(&mut self, version: u32) -> Result<()>;
}

impl AppConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "apm").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_file = Self::config_file()
            .ok_or_else(|| ApmError::Config("Cannot determine config path".into()))?;
        Self::load_from(&config_file)
    }

    /// Load configuration from `path`, creating it with defaults when it
    /// doesn't exist yet. The returned configuration is bound to `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {:?}", path);
            let contents = std::fs::read_to_string(path)?;
            let mut config: AppConfig =
                toml::from_str(&contents).map_err(|source| ApmError::TomlParse {
                    path: path.to_path_buf(),
                    source,
                })?;
            config.file = Some(path.to_path_buf());
            Ok(config)
        } else {
            info!("Config file not found, using defaults");
            let config = AppConfig {
                file: Some(path.to_path_buf()),
                ..AppConfig::default()
            };
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to its bound file. Does nothing when unbound.
    pub fn save(&self) -> Result<()> {
        let Some(config_file) = self.file.as_deref() else {
            return Ok(());
        };

        if let Some(parent) = config_file.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ApmError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(config_file, contents).map_err(|source| ApmError::Write {
            path: config_file.to_path_buf(),
            source,
        })?;

        debug!("Config saved to {:?}", config_file);
        Ok(())
    }

    /// File this configuration is bound to
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

impl InstalledVersionStore for AppConfig {
    fn installed_version(&self) -> Option<u32> {
        self.sdk.api.filter(|api| *api != 0)
    }

    fn set_installed_version(&mut self, version: u32) -> Result<()> {
        let previous = self.sdk.api.replace(version);
        if let Err(e) = self.save() {
            // The file still holds the previous version.
            self.sdk.api = previous;
            return Err(e);
        }
        info!("Recorded installed SDK version {}", version);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.installed_version(), None);
        assert_eq!(config.ui.progress_width, 30);
        assert!(config.file().is_none());
    }

    #[test]
    fn test_load_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = AppConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.file(), Some(path.as_path()));
        assert_eq!(config.installed_version(), None);
    }

    #[test]
    fn test_installed_version_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::load_from(&path).unwrap();
        config.set_installed_version(28).unwrap();

        let reloaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.installed_version(), Some(28));
    }

    #[test]
    fn test_zero_version_is_not_installed() {
        let mut config = AppConfig::default();
        config.sdk.api = Some(0);
        assert_eq!(config.installed_version(), None);
    }

    #[test]
    fn test_failed_save_keeps_previous_version() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the write fail.
        let path = dir.path().join("config.toml");
        let mut config = AppConfig::load_from(&path).unwrap();
        config.set_installed_version(26).unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(config.set_installed_version(28).is_err());
        assert_eq!(config.installed_version(), Some(26));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "version = \"not a number\"").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ApmError::TomlParse { .. }));
        assert!(err.user_message().contains("config.toml"));
    }
}
