//! Configuration module for tagfolio
//!
//! Settings are read from `<config_dir>/tagfolio/config.toml` and can be
//! overridden with `TAGFOLIO_*` environment variables, e.g.
//! `TAGFOLIO_PAGE_SIZE=50`. A missing config file is not an error; every
//! field has a default.
//!
//! ```toml
//! database = "/home/alice/.local/share/tagfolio/db"
//! session = "alice"
//! page_size = 20
//! related_limit = 10
//! similarity_threshold = 1
//! session_ttl_secs = 3600
//! quiet = false
//! ```

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "tagfolio";

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagfolioConfig {
    /// Database directory; defaults to the platform data directory
    pub database: Option<PathBuf>,

    /// Directory holding stored searches, one JSON file per search
    pub session_dir: Option<PathBuf>,

    /// Session name under which searches are stored
    pub session: Option<String>,

    /// Results per page when `--per-page` is not given
    pub page_size: usize,

    /// Number of related items returned when `--limit` is not given
    pub related_limit: usize,

    /// Minimum number of shared tags for two items to count as related
    pub similarity_threshold: usize,

    /// Stored searches older than this are discarded
    pub session_ttl_secs: u64,

    /// Suppress informational output by default
    pub quiet: bool,
}

impl Default for TagfolioConfig {
    fn default() -> Self {
        Self {
            database: None,
            session_dir: None,
            session: None,
            page_size: 20,
            related_limit: 10,
            similarity_threshold: 1,
            session_ttl_secs: 3600,
            quiet: false,
        }
    }
}

impl TagfolioConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join(APP_DIR).join("config.toml"))
    }

    /// Load configuration from the default location plus environment overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be parsed or a value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path` plus environment overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be parsed or a value has the wrong type.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("TAGFOLIO"))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Database directory, falling back to `<data_local_dir>/tagfolio/db`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no path is configured and the data directory cannot be determined.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("db")),
        }
    }

    /// Session directory, falling back to `<data_local_dir>/tagfolio/sessions`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no path is configured and the data directory cannot be determined.
    pub fn session_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.session_dir {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("sessions")),
        }
    }

    /// Session name, falling back to `$USER` and then `default`
    #[must_use]
    pub fn session_name(&self) -> String {
        self.session
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| std::env::var("USER").ok().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "default".to_string())
    }

    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

fn data_dir() -> Result<PathBuf, ConfigError> {
    Ok(dirs::data_local_dir()
        .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))?
        .join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = TagfolioConfig::default();
        assert!(config.database.is_none());
        assert_eq!(config.page_size, 20);
        assert_eq!(config.related_limit, 10);
        assert_eq!(config.similarity_threshold, 1);
        assert_eq!(config.session_ttl(), Duration::from_secs(3600));
        assert!(!config.quiet);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = TagfolioConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.page_size, TagfolioConfig::default().page_size);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "page_size = 5\nsession = \"alice\"\n").unwrap();

        let config = TagfolioConfig::load_from(&path).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.session_name(), "alice");
        assert_eq!(config.related_limit, 10);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = TagfolioConfig {
            database: Some(PathBuf::from("/tmp/tagfolio-db")),
            similarity_threshold: 2,
            quiet: true,
            ..TagfolioConfig::default()
        };

        config.save_to(&path).unwrap();
        let loaded = TagfolioConfig::load_from(&path).unwrap();

        assert_eq!(loaded.database, config.database);
        assert_eq!(loaded.similarity_threshold, 2);
        assert!(loaded.quiet);
    }

    #[test]
    fn test_invalid_value_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "page_size = \"many\"\n").unwrap();

        assert!(TagfolioConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_configured_paths_win() {
        let config = TagfolioConfig {
            database: Some(PathBuf::from("/data/db")),
            session_dir: Some(PathBuf::from("/data/sessions")),
            ..TagfolioConfig::default()
        };
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/data/db"));
        assert_eq!(config.session_dir().unwrap(), PathBuf::from("/data/sessions"));
    }

    #[test]
    fn test_blank_session_falls_back() {
        let config = TagfolioConfig {
            session: Some("  ".to_string()),
            ..TagfolioConfig::default()
        };
        assert!(!config.session_name().trim().is_empty());
    }
}
