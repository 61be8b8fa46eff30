//! Configuration management for tasklist.
//!
//! Loads configuration from ${TASKLIST_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Layout and timing knobs for the task list.
///
/// Paddings are in terminal cells: `menu_padding` rows below the list while
/// the last task's menu is open, `scrollbar_padding` columns on the right
/// while content overflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub menu_padding: u16,
    pub scrollbar_padding: u16,
    pub debounce_ms: u64,
    pub loading_floor_ms: u64,
}

impl ListConfig {
    const DEFAULT_MENU_PADDING: u16 = 4;
    const DEFAULT_SCROLLBAR_PADDING: u16 = 1;
    const DEFAULT_DEBOUNCE_MS: u64 = 50;
    const DEFAULT_LOADING_FLOOR_MS: u64 = 500;

    /// Quiet window shared by the padding and scroll timers.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Minimum loading-indicator time after the fetch settles.
    pub fn loading_floor(&self) -> Duration {
        Duration::from_millis(self.loading_floor_ms)
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            menu_padding: Self::DEFAULT_MENU_PADDING,
            scrollbar_padding: Self::DEFAULT_SCROLLBAR_PADDING,
            debounce_ms: Self::DEFAULT_DEBOUNCE_MS,
            loading_floor_ms: Self::DEFAULT_LOADING_FLOOR_MS,
        }
    }
}

/// Where the reference store reads tasks from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding an array of tasks. Demo tasks when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks_file: Option<PathBuf>,
    /// Artificial latency applied to every fetch.
    pub latency_ms: u64,
}

impl StoreConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `TASKLIST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub mod paths {
    //! Path resolution for tasklist configuration and data directories.
    //!
    //! TASKLIST_HOME resolution order:
    //! 1. TASKLIST_HOME environment variable (if set)
    //! 2. ~/.config/tasklist (default)
    //! 3. ./.tasklist when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the tasklist home directory.
    pub fn tasklist_home() -> PathBuf {
        if let Ok(home) = std::env::var("TASKLIST_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".tasklist"),
            |h| h.join(".config").join("tasklist"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        tasklist_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        tasklist_home().join("logs")
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub list: ListConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub log: LogConfig,
}

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default config template to `path`.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.list.debounce(), Duration::from_millis(50));
        assert_eq!(config.list.loading_floor(), Duration::from_millis(500));
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "[list]\nmenu_padding = 7\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.list.menu_padding, 7);
        assert_eq!(config.list.scrollbar_padding, 1);
        assert_eq!(config.log.level, "info");
        assert!(config.store.tasks_file.is_none());
    }

    #[test]
    fn test_load_invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[list\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }
}
