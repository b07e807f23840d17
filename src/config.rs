//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::DEFAULT_TAP_THRESHOLD_MS;

/// Color theme of the configurator window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    /// Dark palette
    #[default]
    Dark,
    /// Light palette
    Light,
    /// Bright, saturated palette
    Cheerful,
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Directory holding the persisted keymap, macros, profiles and extension files
    pub save_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        let save_dir = Config::config_dir()
            .map(|dir| dir.join("kmk_Config_Save"))
            .unwrap_or_else(|_| PathBuf::from("kmk_Config_Save"));
        Self { save_dir }
    }
}

/// Macro recorder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Longest press, in milliseconds, recorded as a single tap
    pub tap_threshold_ms: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            tap_threshold_ms: DEFAULT_TAP_THRESHOLD_MS,
        }
    }
}

impl RecorderConfig {
    /// Tap threshold as a duration.
    #[must_use]
    pub const fn tap_threshold(&self) -> Duration {
        Duration::from_millis(self.tap_threshold_ms)
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Theme (Dark, Light, Cheerful)
    #[serde(default)]
    pub theme: Theme,
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/KmkPad/config.toml`
/// - macOS: `~/Library/Application Support/KmkPad/config.toml`
/// - Windows: `%APPDATA%\KmkPad\config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Recorder settings
    #[serde(default)]
    pub recorder: RecorderConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("KmkPad");

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the platform config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path; a missing file yields defaults.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the platform config file using atomic write.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit path using temp file + rename.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.recorder.tap_threshold_ms == 0 {
            anyhow::bail!("recorder.tap_threshold_ms must be greater than zero");
        }
        if self.paths.save_dir.as_os_str().is_empty() {
            anyhow::bail!("paths.save_dir cannot be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.recorder.tap_threshold_ms, 200);
        assert_eq!(config.recorder.tap_threshold(), Duration::from_millis(200));
        assert_eq!(config.ui.theme, Theme::Dark);
        assert!(config.paths.save_dir.ends_with("kmk_Config_Save"));
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::new();
        assert!(config.validate().is_ok());

        config.recorder.tap_threshold_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.paths.save_dir = temp_dir.path().join("store");
        config.recorder.tap_threshold_ms = 150;
        config.ui.theme = Theme::Cheerful;
        config.save_to(&config_file).unwrap();

        assert!(!config_file.with_extension("toml.tmp").exists());
        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[ui]\ntheme = \"Light\"\n").unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded.ui.theme, Theme::Light);
        assert_eq!(loaded.recorder.tap_threshold_ms, 200);
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::new());
    }

    #[test]
    fn test_config_rejects_zero_threshold_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[recorder]\ntap_threshold_ms = 0\n").unwrap();
        assert!(Config::load_from(&config_file).is_err());
    }
}
