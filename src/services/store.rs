//! Persistent store: one directory of JSON records and opaque extension code.
//!
//! Loads report malformed content as [`ModelError::PersistedState`] so the
//! caller can fall back to defaults. Saves go through a temp file and an
//! atomic rename so a failed write never clobbers the previous record.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ModelError, ModelResult};
use crate::models::{ColorMap, ExtensionKind, HardwareProfile, LightingSettings, MacroLibrary};
use crate::services::records::{ConfigRecord, ExtensionFlags, ProfileBook};

/// Configuration record file.
pub const CONFIG_FILE: &str = "config.json";
/// Macro library file.
pub const MACROS_FILE: &str = "macros.json";
/// Hardware profiles file.
pub const PROFILES_FILE: &str = "profiles.json";
/// Extension flags file.
pub const EXTENSIONS_FILE: &str = "extensions.json";
/// Lighting settings file.
pub const LIGHTING_FILE: &str = "rgb_matrix.json";
/// Per-layer color map file.
pub const COLOR_MAP_FILE: &str = "color_map.json";

/// File holding the user code of an extension.
#[must_use]
pub const fn extension_code_file(kind: ExtensionKind) -> &'static str {
    match kind {
        ExtensionKind::Encoder => "encoder.py",
        ExtensionKind::AnalogIn => "analogin.py",
        ExtensionKind::Lighting => "rgb.py",
    }
}

/// Handle on a save directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Opens a store rooted at `dir`. Nothing is touched until the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Opens the store configured in the application settings.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.paths.save_dir.clone())
    }

    /// Root directory of the store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a file in the store.
    #[must_use]
    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// True if a configuration record has been saved.
    #[must_use]
    pub fn has_config(&self) -> bool {
        self.path(CONFIG_FILE).exists()
    }

    /// Loads the configuration record, if present.
    pub fn load_config(&self) -> ModelResult<Option<ConfigRecord>> {
        self.read_json(CONFIG_FILE, "configuration")
    }

    /// Saves the configuration record.
    pub fn save_config(&self, record: &ConfigRecord) -> Result<()> {
        self.write_json(CONFIG_FILE, record)
    }

    /// Loads the macro library; a missing file is an empty library.
    pub fn load_macros(&self) -> ModelResult<MacroLibrary> {
        Ok(self.read_json(MACROS_FILE, "macro library")?.unwrap_or_default())
    }

    /// Saves the macro library.
    pub fn save_macros(&self, library: &MacroLibrary) -> Result<()> {
        self.write_json(MACROS_FILE, library)
    }

    /// Loads saved hardware profiles.
    pub fn load_profiles(&self) -> ModelResult<ProfileBook> {
        Ok(self.read_json(PROFILES_FILE, "profile")?.unwrap_or_default())
    }

    /// Saves all hardware profiles.
    pub fn save_profiles(&self, profiles: &ProfileBook) -> Result<()> {
        self.write_json(PROFILES_FILE, profiles)
    }

    /// Adds or replaces one named profile.
    pub fn save_profile(&self, name: &str, profile: HardwareProfile) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("Profile name cannot be empty");
        }
        let mut profiles = self.load_profiles()?;
        profiles.insert(name.to_string(), profile);
        self.save_profiles(&profiles)?;
        info!(profile = name, "saved hardware profile");
        Ok(())
    }

    /// Deletes a named profile. Returns false if it did not exist.
    pub fn delete_profile(&self, name: &str) -> Result<bool> {
        let mut profiles = self.load_profiles()?;
        if profiles.remove(name).is_none() {
            return Ok(false);
        }
        self.save_profiles(&profiles)?;
        info!(profile = name, "deleted hardware profile");
        Ok(true)
    }

    /// Loads the extension flags; missing file or flags mean disabled.
    pub fn load_extension_flags(&self) -> ModelResult<ExtensionFlags> {
        Ok(self
            .read_json(EXTENSIONS_FILE, "extension settings")?
            .unwrap_or_default())
    }

    /// Saves the extension flags.
    pub fn save_extension_flags(&self, flags: &ExtensionFlags) -> Result<()> {
        self.write_json(EXTENSIONS_FILE, flags)
    }

    /// Loads an extension's user code; a missing file is empty code.
    pub fn load_extension_code(&self, kind: ExtensionKind) -> ModelResult<String> {
        let path = self.path(extension_code_file(kind));
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(ModelError::persisted(
                "extension code",
                format!("{}: {e}", path.display()),
            )),
        }
    }

    /// Saves an extension's user code.
    pub fn save_extension_code(&self, kind: ExtensionKind, code: &str) -> Result<()> {
        self.write_atomic(extension_code_file(kind), code)
    }

    /// Loads lighting settings, defaulting when absent.
    pub fn load_lighting(&self) -> ModelResult<LightingSettings> {
        Ok(self
            .read_json(LIGHTING_FILE, "lighting settings")?
            .unwrap_or_default())
    }

    /// Saves lighting settings.
    pub fn save_lighting(&self, settings: &LightingSettings) -> Result<()> {
        self.write_json(LIGHTING_FILE, settings)
    }

    /// Loads the color map, empty when absent.
    pub fn load_color_map(&self) -> ModelResult<ColorMap> {
        Ok(self.read_json(COLOR_MAP_FILE, "color map")?.unwrap_or_default())
    }

    /// Saves the color map.
    pub fn save_color_map(&self, map: &ColorMap) -> Result<()> {
        self.write_json(COLOR_MAP_FILE, map)
    }

    fn read_json<T: DeserializeOwned>(
        &self,
        file: &str,
        record: &'static str,
    ) -> ModelResult<Option<T>> {
        let path = self.path(file);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "record not present");
                return Ok(None);
            }
            Err(e) => {
                return Err(ModelError::persisted(
                    record,
                    format!("{}: {e}", path.display()),
                ))
            }
        };

        let value = serde_json::from_str(&content).map_err(|e| {
            ModelError::persisted(record, format!("{}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "loaded record");
        Ok(Some(value))
    }

    fn write_json<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {file}"))?;
        self.write_atomic(file, &content)
    }

    fn write_atomic(&self, file: &str, content: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).context(format!(
            "Failed to create save directory: {}",
            self.dir.display()
        ))?;

        let path = self.path(file);
        let temp_path = self.path(&format!("{file}.tmp"));

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp file: {}",
            temp_path.display()
        ))?;

        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e).context(format!("Failed to replace {}", path.display()));
        }

        debug!(path = %path.display(), "saved record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MacroAction, RgbColor};
    use tempfile::TempDir;

    #[test]
    fn test_missing_records_load_as_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path().join("never-created"));

        assert_eq!(store.load_config().unwrap(), None);
        assert!(store.load_macros().unwrap().is_empty());
        assert!(store.load_profiles().unwrap().is_empty());
        assert_eq!(store.load_extension_flags().unwrap(), ExtensionFlags::default());
        assert_eq!(store.load_extension_code(ExtensionKind::Encoder).unwrap(), "");
        assert!(store.load_color_map().unwrap().is_empty());
        assert!(!store.has_config());
    }

    #[test]
    fn test_save_creates_directory_and_leaves_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path().join("store"));

        let mut library = MacroLibrary::new();
        library.add("hello", vec![MacroAction::Text("hi".into())]).unwrap();
        store.save_macros(&library).unwrap();

        assert!(store.path(MACROS_FILE).exists());
        assert!(!store.path("macros.json.tmp").exists());
        assert_eq!(store.load_macros().unwrap(), library);
    }

    #[test]
    fn test_malformed_record_reports_persisted_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path());
        fs::write(store.path(MACROS_FILE), "{ not json").unwrap();

        let err = store.load_macros().unwrap_err();
        assert!(matches!(err, ModelError::PersistedState { record: "macro library", .. }));
    }

    #[test]
    fn test_profile_save_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path());

        store.save_profile("zeta", HardwareProfile::default()).unwrap();
        store.save_profile("alpha", HardwareProfile::default()).unwrap();
        assert!(store.save_profile("  ", HardwareProfile::default()).is_err());

        let names: Vec<String> = store.load_profiles().unwrap().into_keys().collect();
        assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);

        assert!(store.delete_profile("alpha").unwrap());
        assert!(!store.delete_profile("alpha").unwrap());
        assert_eq!(store.load_profiles().unwrap().len(), 1);
    }

    #[test]
    fn test_extension_code_and_color_map_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path());

        store
            .save_extension_code(ExtensionKind::AnalogIn, "slider = 1\n")
            .unwrap();
        assert_eq!(
            store.load_extension_code(ExtensionKind::AnalogIn).unwrap(),
            "slider = 1\n"
        );
        assert!(store.path("analogin.py").exists());

        let mut map = ColorMap::new();
        map.set(0, 2, RgbColor::new(1, 2, 3));
        store.save_color_map(&map).unwrap();
        assert_eq!(store.load_color_map().unwrap(), map);
    }

    #[test]
    fn test_failed_write_keeps_previous_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path());
        let flags = ExtensionFlags {
            enable_encoder: false,
            enable_analogin: false,
            enable_rgb: false,
        };
        store.save_extension_flags(&flags).unwrap();
        let before = fs::read_to_string(store.path(EXTENSIONS_FILE)).unwrap();

        // A directory squatting on the temp path makes the write fail.
        fs::create_dir(store.path("extensions.json.tmp")).unwrap();
        assert!(store
            .save_extension_flags(&ExtensionFlags {
                enable_rgb: true,
                ..flags
            })
            .is_err());
        assert_eq!(fs::read_to_string(store.path(EXTENSIONS_FILE)).unwrap(), before);
    }
}
