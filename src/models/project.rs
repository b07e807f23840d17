//! The editing aggregate: hardware, keymap, macros and extensions together.
//!
//! Operations that must keep several parts consistent (macro renames and
//! removals rewriting key references, layer removal shifting the color map)
//! live here so they happen as one step.

use anyhow::Result;
use tracing::{debug, info};

use crate::error::{ModelError, ModelResult};
use crate::models::{
    ExtensionConfigs, ExtensionKind, HardwareProfile, HardwareSettings, KeymapModel,
    MacroAction, MacroLibrary,
};
use crate::services::records::{ConfigRecord, ExtensionFlags};
use crate::services::ConfigStore;

/// Everything that feeds the script generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    hardware: HardwareSettings,
    keymap: KeymapModel,
    macros: MacroLibrary,
    extensions: ExtensionConfigs,
}

impl Project {
    /// A fresh 5x4 project with default wiring and no macros.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a project from already-built parts.
    ///
    /// Cells are taken as they are. A reference to a macro that is not in
    /// the library is kept; the generator emits it verbatim and the
    /// validator reports it.
    #[must_use]
    pub const fn from_parts(
        hardware: HardwareSettings,
        keymap: KeymapModel,
        macros: MacroLibrary,
        extensions: ExtensionConfigs,
    ) -> Self {
        Self {
            hardware,
            keymap,
            macros,
            extensions,
        }
    }

    /// Matrix wiring.
    #[must_use]
    pub const fn hardware(&self) -> &HardwareSettings {
        &self.hardware
    }

    /// Mutable matrix wiring.
    pub fn hardware_mut(&mut self) -> &mut HardwareSettings {
        &mut self.hardware
    }

    /// Key grid.
    #[must_use]
    pub const fn keymap(&self) -> &KeymapModel {
        &self.keymap
    }

    /// Mutable key grid.
    ///
    /// Prefer [`Project::remove_layer`] over removing layers directly so the
    /// color map stays aligned.
    pub fn keymap_mut(&mut self) -> &mut KeymapModel {
        &mut self.keymap
    }

    /// Macro library (read-only; edit through the macro methods below).
    #[must_use]
    pub const fn macros(&self) -> &MacroLibrary {
        &self.macros
    }

    /// Extension state.
    #[must_use]
    pub const fn extensions(&self) -> &ExtensionConfigs {
        &self.extensions
    }

    /// Mutable extension state.
    pub fn extensions_mut(&mut self) -> &mut ExtensionConfigs {
        &mut self.extensions
    }

    /// Current dimensions and wiring as a profile.
    #[must_use]
    pub fn profile(&self) -> HardwareProfile {
        HardwareProfile {
            rows: self.keymap.rows(),
            cols: self.keymap.cols(),
            settings: self.hardware.clone(),
        }
    }

    /// Applies a saved profile: new wiring and a resized grid.
    pub fn apply_profile(&mut self, profile: &HardwareProfile) {
        self.hardware = profile.settings.clone();
        self.keymap.resize(profile.rows, profile.cols);
    }

    /// Removes a layer and shifts the color map entries of later layers.
    pub fn remove_layer(&mut self, index: usize) -> ModelResult<()> {
        self.keymap.remove_layer(index)?;
        self.extensions.color_map.remove_layer(index);
        Ok(())
    }

    /// Adds a macro; returns its normalized name.
    pub fn add_macro(&mut self, name: &str, sequence: Vec<MacroAction>) -> ModelResult<String> {
        let name = self.macros.add(name, sequence)?;
        info!(macro_name = %name, "added macro");
        Ok(name)
    }

    /// Renames a macro and every key reference to it.
    ///
    /// Nothing changes if the new name is rejected.
    pub fn rename_macro(&mut self, old: &str, new_name: &str) -> ModelResult<String> {
        let name = self.macros.rename(old, new_name)?;
        if name != old {
            let rewritten = self.keymap.rename_macro_references(old, &name);
            info!(from = old, to = %name, rewritten, "renamed macro");
        }
        Ok(name)
    }

    /// Replaces a macro's sequence and optionally renames it.
    ///
    /// The name is validated before anything is touched.
    pub fn update_macro(
        &mut self,
        old: &str,
        new_name: &str,
        sequence: Vec<MacroAction>,
    ) -> ModelResult<String> {
        if !self.macros.contains(old) {
            return Err(ModelError::invalid_operation(format!("No macro named '{old}'")));
        }
        self.macros.check_name(new_name, Some(old))?;
        let name = self.rename_macro(old, new_name)?;
        self.macros.replace_sequence(&name, sequence)?;
        Ok(name)
    }

    /// Removes a macro; every reference to it becomes the default key.
    pub fn remove_macro(&mut self, name: &str) -> ModelResult<Vec<MacroAction>> {
        let sequence = self
            .macros
            .remove(name)
            .ok_or_else(|| ModelError::invalid_operation(format!("No macro named '{name}'")))?;
        let cleared = self.keymap.clear_macro_references(name);
        info!(macro_name = name, cleared, "removed macro");
        Ok(sequence)
    }

    /// Loads every record from the store.
    ///
    /// Records load independently: a malformed one is reported in the
    /// returned list and its part of the project keeps its default.
    pub fn load(store: &ConfigStore) -> (Self, Vec<ModelError>) {
        let mut errors = Vec::new();

        let (hardware, keymap) = keep(
            &mut errors,
            store
                .load_config()
                .and_then(|record| record.map(ConfigRecord::into_parts).transpose()),
        )
        .flatten()
        .unwrap_or_default();

        let macros: MacroLibrary = keep(&mut errors, store.load_macros()).unwrap_or_default();

        let mut extensions = ExtensionConfigs::new();
        if let Some(flags) = keep(&mut errors, store.load_extension_flags()) {
            flags.apply(&mut extensions);
        }
        for kind in ExtensionKind::ALL {
            if let Some(code) = keep(&mut errors, store.load_extension_code(kind)) {
                extensions.set_code(kind, code);
            }
        }
        if let Some(settings) = keep(&mut errors, store.load_lighting()) {
            extensions.lighting_settings = settings;
        }
        if let Some(map) = keep(&mut errors, store.load_color_map()) {
            extensions.color_map = map;
        }

        info!(dir = %store.dir().display(), failed = errors.len(), "loaded project");
        (Self::from_parts(hardware, keymap, macros, extensions), errors)
    }

    /// Saves every record to the store.
    pub fn save(&self, store: &ConfigStore) -> Result<()> {
        self.save_config(store)?;
        store.save_macros(&self.macros)?;
        store.save_extension_flags(&ExtensionFlags::capture(&self.extensions))?;
        for kind in ExtensionKind::ALL {
            store.save_extension_code(kind, &self.extensions.get(kind).code)?;
        }
        self.save_lighting(store)?;
        info!(dir = %store.dir().display(), "saved project");
        Ok(())
    }

    /// Saves only the configuration record (wiring, dimensions, keymap).
    pub fn save_config(&self, store: &ConfigStore) -> Result<()> {
        store.save_config(&ConfigRecord::capture(&self.hardware, &self.keymap))
    }

    /// Saves only the lighting settings and the color map.
    pub fn save_lighting(&self, store: &ConfigStore) -> Result<()> {
        store.save_lighting(&self.extensions.lighting_settings)?;
        store.save_color_map(&self.extensions.color_map)
    }
}

/// Unwraps a load result, recording the error for the caller.
fn keep<T>(errors: &mut Vec<ModelError>, result: ModelResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "falling back to default");
            errors.push(e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_KEY;
    use crate::models::{CellPos, RgbColor};

    fn tap(code: &str) -> MacroAction {
        MacroAction::Tap(code.to_string())
    }

    fn project_with_foo() -> Project {
        let mut project = Project::new();
        project.add_macro("foo", vec![tap("KC.A")]).unwrap();
        project.keymap_mut().add_layer();
        project.keymap_mut().set_cell(0, CellPos::new(0, 0), "MACRO(FOO)");
        project.keymap_mut().set_cell(1, CellPos::new(2, 3), "MACRO(FOO)");
        project
    }

    #[test]
    fn test_rename_cascades_to_every_layer() {
        let mut project = project_with_foo();
        assert_eq!(project.rename_macro("FOO", "bar").unwrap(), "BAR");
        assert_eq!(project.keymap().cell(0, CellPos::new(0, 0)), "MACRO(BAR)");
        assert_eq!(project.keymap().cell(1, CellPos::new(2, 3)), "MACRO(BAR)");
        assert_eq!(project.macros().get("BAR"), Some(&[tap("KC.A")][..]));
        assert!(!project.macros().contains("FOO"));
    }

    #[test]
    fn test_rejected_rename_changes_nothing() {
        let mut project = project_with_foo();
        project.add_macro("bar", Vec::new()).unwrap();
        let before = project.clone();
        assert!(project.rename_macro("FOO", "BAR").is_err());
        assert!(project.rename_macro("FOO", "9lives").is_err());
        assert_eq!(project, before);
    }

    #[test]
    fn test_remove_macro_clears_references() {
        let mut project = project_with_foo();
        assert_eq!(project.remove_macro("FOO").unwrap(), vec![tap("KC.A")]);
        assert_eq!(project.keymap().cell(0, CellPos::new(0, 0)), DEFAULT_KEY);
        assert_eq!(project.keymap().cell(1, CellPos::new(2, 3)), DEFAULT_KEY);
        assert!(project.remove_macro("FOO").is_err());
    }

    #[test]
    fn test_update_macro_validates_before_mutating() {
        let mut project = project_with_foo();
        project.add_macro("taken", Vec::new()).unwrap();
        let before = project.clone();
        assert!(project
            .update_macro("FOO", "taken", vec![MacroAction::Delay(5)])
            .is_err());
        assert_eq!(project, before);

        let name = project
            .update_macro("FOO", "fresh", vec![MacroAction::Delay(5)])
            .unwrap();
        assert_eq!(name, "FRESH");
        assert_eq!(project.macros().get("FRESH"), Some(&[MacroAction::Delay(5)][..]));
        assert_eq!(project.keymap().count_macro_references("FRESH"), 2);

        project
            .update_macro("FRESH", "FRESH", vec![tap("KC.B")])
            .unwrap();
        assert_eq!(project.macros().get("FRESH"), Some(&[tap("KC.B")][..]));
    }

    #[test]
    fn test_from_parts_keeps_references_to_missing_macros() {
        let mut keymap = KeymapModel::new(1, 2);
        keymap.set_cell(0, CellPos::new(0, 1), "MACRO(GHOST)");
        let project = Project::from_parts(
            HardwareSettings::default(),
            keymap,
            MacroLibrary::new(),
            ExtensionConfigs::new(),
        );
        assert_eq!(project.keymap().cell(0, CellPos::new(0, 1)), "MACRO(GHOST)");
        assert_eq!(project.keymap().count_macro_references("GHOST"), 1);
    }

    #[test]
    fn test_remove_layer_shifts_colors() {
        let mut project = Project::new();
        project.keymap_mut().add_layer();
        project.keymap_mut().add_layer();
        project.extensions_mut().color_map.set(2, 0, RgbColor::WHITE);
        project.remove_layer(1).unwrap();
        assert_eq!(project.extensions().color_map.get(1, 0), Some(RgbColor::WHITE));

        project.remove_layer(0).unwrap();
        assert!(project.remove_layer(0).is_err());
    }

    #[test]
    fn test_apply_profile_resizes() {
        let mut project = Project::new();
        let mut profile = project.profile();
        profile.rows = 2;
        profile.cols = 2;
        profile.settings.row_pins.truncate(2);
        profile.settings.col_pins.truncate(2);
        project.apply_profile(&profile);
        assert_eq!(project.keymap().key_count(), 4);
        assert_eq!(project.profile(), profile);
    }
}
