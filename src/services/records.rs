//! Shapes of the persisted records.
//!
//! These types mirror the JSON files in the save directory. Converting them
//! into model types is where malformed content is rejected.

use crate::error::{ModelError, ModelResult};
use crate::models::{
    DiodeOrientation, ExtensionConfigs, ExtensionKind, Grid, HardwareProfile, HardwareSettings,
    KeymapModel,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration record (`config.json`): wiring, dimensions and every layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Column pin labels
    pub col_pins: Vec<String>,
    /// Row pin labels
    pub row_pins: Vec<String>,
    /// Diode direction
    #[serde(default)]
    pub diode_orientation: DiodeOrientation,
    /// `[layer][row][col]` cell texts
    #[serde(default)]
    pub keymap_data: Vec<Grid>,
}

impl ConfigRecord {
    /// Snapshots the current hardware and keymap.
    #[must_use]
    pub fn capture(hardware: &HardwareSettings, keymap: &KeymapModel) -> Self {
        Self {
            rows: keymap.rows(),
            cols: keymap.cols(),
            col_pins: hardware.col_pins.clone(),
            row_pins: hardware.row_pins.clone(),
            diode_orientation: hardware.diode_orientation,
            keymap_data: keymap.layers().to_vec(),
        }
    }

    /// Converts into model types, adapting layers to `rows x cols`.
    pub fn into_parts(self) -> ModelResult<(HardwareSettings, KeymapModel)> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ModelError::persisted(
                "configuration",
                format!("grid must be at least 1x1, got {}x{}", self.rows, self.cols),
            ));
        }
        let hardware = HardwareSettings {
            col_pins: self.col_pins,
            row_pins: self.row_pins,
            diode_orientation: self.diode_orientation,
        };
        let keymap = KeymapModel::from_layers(self.rows, self.cols, self.keymap_data);
        Ok((hardware, keymap))
    }
}

/// Extension enable flags (`extensions.json`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionFlags {
    /// Rotary encoder enabled
    pub enable_encoder: bool,
    /// Analog input enabled
    pub enable_analogin: bool,
    /// RGB matrix enabled
    pub enable_rgb: bool,
}

impl ExtensionFlags {
    /// Reads the flags from the live extension state.
    #[must_use]
    pub const fn capture(extensions: &ExtensionConfigs) -> Self {
        Self {
            enable_encoder: extensions.is_enabled(ExtensionKind::Encoder),
            enable_analogin: extensions.is_enabled(ExtensionKind::AnalogIn),
            enable_rgb: extensions.is_enabled(ExtensionKind::Lighting),
        }
    }

    /// Flag for one extension.
    #[must_use]
    pub const fn get(&self, kind: ExtensionKind) -> bool {
        match kind {
            ExtensionKind::Encoder => self.enable_encoder,
            ExtensionKind::AnalogIn => self.enable_analogin,
            ExtensionKind::Lighting => self.enable_rgb,
        }
    }

    /// Writes the flags into the live extension state.
    pub fn apply(&self, extensions: &mut ExtensionConfigs) {
        for kind in ExtensionKind::ALL {
            extensions.set_enabled(kind, self.get(kind));
        }
    }
}

/// Saved hardware profiles (`profiles.json`), sorted by name.
pub type ProfileBook = BTreeMap<String, HardwareProfile>;
