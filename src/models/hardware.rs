//! Matrix wiring settings and saved hardware profiles.

use crate::constants::{DEFAULT_COLS, DEFAULT_COL_PINS, DEFAULT_ROWS, DEFAULT_ROW_PINS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the switch-matrix diodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiodeOrientation {
    /// Current flows from columns to rows (the usual hand-wired pad)
    #[default]
    #[serde(rename = "COL2ROW")]
    Col2Row,
    /// Current flows from rows to columns
    #[serde(rename = "ROW2COL")]
    Row2Col,
}

impl DiodeOrientation {
    /// Name of the `DiodeOrientation` member in the firmware runtime.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Col2Row => "COL2ROW",
            Self::Row2Col => "ROW2COL",
        }
    }
}

impl fmt::Display for DiodeOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pin wiring of the key matrix.
///
/// Grid dimensions are owned by [`crate::models::KeymapModel`]; pin counts
/// are expected to match them but are not forced to (the validator reports
/// mismatches).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareSettings {
    /// Column pin labels, left to right (e.g. `board.GP0`)
    pub col_pins: Vec<String>,
    /// Row pin labels, top to bottom
    pub row_pins: Vec<String>,
    /// Diode direction
    #[serde(default)]
    pub diode_orientation: DiodeOrientation,
}

impl Default for HardwareSettings {
    fn default() -> Self {
        Self {
            col_pins: DEFAULT_COL_PINS.iter().map(ToString::to_string).collect(),
            row_pins: DEFAULT_ROW_PINS.iter().map(ToString::to_string).collect(),
            diode_orientation: DiodeOrientation::default(),
        }
    }
}

/// A saved hardware profile: dimensions plus wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareProfile {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Pin wiring
    #[serde(flatten)]
    pub settings: HardwareSettings,
}

impl Default for HardwareProfile {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            settings: HardwareSettings::default(),
        }
    }
}
