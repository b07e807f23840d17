//! Firmware script generation.
//!
//! This module renders the KMK `code.py` script from a project and runs the
//! advisory checks that can be shown before a script is exported.

pub mod generator;
pub mod templates;
pub mod validator;

/// Name of the per-layer color lookup the generator defines in the script.
pub const COLOR_LOOKUP_NAME: &str = "LAYER_KEY_COLORS";

// Re-export firmware types
pub use generator::ScriptGenerator;
pub use validator::{ScriptValidator, ValidationReport};
