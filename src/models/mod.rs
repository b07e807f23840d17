//! Data models for the keypad configuration.
//!
//! These types hold the keymap, macros, wiring and extension state, and
//! enforce the invariants between them. They do no I/O; persistence lives in
//! [`crate::services`].

pub mod assignment;
pub mod category;
pub mod extensions;
pub mod hardware;
pub mod keymap;
pub mod macros;
pub mod project;
pub mod rgb;
pub mod session;

// Re-export all model types
pub use assignment::{KeyAssignment, Modifier};
pub use category::{ColorTarget, KeyCategory, KeyGroup};
pub use extensions::{
    ColorMap, ExtensionConfig, ExtensionConfigs, ExtensionKind, LightingSettings, RgbOrder,
};
pub use hardware::{DiodeOrientation, HardwareProfile, HardwareSettings};
pub use keymap::{CellPos, Grid, KeymapModel};
pub use macros::{MacroAction, MacroLibrary};
pub use project::Project;
pub use rgb::RgbColor;
pub use session::SessionContext;
