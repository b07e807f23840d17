//! Service layer: persistence and operations spanning several models.

pub mod coloring;
pub mod records;
pub mod store;

// Re-export commonly used types and functions
pub use coloring::{apply_color_target, color_project_layer};
pub use store::ConfigStore;
