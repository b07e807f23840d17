//! KMK macropad configurator library.
//!
//! This library provides the configuration model for a KMK-based macro
//! keypad: layered keymaps, a macro library with live recording, optional
//! extensions with per-key lighting, persistence, and generation of the
//! firmware `code.py` script.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod firmware;
pub mod keycode_db;
pub mod models;
pub mod recorder;
pub mod services;
