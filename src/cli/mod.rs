//! CLI command handlers.
//!
//! This module provides headless, scriptable access to the project store
//! and script generator for automation and testing.

pub mod color;
pub mod common;
pub mod generate;
pub mod init;
pub mod keycodes;
pub mod macros;
pub mod profile;
pub mod validate;

// Re-export types used by main.rs and tests
pub use color::ColorArgs;
pub use common::{CliError, CliResult, ExitCode};
pub use generate::GenerateArgs;
pub use init::InitArgs;
pub use keycodes::KeycodesArgs;
pub use macros::MacrosArgs;
pub use profile::ProfileArgs;
pub use validate::ValidateArgs;
