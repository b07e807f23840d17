//! Shared CLI plumbing: exit codes, errors, store selection and JSON shapes.

use crate::config::Config;
use crate::error::ModelError;
use crate::models::Project;
use crate::services::ConfigStore;
use clap::Args;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Input or project failed validation
    Validation = 1,
    /// File system or serialization failure
    Io = 2,
}

/// A CLI failure with the exit code it maps to.
#[derive(Debug, Clone)]
pub struct CliError {
    /// Exit code to terminate with
    pub code: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Validation failure (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// I/O failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Io,
            message: message.into(),
        }
    }

    /// Numeric process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.code as i32
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<ModelError> for CliError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::PersistedState { .. } => Self::io(err.to_string()),
            ModelError::Validation(_) | ModelError::InvalidOperation(_) => {
                Self::validation(err.to_string())
            }
        }
    }
}

/// Result alias for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// `--dir` option shared by every command that touches the store.
#[derive(Debug, Clone, Default, Args)]
pub struct StoreArgs {
    /// Save directory (defaults to `paths.save_dir` from the app config)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

impl StoreArgs {
    /// Opens the selected store.
    pub fn open(&self) -> CliResult<ConfigStore> {
        if let Some(dir) = &self.dir {
            return Ok(ConfigStore::new(dir.clone()));
        }
        let config =
            Config::load().map_err(|e| CliError::io(format!("Failed to load config: {e:#}")))?;
        Ok(ConfigStore::from_config(&config))
    }

    /// Opens the store and loads the project for reading.
    ///
    /// Malformed records are reported on stderr; their part of the project
    /// falls back to defaults.
    pub fn load_project(&self) -> CliResult<(ConfigStore, Project)> {
        let (store, project, errors) = self.load_with_errors()?;
        for error in &errors {
            eprintln!("Warning: {error}");
        }
        Ok((store, project))
    }

    /// Opens the store and loads the project for a command that saves.
    ///
    /// Fails if any record is malformed, so defaults are never written over
    /// a record the user can still repair.
    pub fn load_project_for_edit(&self) -> CliResult<(ConfigStore, Project)> {
        let (store, project, errors) = self.load_with_errors()?;
        if !errors.is_empty() {
            let details: Vec<String> = errors.iter().map(|e| format!("  - {e}")).collect();
            return Err(CliError::io(format!(
                "Refusing to save over malformed records in {}:\n{}",
                store.dir().display(),
                details.join("\n")
            )));
        }
        Ok((store, project))
    }

    fn load_with_errors(&self) -> CliResult<(ConfigStore, Project, Vec<ModelError>)> {
        let store = self.open()?;
        if !store.has_config() {
            return Err(CliError::io(format!(
                "No configuration in {} (run `kmkpad init` first)",
                store.dir().display()
            )));
        }
        let (project, errors) = Project::load(&store);
        Ok((store, project, errors))
    }
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
    );
    Ok(())
}

/// JSON output of `validate`.
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    /// True if there are no errors
    pub valid: bool,
    /// Errors and warnings
    pub errors: Vec<ValidationMessage>,
    /// Per-check status
    pub checks: ValidationChecks,
}

/// One error or warning.
#[derive(Debug, Serialize)]
pub struct ValidationMessage {
    /// `error` or `warning`
    pub severity: String,
    /// Human-readable text
    pub message: String,
    /// Cell the message refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ValidationLocation>,
}

/// Layer and cell of a message.
#[derive(Debug, Serialize)]
pub struct ValidationLocation {
    /// Layer index
    pub layer: usize,
    /// Cell position
    pub position: ValidationPosition,
}

/// Row and column of a cell.
#[derive(Debug, Serialize)]
pub struct ValidationPosition {
    /// Row
    pub row: usize,
    /// Column
    pub col: usize,
}

/// Status of each check group: `passed`, `failed` or `warning`.
#[derive(Debug, Serialize)]
pub struct ValidationChecks {
    /// Keycode tokens
    pub keycodes: String,
    /// Macro references and macro steps
    pub macros: String,
    /// Pin counts
    pub wiring: String,
    /// Color map and underglow indices
    pub lighting: String,
}

impl ValidationChecks {
    /// All checks passed.
    #[must_use]
    pub fn all_passed() -> Self {
        Self {
            keycodes: "passed".to_string(),
            macros: "passed".to_string(),
            wiring: "passed".to_string(),
            lighting: "passed".to_string(),
        }
    }
}
