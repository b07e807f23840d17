//! Advisory checks before exporting a script.
//!
//! Generation never consults this report; it exists so the user can see
//! unknown tokens, dangling macro references and wiring mismatches before
//! copying a script onto a board.

// Allow format! appended to String - more readable for building messages
#![allow(clippy::format_push_string)]

use crate::keycode_db::KeycodeDb;
use crate::models::{CellPos, KeyAssignment, Project};

/// Validation result with specific errors and warnings.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Problems that will likely break the script on the board
    pub errors: Vec<ValidationError>,
    /// Non-critical warnings
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Creates a new empty validation report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns true if there are no errors (warnings are allowed).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the report.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Formats the report as a user-friendly message.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut message = String::new();

        if !self.errors.is_empty() {
            message.push_str(&format!("❌ {} validation errors:\n", self.errors.len()));
            for (idx, error) in self.errors.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, error));
            }
        }

        if !self.warnings.is_empty() {
            message.push_str(&format!("\n⚠️  {} warnings:\n", self.warnings.len()));
            for (idx, warning) in self.warnings.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, warning));
            }
        }

        message
    }
}

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Type of validation error
    pub kind: ValidationErrorKind,
    /// Layer index where error occurred
    pub layer: Option<usize>,
    /// Grid cell where error occurred
    pub position: Option<CellPos>,
    /// Human-readable error message
    pub message: String,
    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            layer: None,
            position: None,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Sets the layer context.
    #[must_use]
    pub const fn with_layer(mut self, layer: usize) -> Self {
        self.layer = Some(layer);
        self
    }

    /// Sets the position context.
    #[must_use]
    pub const fn with_position(mut self, pos: CellPos) -> Self {
        self.position = Some(pos);
        self
    }

    /// Sets a suggestion for fixing the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.layer, self.position) {
            (Some(layer), Some(pos)) => write!(
                f,
                "[Layer {} ({}, {})] {}: {}",
                layer, pos.row, pos.col, self.kind, self.message
            )?,
            (Some(layer), None) => write!(f, "[Layer {}] {}: {}", layer, self.kind, self.message)?,
            _ => write!(f, "{}: {}", self.kind, self.message)?,
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n    → {suggestion}")?;
        }

        Ok(())
    }
}

/// Types of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Token not in the KMK keycode catalogue
    InvalidKeycode,
    /// Cell references a macro that does not exist
    MissingMacro,
    /// Pin count differs from the grid dimension it drives
    PinMismatch,
}

impl std::fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKeycode => write!(f, "Invalid Keycode"),
            Self::MissingMacro => write!(f, "Missing Macro"),
            Self::PinMismatch => write!(f, "Pin Mismatch"),
        }
    }
}

/// Validation warning (non-blocking).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Warning message
    pub message: String,
}

impl ValidationWarning {
    /// Creates a new validation warning
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Pre-export validator.
pub struct ScriptValidator<'a> {
    project: &'a Project,
    keycode_db: &'a KeycodeDb,
}

impl<'a> ScriptValidator<'a> {
    /// Creates a new validator.
    #[must_use]
    pub const fn new(project: &'a Project, keycode_db: &'a KeycodeDb) -> Self {
        Self {
            project,
            keycode_db,
        }
    }

    /// Runs every check.
    ///
    /// Checks:
    /// - Pin counts match rows and columns
    /// - Every cell holds a known token, combo or existing macro
    /// - Macro steps use known tokens; empty macros are flagged
    /// - Color map entries fall inside the grid
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.validate_pins(&mut report);
        self.validate_cells(&mut report);
        self.validate_macros(&mut report);
        self.validate_colors(&mut report);
        report
    }

    fn validate_pins(&self, report: &mut ValidationReport) {
        let hardware = self.project.hardware();
        let keymap = self.project.keymap();
        let checks = [
            ("column", hardware.col_pins.len(), keymap.cols()),
            ("row", hardware.row_pins.len(), keymap.rows()),
        ];
        for (what, pins, expected) in checks {
            if pins != expected {
                report.add_error(
                    ValidationError::new(
                        ValidationErrorKind::PinMismatch,
                        format!("{pins} {what} pins configured for {expected} {what}s"),
                    )
                    .with_suggestion(format!("List exactly one pin per {what}")),
                );
            }
        }
    }

    fn validate_cells(&self, report: &mut ValidationReport) {
        let macros = self.project.macros();
        for (layer, pos, text) in self.project.keymap().cells() {
            match KeyAssignment::parse(text) {
                KeyAssignment::MacroRef(name) => {
                    if !macros.contains(&name) {
                        report.add_error(
                            ValidationError::new(
                                ValidationErrorKind::MissingMacro,
                                format!("Macro '{name}' does not exist"),
                            )
                            .with_layer(layer)
                            .with_position(pos)
                            .with_suggestion("Create the macro or reassign the key"),
                        );
                    }
                }
                assignment => {
                    let token = assignment.base_token().unwrap_or(text);
                    if !self.keycode_db.is_valid(token) {
                        report.add_error(
                            ValidationError::new(
                                ValidationErrorKind::InvalidKeycode,
                                format!("Unknown keycode '{text}'"),
                            )
                            .with_layer(layer)
                            .with_position(pos)
                            .with_suggestion(suggest(self.keycode_db, token)),
                        );
                    }
                }
            }
        }
    }

    fn validate_macros(&self, report: &mut ValidationReport) {
        for (name, sequence) in self.project.macros().iter() {
            if sequence.is_empty() {
                report.add_warning(ValidationWarning::new(format!(
                    "Macro '{name}' has no actions"
                )));
            }
            for (step, action) in sequence.iter().enumerate() {
                let Some(code) = action.keycode() else {
                    continue;
                };
                if !self.keycode_db.is_valid(code) {
                    report.add_error(ValidationError::new(
                        ValidationErrorKind::InvalidKeycode,
                        format!("Macro '{name}' step {} uses unknown keycode '{code}'", step + 1),
                    ));
                }
            }
        }
    }

    fn validate_colors(&self, report: &mut ValidationReport) {
        let keymap = self.project.keymap();
        let extensions = self.project.extensions();
        for (layer, keys) in extensions.color_map.iter() {
            if layer >= keymap.layer_count() {
                report.add_warning(ValidationWarning::new(format!(
                    "Color map has entries for layer {layer}, which does not exist"
                )));
                continue;
            }
            let outside = keys.keys().filter(|&&idx| idx >= keymap.key_count()).count();
            if outside > 0 {
                report.add_warning(ValidationWarning::new(format!(
                    "Layer {layer} has {outside} key colors beyond the {} keys of the grid",
                    keymap.key_count()
                )));
            }
        }

        let settings = &extensions.lighting_settings;
        let stray = settings
            .underglow_colors
            .keys()
            .filter(|&&idx| idx >= settings.num_underglow)
            .count();
        if stray > 0 {
            report.add_warning(ValidationWarning::new(format!(
                "{stray} underglow colors are set beyond the {} underglow LEDs",
                settings.num_underglow
            )));
        }
    }
}

fn suggest(db: &KeycodeDb, token: &str) -> String {
    let bare = token.strip_prefix("KC.").unwrap_or(token);
    match db.search(bare).first() {
        Some(candidate) if !bare.is_empty() => format!("Did you mean {candidate}?"),
        _ => "Pick a key from `kmkpad keycodes`".to_string(),
    }
}
