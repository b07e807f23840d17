//! Validation command for the saved project.

use crate::cli::common::{
    print_json, CliError, CliResult, StoreArgs, ValidationChecks, ValidationLocation,
    ValidationMessage, ValidationPosition, ValidationResponse,
};
use crate::firmware::validator::{ScriptValidator, ValidationErrorKind};
use crate::keycode_db::KeycodeDb;
use clap::Args;

/// Check the saved project for unknown keys, missing macros and wiring mismatches
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Store selection
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as errors (exit non-zero)
    #[arg(long)]
    pub strict: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> CliResult<()> {
        let (_, project) = self.store.load_project()?;
        let keycode_db = KeycodeDb::load()
            .map_err(|e| CliError::io(format!("Failed to load keycode database: {e}")))?;

        let report = ScriptValidator::new(&project, &keycode_db).validate();

        let mut checks = ValidationChecks::all_passed();
        let mut messages = Vec::new();

        for error in &report.errors {
            let check = match error.kind {
                ValidationErrorKind::InvalidKeycode => &mut checks.keycodes,
                ValidationErrorKind::MissingMacro => &mut checks.macros,
                ValidationErrorKind::PinMismatch => &mut checks.wiring,
            };
            *check = "failed".to_string();

            let location = match (error.layer, error.position) {
                (Some(layer), Some(pos)) => Some(ValidationLocation {
                    layer,
                    position: ValidationPosition {
                        row: pos.row,
                        col: pos.col,
                    },
                }),
                _ => None,
            };

            messages.push(ValidationMessage {
                severity: "error".to_string(),
                message: error.message.clone(),
                location,
            });
        }

        for warning in &report.warnings {
            let check = if warning.message.starts_with("Macro") {
                &mut checks.macros
            } else {
                &mut checks.lighting
            };
            if *check == "passed" {
                *check = "warning".to_string();
            }

            messages.push(ValidationMessage {
                severity: "warning".to_string(),
                message: warning.message.clone(),
                location: None,
            });
        }

        let response = ValidationResponse {
            valid: report.is_valid(),
            errors: messages,
            checks,
        };

        if self.json {
            print_json(&response)?;
        } else {
            if response.valid {
                println!("✓ Validation passed");
            } else {
                println!("✗ Validation failed");
            }

            println!("\nChecks:");
            println!("  Keycodes: {}", response.checks.keycodes);
            println!("  Macros:   {}", response.checks.macros);
            println!("  Wiring:   {}", response.checks.wiring);
            println!("  Lighting: {}", response.checks.lighting);

            if !response.errors.is_empty() {
                println!("\nIssues:");
                for msg in &response.errors {
                    let prefix = if msg.severity == "error" { "  ✗" } else { "  ⚠" };
                    if let Some(loc) = &msg.location {
                        println!(
                            "{} [Layer {} ({}, {})] {}",
                            prefix, loc.layer, loc.position.row, loc.position.col, msg.message
                        );
                    } else {
                        println!("{} {}", prefix, msg.message);
                    }
                }
            }
        }

        if !response.valid {
            return Err(CliError::validation("Validation failed"));
        }

        if self.strict && !report.warnings.is_empty() {
            return Err(CliError::validation("Warnings found in strict mode"));
        }

        Ok(())
    }
}
