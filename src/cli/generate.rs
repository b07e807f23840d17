//! Generate command for the firmware script.

use crate::cli::common::{CliError, CliResult, StoreArgs};
use crate::firmware::ScriptGenerator;
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Generate the KMK code.py script from the saved project
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Store selection
    #[command(flatten)]
    pub store: StoreArgs,

    /// Write the script to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self) -> CliResult<()> {
        let (_, project) = self.store.load_project()?;
        let script = ScriptGenerator::for_project(&project).generate();

        match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| {
                        CliError::io(format!("Failed to create {}: {e}", parent.display()))
                    })?;
                }
                fs::write(path, &script).map_err(|e| {
                    CliError::io(format!("Failed to write {}: {e}", path.display()))
                })?;
                eprintln!("✓ Wrote {}", path.display());
            }
            None => print!("{script}"),
        }
        Ok(())
    }
}
