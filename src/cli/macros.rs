//! Macro library listing.

use crate::cli::common::{print_json, CliResult, StoreArgs};
use clap::Args;
use serde::Serialize;

/// List the macros in the saved project
#[derive(Debug, Clone, Args)]
pub struct MacrosArgs {
    /// Store selection
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct MacroListing {
    name: String,
    steps: Vec<String>,
    references: usize,
}

impl MacrosArgs {
    /// Execute the macros command
    pub fn execute(&self) -> CliResult<()> {
        let (_, project) = self.store.load_project()?;

        let listings: Vec<MacroListing> = project
            .macros()
            .iter()
            .map(|(name, sequence)| MacroListing {
                name: name.to_string(),
                steps: sequence.iter().map(ToString::to_string).collect(),
                references: project.keymap().count_macro_references(name),
            })
            .collect();

        if self.json {
            return print_json(&listings);
        }

        if listings.is_empty() {
            println!("No macros defined");
            return Ok(());
        }
        for listing in &listings {
            println!(
                "{} ({} steps, used by {} keys)",
                listing.name,
                listing.steps.len(),
                listing.references
            );
            for step in &listing.steps {
                println!("  {step}");
            }
        }
        Ok(())
    }
}
