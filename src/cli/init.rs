//! Init command: writes a fresh default project.

use crate::cli::common::{CliError, CliResult, StoreArgs};
use crate::constants::{DEFAULT_COLS, DEFAULT_COL_PINS, DEFAULT_ROWS, DEFAULT_ROW_PINS};
use crate::models::{HardwareProfile, HardwareSettings, Project};
use clap::Args;

/// Create a default project in the save directory
#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Store selection
    #[command(flatten)]
    pub store: StoreArgs,

    /// Grid rows
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Grid columns
    #[arg(long, default_value_t = DEFAULT_COLS)]
    pub cols: usize,

    /// Row pins, comma separated (defaults to the stock wiring)
    #[arg(long, value_name = "PINS", value_delimiter = ',')]
    pub row_pins: Vec<String>,

    /// Column pins, comma separated (defaults to the stock wiring)
    #[arg(long, value_name = "PINS", value_delimiter = ',')]
    pub col_pins: Vec<String>,

    /// Overwrite an existing configuration
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> CliResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(CliError::validation("Rows and columns must be at least 1"));
        }

        let store = self.store.open()?;
        if store.has_config() && !self.force {
            return Err(CliError::validation(format!(
                "A configuration already exists in {} (use --force to overwrite)",
                store.dir().display()
            )));
        }

        let profile = HardwareProfile {
            rows: self.rows,
            cols: self.cols,
            settings: HardwareSettings {
                row_pins: pick_pins("row", &self.row_pins, &DEFAULT_ROW_PINS, self.rows)?,
                col_pins: pick_pins("column", &self.col_pins, &DEFAULT_COL_PINS, self.cols)?,
                ..HardwareSettings::default()
            },
        };
        let mut project = Project::new();
        project.apply_profile(&profile);

        project
            .save(&store)
            .map_err(|e| CliError::io(format!("Failed to save project: {e:#}")))?;

        println!(
            "✓ Created {}x{} project in {}",
            self.rows,
            self.cols,
            store.dir().display()
        );
        Ok(())
    }
}

/// Explicit pins if given, else the first `count` stock pins.
fn pick_pins(what: &str, given: &[String], stock: &[&str], count: usize) -> CliResult<Vec<String>> {
    if !given.is_empty() {
        if given.len() != count {
            return Err(CliError::validation(format!(
                "Expected {count} {what} pins, got {}",
                given.len()
            )));
        }
        return Ok(given.iter().map(|p| p.trim().to_string()).collect());
    }
    if count > stock.len() {
        return Err(CliError::validation(format!(
            "The stock wiring has {} {what} pins; pass --{}-pins for {count}",
            stock.len(),
            if what == "row" { "row" } else { "col" }
        )));
    }
    Ok(stock[..count].iter().map(ToString::to_string).collect())
}
