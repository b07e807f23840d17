//! Bulk key coloring command.

use crate::cli::common::{CliError, CliResult, StoreArgs};
use crate::keycode_db::KeycodeDb;
use crate::models::{ColorTarget, RgbColor};
use crate::services::color_project_layer;
use clap::Args;

/// Color every key of a category or group on one layer
#[derive(Debug, Clone, Args)]
pub struct ColorArgs {
    /// Store selection
    #[command(flatten)]
    pub store: StoreArgs,

    /// Category or group ID (e.g. navigation, macro, letters)
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Layer to color
    #[arg(short, long, default_value_t = 0)]
    pub layer: usize,

    /// Color to use and remember for the target (#RRGGBB)
    #[arg(long, value_name = "HEX")]
    pub color: Option<String>,
}

impl ColorArgs {
    /// Execute the color command
    pub fn execute(&self) -> CliResult<()> {
        let target: ColorTarget = self.target.parse().map_err(CliError::validation)?;
        let (store, mut project) = self.store.load_project_for_edit()?;
        if self.layer >= project.keymap().layer_count() {
            return Err(CliError::validation(format!(
                "Layer {} does not exist (project has {})",
                self.layer,
                project.keymap().layer_count()
            )));
        }

        if let Some(hex) = &self.color {
            let color = RgbColor::from_hex(hex)
                .map_err(|e| CliError::validation(format!("Invalid color '{hex}': {e}")))?;
            project
                .extensions_mut()
                .lighting_settings
                .category_colors
                .insert(target.id().to_string(), color);
        }

        let db = KeycodeDb::load()
            .map_err(|e| CliError::io(format!("Failed to load keycode database: {e}")))?;
        let colored = color_project_layer(&mut project, self.layer, target, &db);

        project
            .save_lighting(&store)
            .map_err(|e| CliError::io(format!("Failed to save colors: {e:#}")))?;
        println!(
            "✓ Colored {colored} {} keys on layer {}",
            target.label(),
            self.layer
        );
        Ok(())
    }
}
