//! Hardware profile commands.
//!
//! Profiles store grid dimensions and pin wiring under a name so a pad's
//! hardware can be switched without touching the keymap by hand.

use crate::cli::common::{print_json, CliError, CliResult, StoreArgs};
use clap::{Args, Subcommand};

/// Save, load, delete or list hardware profiles
#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    /// Profile subcommand
    #[command(subcommand)]
    pub command: ProfileCommand,
}

/// Profile subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum ProfileCommand {
    /// Save the current wiring and dimensions under a name
    Save(NamedProfileArgs),
    /// Apply a saved profile to the project (resizes the grid)
    Load(NamedProfileArgs),
    /// Delete a saved profile
    Delete(NamedProfileArgs),
    /// List saved profiles
    List(ListProfilesArgs),
}

/// A profile command that takes a name
#[derive(Debug, Clone, Args)]
pub struct NamedProfileArgs {
    /// Profile name
    pub name: String,

    /// Store selection
    #[command(flatten)]
    pub store: StoreArgs,
}

/// List saved profiles
#[derive(Debug, Clone, Args)]
pub struct ListProfilesArgs {
    /// Store selection
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ProfileArgs {
    /// Execute the profile command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ProfileCommand::Save(args) => save(args),
            ProfileCommand::Load(args) => load(args),
            ProfileCommand::Delete(args) => delete(args),
            ProfileCommand::List(args) => list(args),
        }
    }
}

fn save(args: &NamedProfileArgs) -> CliResult<()> {
    let (store, project) = args.store.load_project_for_edit()?;
    store
        .save_profile(&args.name, project.profile())
        .map_err(|e| CliError::io(format!("Failed to save profile: {e:#}")))?;
    println!("✓ Saved profile '{}'", args.name.trim());
    Ok(())
}

fn load(args: &NamedProfileArgs) -> CliResult<()> {
    let (store, mut project) = args.store.load_project_for_edit()?;
    let profiles = store.load_profiles()?;
    let profile = profiles
        .get(args.name.trim())
        .ok_or_else(|| CliError::validation(format!("No profile named '{}'", args.name)))?;

    project.apply_profile(profile);
    project
        .save_config(&store)
        .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;
    println!(
        "✓ Applied profile '{}' ({}x{})",
        args.name.trim(),
        profile.rows,
        profile.cols
    );
    Ok(())
}

fn delete(args: &NamedProfileArgs) -> CliResult<()> {
    let store = args.store.open()?;
    let removed = store
        .delete_profile(args.name.trim())
        .map_err(|e| CliError::io(format!("Failed to delete profile: {e:#}")))?;
    if !removed {
        return Err(CliError::validation(format!("No profile named '{}'", args.name)));
    }
    println!("✓ Deleted profile '{}'", args.name.trim());
    Ok(())
}

fn list(args: &ListProfilesArgs) -> CliResult<()> {
    let store = args.store.open()?;
    let profiles = store.load_profiles()?;

    if args.json {
        return print_json(&profiles);
    }
    if profiles.is_empty() {
        println!("No saved profiles");
        return Ok(());
    }
    for (name, profile) in &profiles {
        println!(
            "{name}: {}x{}, {}, rows {}, cols {}",
            profile.rows,
            profile.cols,
            profile.settings.diode_orientation,
            profile.settings.row_pins.join(" "),
            profile.settings.col_pins.join(" ")
        );
    }
    Ok(())
}
