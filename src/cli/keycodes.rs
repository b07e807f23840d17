//! Keycode catalogue listing.

use crate::cli::common::{print_json, CliError, CliResult};
use crate::keycode_db::KeycodeDb;
use clap::Args;
use serde::Serialize;

/// List KMK keycodes, optionally filtered by category or search text
#[derive(Debug, Clone, Args)]
pub struct KeycodesArgs {
    /// Only list this category (e.g. navigation, media)
    #[arg(short, long, value_name = "ID")]
    pub category: Option<String>,

    /// Case-insensitive substring search
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CategoryListing<'a> {
    id: &'a str,
    name: &'a str,
    codes: Vec<&'a str>,
}

impl KeycodesArgs {
    /// Execute the keycodes command
    pub fn execute(&self) -> CliResult<()> {
        let db = KeycodeDb::load()
            .map_err(|e| CliError::io(format!("Failed to load keycode database: {e}")))?;

        if let Some(id) = &self.category {
            if db.category(id).is_none() {
                let known: Vec<&str> = db.categories().iter().map(|c| c.id.as_str()).collect();
                return Err(CliError::validation(format!(
                    "Unknown category '{id}'. Known categories: {}",
                    known.join(", ")
                )));
            }
        }

        let matches: Vec<&str> = self
            .search
            .as_deref()
            .map(|q| db.search(q))
            .unwrap_or_default();

        let listings: Vec<CategoryListing> = db
            .categories()
            .iter()
            .filter(|c| self.category.as_deref().is_none_or(|id| c.id == id))
            .map(|c| CategoryListing {
                id: &c.id,
                name: &c.name,
                codes: c
                    .codes
                    .iter()
                    .map(String::as_str)
                    .filter(|code| self.search.is_none() || matches.contains(code))
                    .collect(),
            })
            .filter(|listing| !listing.codes.is_empty())
            .collect();

        if self.json {
            return print_json(&listings);
        }

        if listings.is_empty() {
            println!("No keycodes found");
            return Ok(());
        }
        for listing in &listings {
            println!("{} ({}):", listing.name, listing.id);
            for chunk in listing.codes.chunks(8) {
                println!("  {}", chunk.join(" "));
            }
        }
        Ok(())
    }
}
