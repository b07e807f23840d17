//! KMK keycode catalogue and validation.
//!
//! This module provides access to the embedded keycode catalogue, category
//! tables used by category coloring, and token validation for the advisory
//! validator.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A category of keycodes with its fixed token table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeycodeCategory {
    /// Category ID (e.g., "basic", "navigation")
    pub id: String,
    /// Display name (e.g., "Basic", "Navigation")
    pub name: String,
    /// Description of what keys are in this category
    pub description: String,
    /// Member tokens in catalogue order
    pub codes: Vec<String>,
}

/// Pattern entry for parameterized keycodes such as `KC.MO(3)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PatternDefinition {
    category: String,
    pattern: String,
}

/// Catalogue schema from keycodes.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct KeycodeCatalogue {
    version: String,
    categories: Vec<KeycodeCategory>,
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(default)]
    patterns: Vec<PatternDefinition>,
}

/// KMK keycode catalogue with fast lookup.
///
/// The catalogue is embedded in the binary at compile time. Lookups are
/// exact string matches; aliases resolve to their canonical token and
/// parameterized layer keys are matched by regex.
#[derive(Debug, Clone)]
pub struct KeycodeDb {
    categories: Vec<KeycodeCategory>,
    /// Canonical token -> index into `categories`
    lookup: HashMap<String, usize>,
    /// Alias token -> canonical token
    aliases: HashMap<String, String>,
    /// Compiled patterns with the category they belong to
    patterns: Vec<(String, Regex)>,
}

impl KeycodeDb {
    /// Loads the keycode catalogue from the embedded JSON file.
    pub fn load() -> Result<Self> {
        let json_data = include_str!("keycodes.json");
        let catalogue: KeycodeCatalogue =
            serde_json::from_str(json_data).context("Failed to parse embedded keycodes.json")?;

        let mut lookup = HashMap::new();
        for (idx, category) in catalogue.categories.iter().enumerate() {
            for code in &category.codes {
                lookup.entry(code.clone()).or_insert(idx);
            }
        }

        let mut patterns = Vec::with_capacity(catalogue.patterns.len());
        for def in catalogue.patterns {
            let regex = Regex::new(&def.pattern)
                .with_context(|| format!("Invalid keycode pattern '{}'", def.pattern))?;
            patterns.push((def.category, regex));
        }

        Ok(Self {
            categories: catalogue.categories,
            lookup,
            aliases: catalogue.aliases,
            patterns,
        })
    }

    /// Validates a single keycode token.
    ///
    /// Returns true if the token is in the catalogue, is a known alias, or
    /// matches a parameterized pattern (e.g. `KC.MO(7)`). Combo expressions
    /// and macro references are not tokens; check them through
    /// [`crate::models::KeyAssignment`] first.
    ///
    /// # Examples
    ///
    /// ```
    /// use kmkpad::keycode_db::KeycodeDb;
    ///
    /// let db = KeycodeDb::load().unwrap();
    /// assert!(db.is_valid("KC.A"));
    /// assert!(db.is_valid("KC.ENTER"));
    /// assert!(db.is_valid("KC.MO(7)"));
    /// assert!(!db.is_valid("KC_A"));
    /// ```
    #[must_use]
    pub fn is_valid(&self, keycode: &str) -> bool {
        self.lookup.contains_key(keycode)
            || self.aliases.contains_key(keycode)
            || self.patterns.iter().any(|(_, regex)| regex.is_match(keycode))
    }

    /// Resolves an alias to its canonical token; other tokens are returned as-is.
    #[must_use]
    pub fn canonical<'a>(&'a self, keycode: &'a str) -> &'a str {
        self.aliases.get(keycode).map_or(keycode, String::as_str)
    }

    /// Returns the category ID a token belongs to.
    ///
    /// Only exact members of a category table (or pattern matches) count;
    /// aliases are not resolved here.
    #[must_use]
    pub fn category_of(&self, keycode: &str) -> Option<&str> {
        if let Some(&idx) = self.lookup.get(keycode) {
            return self.categories.get(idx).map(|c| c.id.as_str());
        }
        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(keycode))
            .map(|(category, _)| category.as_str())
    }

    /// Returns true if `keycode` is a member of the named category's table.
    #[must_use]
    pub fn in_category(&self, category_id: &str, keycode: &str) -> bool {
        self.codes_in(category_id)
            .is_some_and(|codes| codes.iter().any(|c| c == keycode))
    }

    /// Gets the token table for a category.
    #[must_use]
    pub fn codes_in(&self, category_id: &str) -> Option<&[String]> {
        self.category(category_id).map(|c| c.codes.as_slice())
    }

    /// Gets a category by ID.
    #[must_use]
    pub fn category(&self, category_id: &str) -> Option<&KeycodeCategory> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// Returns all categories in catalogue order.
    #[must_use]
    pub fn categories(&self) -> &[KeycodeCategory] {
        &self.categories
    }

    /// Searches tokens by case-insensitive substring.
    ///
    /// Exact matches sort first, then prefix matches (after the `KC.`
    /// namespace), then other substring matches. Ties keep catalogue order.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&str> {
        let all = self
            .categories
            .iter()
            .flat_map(|c| c.codes.iter().map(String::as_str));
        if query.is_empty() {
            return all.collect();
        }

        let query_upper = query.to_uppercase();
        let mut results: Vec<(&str, u8)> = all
            .filter_map(|code| {
                let bare = code.strip_prefix("KC.").unwrap_or(code);
                if code == query_upper || bare == query_upper {
                    Some((code, 0))
                } else if bare.starts_with(&query_upper) {
                    Some((code, 1))
                } else if code.contains(&query_upper) {
                    Some((code, 2))
                } else {
                    None
                }
            })
            .collect();

        results.sort_by_key(|(_, rank)| *rank);
        results.into_iter().map(|(code, _)| code).collect()
    }

    /// Total number of catalogue tokens (aliases and patterns excluded).
    #[must_use]
    pub fn keycode_count(&self) -> usize {
        self.lookup.len()
    }
}
