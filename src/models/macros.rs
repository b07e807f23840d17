//! Macro actions and the named macro library.
//!
//! The library keeps insertion order because generated scripts list macros
//! in the order they were created. Persisted form is a JSON object whose
//! values are lists of `[actionType, value]` pairs.

use crate::error::{ModelError, ModelResult};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Names the generated script defines itself; macros may not shadow them.
pub const RESERVED_NAMES: [&str; 2] = ["KC", crate::firmware::COLOR_LOOKUP_NAME];

/// One step of a macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroAction {
    /// Press and release a key
    Tap(String),
    /// Press a key and keep it held
    Press(String),
    /// Release a held key
    Release(String),
    /// Type a string
    Text(String),
    /// Wait, in milliseconds
    Delay(u64),
}

impl MacroAction {
    /// The persisted action type (`tap`, `press`, `release`, `text`, `delay`).
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Tap(_) => "tap",
            Self::Press(_) => "press",
            Self::Release(_) => "release",
            Self::Text(_) => "text",
            Self::Delay(_) => "delay",
        }
    }

    /// The keycode carried by tap/press/release actions.
    #[must_use]
    pub fn keycode(&self) -> Option<&str> {
        match self {
            Self::Tap(code) | Self::Press(code) | Self::Release(code) => Some(code),
            Self::Text(_) | Self::Delay(_) => None,
        }
    }

    /// Builds an action from its persisted type and textual value.
    pub fn from_parts(kind: &str, value: &str) -> ModelResult<Self> {
        match kind {
            "tap" => Ok(Self::Tap(value.to_string())),
            "press" => Ok(Self::Press(value.to_string())),
            "release" => Ok(Self::Release(value.to_string())),
            "text" => Ok(Self::Text(value.to_string())),
            "delay" => value.trim().parse().map(Self::Delay).map_err(|_| {
                ModelError::validation(format!("Delay must be a whole number of milliseconds, got '{value}'"))
            }),
            other => Err(ModelError::validation(format!("Unknown macro action type '{other}'"))),
        }
    }
}

impl fmt::Display for MacroAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tap(code) => write!(f, "Tap {code}"),
            Self::Press(code) => write!(f, "Press {code}"),
            Self::Release(code) => write!(f, "Release {code}"),
            Self::Text(text) => write!(f, "Text {text:?}"),
            Self::Delay(ms) => write!(f, "Delay {ms}ms"),
        }
    }
}

impl Serialize for MacroAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(self.kind())?;
        match self {
            Self::Tap(s) | Self::Press(s) | Self::Release(s) | Self::Text(s) => {
                pair.serialize_element(s)?;
            }
            Self::Delay(ms) => pair.serialize_element(ms)?,
        }
        pair.end()
    }
}

/// Second element of a persisted action pair.
#[derive(Deserialize)]
#[serde(untagged)]
enum ActionValue {
    Number(u64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for MacroAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (kind, value) = <(String, ActionValue)>::deserialize(deserializer)?;
        match value {
            ActionValue::Text(text) => Self::from_parts(&kind, &text).map_err(de::Error::custom),
            ActionValue::Number(ms) if kind == "delay" => Ok(Self::Delay(ms)),
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            ActionValue::Float(ms) if kind == "delay" && ms.is_finite() && ms >= 0.0 => {
                Ok(Self::Delay(ms.round() as u64))
            }
            _ => Err(de::Error::custom(format!(
                "invalid value for macro action '{kind}'"
            ))),
        }
    }
}

/// Normalizes a user-typed macro name: trimmed, upper-cased, spaces to `_`.
///
/// ```
/// use kmkpad::models::macros::normalize_name;
///
/// assert_eq!(normalize_name("  copy all "), "COPY_ALL");
/// ```
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_uppercase().replace(' ', "_")
}

/// True if `name` is an ASCII identifier.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Named, insertion-ordered macro sequences.
///
/// This type only enforces name rules. Keeping key references in step with
/// renames and removals is done by [`crate::models::Project`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroLibrary {
    entries: Vec<(String, Vec<MacroAction>)>,
}

impl MacroLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of macros.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the library holds no macros.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if a macro with this exact name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// The sequence of a macro.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[MacroAction]> {
        self.position(name).map(|i| self.entries[i].1.as_slice())
    }

    /// Macro names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, sequence)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MacroAction])> {
        self.entries
            .iter()
            .map(|(name, seq)| (name.as_str(), seq.as_slice()))
    }

    /// Normalizes and validates a candidate name.
    ///
    /// `current` is the name being renamed, if any; keeping the same name is
    /// not a collision.
    pub fn check_name(&self, raw: &str, current: Option<&str>) -> ModelResult<String> {
        let name = normalize_name(raw);
        if name.is_empty() {
            return Err(ModelError::validation("Macro name cannot be empty"));
        }
        if !is_identifier(&name) {
            return Err(ModelError::validation(format!(
                "Macro name '{name}' must start with a letter or underscore and contain only letters, digits and underscores"
            )));
        }
        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(ModelError::validation(format!("Macro name '{name}' is reserved")));
        }
        if current != Some(name.as_str()) && self.contains(&name) {
            return Err(ModelError::validation(format!("A macro named '{name}' already exists")));
        }
        Ok(name)
    }

    /// Adds a new macro at the end and returns its normalized name.
    pub fn add(&mut self, raw_name: &str, sequence: Vec<MacroAction>) -> ModelResult<String> {
        let name = self.check_name(raw_name, None)?;
        self.entries.push((name.clone(), sequence));
        Ok(name)
    }

    /// Renames a macro in place, keeping its position and sequence.
    ///
    /// Returns the normalized new name.
    pub fn rename(&mut self, old: &str, raw_new: &str) -> ModelResult<String> {
        let idx = self.require(old)?;
        let name = self.check_name(raw_new, Some(old))?;
        self.entries[idx].0.clone_from(&name);
        Ok(name)
    }

    /// Replaces a macro's sequence.
    pub fn replace_sequence(&mut self, name: &str, sequence: Vec<MacroAction>) -> ModelResult<()> {
        let idx = self.require(name)?;
        self.entries[idx].1 = sequence;
        Ok(())
    }

    /// Removes a macro, returning its sequence.
    pub fn remove(&mut self, name: &str) -> Option<Vec<MacroAction>> {
        let idx = self.position(name)?;
        Some(self.entries.remove(idx).1)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    fn require(&self, name: &str) -> ModelResult<usize> {
        self.position(name)
            .ok_or_else(|| ModelError::invalid_operation(format!("No macro named '{name}'")))
    }
}

impl Serialize for MacroLibrary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, sequence) in &self.entries {
            map.serialize_entry(name, sequence)?;
        }
        map.end()
    }
}

struct LibraryVisitor;

impl<'de> Visitor<'de> for LibraryVisitor {
    type Value = MacroLibrary;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping macro names to action lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut library = MacroLibrary::new();
        while let Some((name, sequence)) = access.next_entry::<String, Vec<MacroAction>>()? {
            if !is_identifier(&name) {
                return Err(de::Error::custom(format!("invalid macro name '{name}'")));
            }
            match library.position(&name) {
                Some(idx) => library.entries[idx].1 = sequence,
                None => library.entries.push((name, sequence)),
            }
        }
        Ok(library)
    }
}

impl<'de> Deserialize<'de> for MacroLibrary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LibraryVisitor)
    }
}
