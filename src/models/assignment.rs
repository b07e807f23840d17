//! Key assignment recognition.
//!
//! Cells store plain text. A [`KeyAssignment`] is the parsed view of that
//! text: a plain keycode token, a combo expression (modifier wrappers around
//! a base token), or a reference to a macro library entry.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static MACRO_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^MACRO\(([A-Za-z0-9_]+)\)$").expect("macro reference pattern is valid")
});

/// Modifier wrappers usable in combo expressions.
///
/// Declaration order is the order the combo builder applies them in, so a
/// later modifier ends up as the outer wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    /// Left control
    LCtl,
    /// Left shift
    LSft,
    /// Left alt
    LAlt,
    /// Left GUI
    LGui,
    /// Right control
    RCtl,
    /// Right shift
    RSft,
    /// Right alt
    RAlt,
    /// Right GUI
    RGui,
}

impl Modifier {
    /// All modifiers in application order.
    pub const ALL: [Self; 8] = [
        Self::LCtl,
        Self::LSft,
        Self::LAlt,
        Self::LGui,
        Self::RCtl,
        Self::RSft,
        Self::RAlt,
        Self::RGui,
    ];

    /// The KMK wrapper name (e.g. `LCTL`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LCtl => "LCTL",
            Self::LSft => "LSFT",
            Self::LAlt => "LALT",
            Self::LGui => "LGUI",
            Self::RCtl => "RCTL",
            Self::RSft => "RSFT",
            Self::RAlt => "RALT",
            Self::RGui => "RGUI",
        }
    }

    /// Looks up a modifier by its KMK wrapper name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parsed view of a cell's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAssignment {
    /// A single keycode token, or anything unrecognized (kept verbatim).
    Plain(String),
    /// Base token wrapped by modifiers; `modifiers[0]` is the innermost wrapper.
    Combo {
        /// Wrappers, innermost first
        modifiers: Vec<Modifier>,
        /// Wrapped token
        base: String,
    },
    /// Reference to a macro library entry by name.
    MacroRef(String),
}

impl KeyAssignment {
    /// Classifies cell text.
    ///
    /// ```
    /// use kmkpad::models::{KeyAssignment, Modifier};
    ///
    /// assert_eq!(KeyAssignment::parse("MACRO(COPY)"), KeyAssignment::MacroRef("COPY".into()));
    /// assert_eq!(
    ///     KeyAssignment::parse("KC.LSFT(KC.LCTL(KC.C))"),
    ///     KeyAssignment::Combo { modifiers: vec![Modifier::LCtl, Modifier::LSft], base: "KC.C".into() }
    /// );
    /// assert_eq!(KeyAssignment::parse("KC.MO(1)"), KeyAssignment::Plain("KC.MO(1)".into()));
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if let Some(name) = macro_reference_name(text) {
            return Self::MacroRef(name.to_string());
        }

        let mut modifiers = Vec::new();
        let mut rest = text;
        while let Some((modifier, inner)) = strip_modifier(rest) {
            modifiers.push(modifier);
            rest = inner;
        }

        if modifiers.is_empty() {
            Self::Plain(text.to_string())
        } else {
            modifiers.reverse();
            Self::Combo {
                modifiers,
                base: rest.to_string(),
            }
        }
    }

    /// Builds a combo from a base token and a set of selected modifiers.
    ///
    /// Selected modifiers are applied in [`Modifier::ALL`] order regardless
    /// of the order given; duplicates are ignored. With no modifiers the
    /// base token is returned as a plain assignment. The base is trimmed;
    /// a blank base yields `None`.
    #[must_use]
    pub fn combo(base: &str, selected: &[Modifier]) -> Option<Self> {
        let base = base.trim();
        if base.is_empty() {
            return None;
        }
        let modifiers: Vec<Modifier> = Modifier::ALL
            .into_iter()
            .filter(|m| selected.contains(m))
            .collect();
        if modifiers.is_empty() {
            Some(Self::Plain(base.to_string()))
        } else {
            Some(Self::Combo {
                modifiers,
                base: base.to_string(),
            })
        }
    }

    /// Creates a macro reference.
    #[must_use]
    pub fn macro_ref(name: impl Into<String>) -> Self {
        Self::MacroRef(name.into())
    }

    /// Name of the referenced macro, if this is a macro reference.
    #[must_use]
    pub fn macro_name(&self) -> Option<&str> {
        match self {
            Self::MacroRef(name) => Some(name),
            _ => None,
        }
    }

    /// The token a validator should check: the plain token or the combo base.
    #[must_use]
    pub fn base_token(&self) -> Option<&str> {
        match self {
            Self::Plain(token) => Some(token),
            Self::Combo { base, .. } => Some(base),
            Self::MacroRef(_) => None,
        }
    }
}

impl fmt::Display for KeyAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(token) => f.write_str(token),
            Self::MacroRef(name) => write!(f, "MACRO({name})"),
            Self::Combo { modifiers, base } => {
                let mut text = base.clone();
                for modifier in modifiers {
                    text = format!("KC.{modifier}({text})");
                }
                f.write_str(&text)
            }
        }
    }
}

impl From<KeyAssignment> for String {
    fn from(assignment: KeyAssignment) -> Self {
        assignment.to_string()
    }
}

/// Returns the macro name if `text` is a macro reference.
#[must_use]
pub fn macro_reference_name(text: &str) -> Option<&str> {
    MACRO_REF
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Strips one outer `KC.<MOD>(...)` wrapper.
fn strip_modifier(text: &str) -> Option<(Modifier, &str)> {
    let rest = text.strip_prefix("KC.")?;
    let open = rest.find('(')?;
    let modifier = Modifier::from_name(&rest[..open])?;
    let inner = rest[open + 1..].strip_suffix(')')?;
    if inner.is_empty() {
        return None;
    }
    Some((modifier, inner))
}
