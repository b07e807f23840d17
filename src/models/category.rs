//! Key categories and granular key groups used for bulk coloring.

use crate::keycode_db::KeycodeDb;
use crate::models::assignment::macro_reference_name;
use crate::models::RgbColor;
use std::fmt;
use std::str::FromStr;

/// Prefixes of layer-switch keys that count as "layers" regardless of layer number.
const LAYER_SWITCH_PREFIXES: [&str; 3] = ["KC.MO(", "KC.TG(", "KC.DF("];

/// Broad keycode category.
///
/// Every category except [`KeyCategory::Macro`] is backed by a token table
/// in the keycode catalogue with the same ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCategory {
    /// Macro references
    Macro,
    /// Letters, digits, punctuation
    Basic,
    /// Modifier keys
    Modifiers,
    /// Arrows and paging
    Navigation,
    /// F-keys
    Function,
    /// Media and brightness
    Media,
    /// Keypad
    Numpad,
    /// Mouse emulation
    Mouse,
    /// Layer switches
    Layers,
    /// Everything else in the catalogue
    Misc,
}

impl KeyCategory {
    /// All categories in display order.
    pub const ALL: [Self; 10] = [
        Self::Macro,
        Self::Basic,
        Self::Modifiers,
        Self::Navigation,
        Self::Function,
        Self::Media,
        Self::Numpad,
        Self::Mouse,
        Self::Layers,
        Self::Misc,
    ];

    /// Stable ID, shared with the keycode catalogue.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Macro => "macro",
            Self::Basic => "basic",
            Self::Modifiers => "modifiers",
            Self::Navigation => "navigation",
            Self::Function => "function",
            Self::Media => "media",
            Self::Numpad => "numpad",
            Self::Mouse => "mouse",
            Self::Layers => "layers",
            Self::Misc => "misc",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Macro => "Macros",
            Self::Basic => "Basic",
            Self::Modifiers => "Modifiers",
            Self::Navigation => "Navigation",
            Self::Function => "Function",
            Self::Media => "Media",
            Self::Numpad => "Numpad",
            Self::Mouse => "Mouse",
            Self::Layers => "Layers",
            Self::Misc => "Misc",
        }
    }

    /// Color used when the user has not picked one.
    #[must_use]
    pub const fn default_color(self) -> RgbColor {
        match self {
            Self::Macro => RgbColor::new(0xFF, 0x6B, 0x6B),
            Self::Basic => RgbColor::new(0x4E, 0xCD, 0xC4),
            Self::Modifiers => RgbColor::new(0xA8, 0xE6, 0xCF),
            Self::Navigation => RgbColor::new(0xFF, 0xD9, 0x3D),
            Self::Function => RgbColor::new(0x95, 0xE1, 0xD3),
            Self::Media => RgbColor::new(0xF3, 0x81, 0x81),
            Self::Numpad => RgbColor::new(0xC7, 0xCE, 0xEA),
            Self::Mouse => RgbColor::new(0xAA, 0x96, 0xDA),
            Self::Layers => RgbColor::new(0xFC, 0xBA, 0xD3),
            Self::Misc => RgbColor::new(0xB4, 0xB4, 0xB4),
        }
    }

    /// True if cell text belongs to this category.
    #[must_use]
    pub fn matches(self, db: &KeycodeDb, token: &str) -> bool {
        match self {
            Self::Macro => macro_reference_name(token).is_some(),
            Self::Layers => {
                db.in_category(self.id(), token)
                    || LAYER_SWITCH_PREFIXES.iter().any(|p| token.starts_with(p))
            }
            _ => db.in_category(self.id(), token),
        }
    }
}

/// Narrow key group with its own fixed token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyGroup {
    /// Number row
    Numbers,
    /// A-Z
    Letters,
    /// Space bar
    Space,
    /// Enter (both)
    Enter,
    /// Backspace and delete
    Backspace,
    /// Tab
    Tab,
    /// Shifts
    Shift,
    /// Controls
    Ctrl,
    /// Alts
    Alt,
    /// Keypad digits
    KeypadNums,
    /// Keypad digits and decimal point
    KeypadNav,
    /// Keypad operators
    KeypadOps,
}

const KP_DIGITS: [&str; 10] = [
    "KC.KP_0", "KC.KP_1", "KC.KP_2", "KC.KP_3", "KC.KP_4", "KC.KP_5", "KC.KP_6", "KC.KP_7",
    "KC.KP_8", "KC.KP_9",
];

impl KeyGroup {
    /// All groups in display order.
    pub const ALL: [Self; 12] = [
        Self::Numbers,
        Self::Letters,
        Self::Space,
        Self::Enter,
        Self::Backspace,
        Self::Tab,
        Self::Shift,
        Self::Ctrl,
        Self::Alt,
        Self::KeypadNums,
        Self::KeypadNav,
        Self::KeypadOps,
    ];

    /// Stable ID.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Numbers => "numbers",
            Self::Letters => "letters",
            Self::Space => "space",
            Self::Enter => "enter",
            Self::Backspace => "backspace",
            Self::Tab => "tab",
            Self::Shift => "shift",
            Self::Ctrl => "ctrl",
            Self::Alt => "alt",
            Self::KeypadNums => "keypad_nums",
            Self::KeypadNav => "keypad_nav",
            Self::KeypadOps => "keypad_ops",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Numbers => "Numbers (0-9)",
            Self::Letters => "Letters (A-Z)",
            Self::Space => "Space",
            Self::Enter => "Enter",
            Self::Backspace => "Backspace/Delete",
            Self::Tab => "Tab",
            Self::Shift => "Shift",
            Self::Ctrl => "Ctrl",
            Self::Alt => "Alt",
            Self::KeypadNums => "Keypad Numbers",
            Self::KeypadNav => "Keypad Navigation",
            Self::KeypadOps => "Keypad Operators",
        }
    }

    /// Color used when the user has not picked one.
    #[must_use]
    pub const fn default_color(self) -> RgbColor {
        match self {
            Self::Numbers => RgbColor::new(0xFF, 0xA5, 0x00),
            Self::Letters => RgbColor::new(0x87, 0xCE, 0xEB),
            Self::Space => RgbColor::new(0x90, 0xEE, 0x90),
            Self::Enter => RgbColor::new(0xFF, 0xB6, 0xC1),
            Self::Backspace => RgbColor::new(0xFF, 0x63, 0x47),
            Self::Tab => RgbColor::new(0xDD, 0xA0, 0xDD),
            Self::Shift => RgbColor::new(0xF0, 0xE6, 0x8C),
            Self::Ctrl => RgbColor::new(0x98, 0xFB, 0x98),
            Self::Alt => RgbColor::new(0xFF, 0xDA, 0xB9),
            Self::KeypadNums => RgbColor::new(0xFF, 0x8C, 0x42),
            Self::KeypadNav => RgbColor::new(0xFF, 0xC9, 0x47),
            Self::KeypadOps => RgbColor::new(0xC7, 0xA2, 0x7C),
        }
    }

    /// Fixed member tokens, aliases included.
    #[must_use]
    pub const fn tokens(self) -> &'static [&'static str] {
        match self {
            Self::Numbers => &[
                "KC.N1", "KC.N2", "KC.N3", "KC.N4", "KC.N5", "KC.N6", "KC.N7", "KC.N8", "KC.N9",
                "KC.N0",
            ],
            Self::Letters => &[
                "KC.A", "KC.B", "KC.C", "KC.D", "KC.E", "KC.F", "KC.G", "KC.H", "KC.I", "KC.J",
                "KC.K", "KC.L", "KC.M", "KC.N", "KC.O", "KC.P", "KC.Q", "KC.R", "KC.S", "KC.T",
                "KC.U", "KC.V", "KC.W", "KC.X", "KC.Y", "KC.Z",
            ],
            Self::Space => &["KC.SPC", "KC.SPACE"],
            Self::Enter => &["KC.ENT", "KC.ENTER", "KC.KP_ENTER"],
            Self::Backspace => &["KC.BSPC", "KC.DEL", "KC.BACKSPACE", "KC.DELETE"],
            Self::Tab => &["KC.TAB"],
            Self::Shift => &["KC.LSFT", "KC.RSFT", "KC.LSHIFT", "KC.RSHIFT"],
            Self::Ctrl => &["KC.LCTL", "KC.RCTL", "KC.LCTRL", "KC.RCTRL"],
            Self::Alt => &["KC.LALT", "KC.RALT"],
            Self::KeypadNums => &KP_DIGITS,
            Self::KeypadNav => &[
                "KC.KP_DOT", "KC.KP_0", "KC.KP_1", "KC.KP_2", "KC.KP_3", "KC.KP_4", "KC.KP_5",
                "KC.KP_6", "KC.KP_7", "KC.KP_8", "KC.KP_9",
            ],
            Self::KeypadOps => &[
                "KC.KP_SLASH",
                "KC.KP_ASTERISK",
                "KC.KP_MINUS",
                "KC.KP_PLUS",
                "KC.KP_ENTER",
                "KC.KP_DOT",
                "KC.KP_EQUAL",
                "KC.KP_COMMA",
                "KC.NUMLOCK",
            ],
        }
    }

    /// True if `token` is in this group.
    #[must_use]
    pub fn matches(self, token: &str) -> bool {
        self.tokens().contains(&token)
    }
}

/// Anything a bulk color can be applied to: a category or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTarget {
    /// Whole category
    Category(KeyCategory),
    /// Granular group
    Group(KeyGroup),
}

impl ColorTarget {
    /// Every target, categories first.
    pub fn all() -> impl Iterator<Item = Self> {
        KeyCategory::ALL
            .into_iter()
            .map(Self::Category)
            .chain(KeyGroup::ALL.into_iter().map(Self::Group))
    }

    /// Stable ID (category and group IDs do not overlap).
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Category(c) => c.id(),
            Self::Group(g) => g.id(),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category(c) => c.label(),
            Self::Group(g) => g.label(),
        }
    }

    /// Color used when the user has not picked one.
    #[must_use]
    pub const fn default_color(self) -> RgbColor {
        match self {
            Self::Category(c) => c.default_color(),
            Self::Group(g) => g.default_color(),
        }
    }

    /// True if cell text belongs to this target.
    #[must_use]
    pub fn matches(self, db: &KeycodeDb, token: &str) -> bool {
        match self {
            Self::Category(c) => c.matches(db, token),
            Self::Group(g) => g.matches(token),
        }
    }
}

impl FromStr for ColorTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|t| t.id() == s)
            .ok_or_else(|| format!("Unknown key category or group '{s}'"))
    }
}

impl fmt::Display for ColorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_db() -> KeycodeDb {
        KeycodeDb::load().expect("Failed to load keycode catalogue")
    }

    #[test]
    fn test_category_ids_exist_in_catalogue() {
        let db = get_test_db();
        for category in KeyCategory::ALL {
            if category != KeyCategory::Macro {
                assert!(db.category(category.id()).is_some(), "{}", category.id());
            }
        }
    }

    #[test]
    fn test_category_matching() {
        let db = get_test_db();
        assert!(KeyCategory::Navigation.matches(&db, "KC.UP"));
        assert!(!KeyCategory::Navigation.matches(&db, "KC.A"));
        assert!(KeyCategory::Macro.matches(&db, "MACRO(COPY)"));
        assert!(KeyCategory::Layers.matches(&db, "KC.MO(9)"));
        assert!(KeyCategory::Layers.matches(&db, "KC.DF(0)"));
        assert!(!KeyCategory::Layers.matches(&db, "KC.TO(1)"));
        assert!(!KeyCategory::Modifiers.matches(&db, "KC.LCTL(KC.C)"));
    }

    #[test]
    fn test_group_matching_includes_aliases() {
        assert!(KeyGroup::Space.matches("KC.SPACE"));
        assert!(KeyGroup::Enter.matches("KC.KP_ENTER"));
        assert!(KeyGroup::KeypadOps.matches("KC.KP_ENTER"));
        assert!(!KeyGroup::Letters.matches("KC.N1"));
    }

    #[test]
    fn test_target_ids_are_unique_and_parse() {
        let ids: Vec<&str> = ColorTarget::all().map(ColorTarget::id).collect();
        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(ids.len(), unique.len());

        assert_eq!(
            "keypad_ops".parse::<ColorTarget>(),
            Ok(ColorTarget::Group(KeyGroup::KeypadOps))
        );
        assert_eq!(
            "media".parse::<ColorTarget>(),
            Ok(ColorTarget::Category(KeyCategory::Media))
        );
        assert!("colour".parse::<ColorTarget>().is_err());
    }
}
