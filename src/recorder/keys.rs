//! Host key names to KMK keycode tokens.

/// A physical key as reported by the host: its name plus whether it came
/// from the numeric keypad.
///
/// Names follow the host toolkit's key names without prefix: `"A"`, `"5"`,
/// `"F3"`, `"Escape"`, `"Return"`, `"Left"`, `"Shift"`, `"Apostrophe"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicalKey {
    /// Host key name
    pub name: String,
    /// True for keypad keys
    pub keypad: bool,
}

impl PhysicalKey {
    /// A key on the main block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keypad: false,
        }
    }

    /// A key on the numeric keypad.
    pub fn keypad(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keypad: true,
        }
    }

    /// KMK token for this key, if it has one.
    ///
    /// Keypad keys without a keypad token (e.g. keypad arrows with num lock
    /// off) fall back to the main-block token.
    #[must_use]
    pub fn kmk_code(&self) -> Option<&'static str> {
        if self.keypad {
            if let Some(code) = keypad_code(&self.name) {
                return Some(code);
            }
        }
        main_code(&self.name)
    }
}

fn keypad_code(name: &str) -> Option<&'static str> {
    Some(match name {
        "0" => "KC.KP_0",
        "1" => "KC.KP_1",
        "2" => "KC.KP_2",
        "3" => "KC.KP_3",
        "4" => "KC.KP_4",
        "5" => "KC.KP_5",
        "6" => "KC.KP_6",
        "7" => "KC.KP_7",
        "8" => "KC.KP_8",
        "9" => "KC.KP_9",
        "Period" => "KC.KP_DOT",
        "Slash" => "KC.KP_SLASH",
        "Asterisk" => "KC.KP_ASTERISK",
        "Minus" => "KC.KP_MINUS",
        "Plus" => "KC.KP_PLUS",
        "Enter" => "KC.KP_ENTER",
        "Equal" => "KC.KP_EQUAL",
        "Comma" => "KC.KP_COMMA",
        _ => return None,
    })
}

fn main_code(name: &str) -> Option<&'static str> {
    const LETTERS: [&str; 26] = [
        "KC.A", "KC.B", "KC.C", "KC.D", "KC.E", "KC.F", "KC.G", "KC.H", "KC.I", "KC.J", "KC.K",
        "KC.L", "KC.M", "KC.N", "KC.O", "KC.P", "KC.Q", "KC.R", "KC.S", "KC.T", "KC.U", "KC.V",
        "KC.W", "KC.X", "KC.Y", "KC.Z",
    ];
    const DIGITS: [&str; 10] = [
        "KC.N0", "KC.N1", "KC.N2", "KC.N3", "KC.N4", "KC.N5", "KC.N6", "KC.N7", "KC.N8", "KC.N9",
    ];
    const FKEYS: [&str; 12] = [
        "KC.F1", "KC.F2", "KC.F3", "KC.F4", "KC.F5", "KC.F6", "KC.F7", "KC.F8", "KC.F9", "KC.F10",
        "KC.F11", "KC.F12",
    ];

    let bytes = name.as_bytes();
    if bytes.len() == 1 {
        let c = bytes[0].to_ascii_uppercase();
        if c.is_ascii_uppercase() {
            return Some(LETTERS[usize::from(c - b'A')]);
        }
        if c.is_ascii_digit() {
            return Some(DIGITS[usize::from(c - b'0')]);
        }
    }
    if let Some(n) = name.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
        return FKEYS.get(n.checked_sub(1)?).copied();
    }

    Some(match name {
        "Escape" => "KC.ESC",
        "Tab" => "KC.TAB",
        "Backspace" => "KC.BSPC",
        "Return" | "Enter" => "KC.ENT",
        "Insert" => "KC.INS",
        "Delete" => "KC.DEL",
        "Pause" => "KC.PAUS",
        "Print" => "KC.PSCR",
        "Home" => "KC.HOME",
        "End" => "KC.END",
        "Left" => "KC.LEFT",
        "Up" => "KC.UP",
        "Right" => "KC.RGHT",
        "Down" => "KC.DOWN",
        "PageUp" => "KC.PGUP",
        "PageDown" => "KC.PGDN",
        "Shift" => "KC.LSFT",
        "Control" => "KC.LCTL",
        "Meta" => "KC.LGUI",
        "Alt" => "KC.LALT",
        "CapsLock" => "KC.CAPS",
        "NumLock" => "KC.NUM",
        "ScrollLock" => "KC.SLCK",
        "Space" => "KC.SPC",
        "Apostrophe" => "KC.QUOT",
        "Comma" => "KC.COMM",
        "Minus" => "KC.MINS",
        "Period" => "KC.DOT",
        "Slash" => "KC.SLSH",
        "Semicolon" => "KC.SCLN",
        "Equal" => "KC.EQL",
        "BracketLeft" => "KC.LBRC",
        "Backslash" => "KC.BSLS",
        "BracketRight" => "KC.RBRC",
        "QuoteLeft" => "KC.GRV",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode_db::KeycodeDb;

    #[test]
    fn test_letters_digits_and_fkeys() {
        assert_eq!(PhysicalKey::new("a").kmk_code(), Some("KC.A"));
        assert_eq!(PhysicalKey::new("Z").kmk_code(), Some("KC.Z"));
        assert_eq!(PhysicalKey::new("0").kmk_code(), Some("KC.N0"));
        assert_eq!(PhysicalKey::new("F12").kmk_code(), Some("KC.F12"));
        assert_eq!(PhysicalKey::new("F13").kmk_code(), None);
        assert_eq!(PhysicalKey::new("F0").kmk_code(), None);
    }

    #[test]
    fn test_keypad_variants() {
        assert_eq!(PhysicalKey::keypad("7").kmk_code(), Some("KC.KP_7"));
        assert_eq!(PhysicalKey::keypad("Enter").kmk_code(), Some("KC.KP_ENTER"));
        assert_eq!(PhysicalKey::new("Enter").kmk_code(), Some("KC.ENT"));
        assert_eq!(PhysicalKey::keypad("Home").kmk_code(), Some("KC.HOME"));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(PhysicalKey::new("VolumeUp").kmk_code(), None);
        assert_eq!(PhysicalKey::new("").kmk_code(), None);
        assert_eq!(PhysicalKey::new("é").kmk_code(), None);
    }

    #[test]
    fn test_every_mapped_token_is_in_catalogue() {
        let db = KeycodeDb::load().unwrap();
        let names = [
            "Escape", "Tab", "Backspace", "Return", "Insert", "Delete", "Pause", "Print", "Home",
            "End", "Left", "Up", "Right", "Down", "PageUp", "PageDown", "Shift", "Control",
            "Meta", "Alt", "CapsLock", "NumLock", "ScrollLock", "Space", "Apostrophe", "Comma",
            "Minus", "Period", "Slash", "Semicolon", "Equal", "BracketLeft", "Backslash",
            "BracketRight", "QuoteLeft", "Q", "4", "F7",
        ];
        for name in names {
            let code = PhysicalKey::new(name).kmk_code().unwrap();
            assert!(db.is_valid(code), "{name} -> {code}");
        }
        for name in ["0", "Period", "Slash", "Asterisk", "Minus", "Plus", "Enter", "Equal", "Comma"] {
            let code = PhysicalKey::keypad(name).kmk_code().unwrap();
            assert!(db.is_valid(code), "keypad {name} -> {code}");
        }
    }
}
