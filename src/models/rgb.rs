//! RGB color handling with hex parsing and serialization.

// Allow small types passed by reference for API consistency
#![allow(clippy::trivially_copy_pass_by_ref)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB color value with hex string representation.
///
/// Persisted records store colors as `"#RRGGBB"` strings, so serialization
/// goes through the hex form rather than the individual channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl RgbColor {
    /// Black, used for LEDs under `KC.NO` keys.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// White, the default key color.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses an `RgbColor` from a hex string.
    ///
    /// Supports formats: "#RRGGBB", "RRGGBB", "#rrggbb", "rrggbb"
    ///
    /// # Examples
    ///
    /// ```
    /// use kmkpad::models::RgbColor;
    ///
    /// let color = RgbColor::from_hex("#FF0000").unwrap();
    /// assert_eq!(color, RgbColor::new(255, 0, 0));
    ///
    /// let color = RgbColor::from_hex("00ff00").unwrap();
    /// assert_eq!(color, RgbColor::new(0, 255, 0));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid hex color format.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if hex.len() != 6 || !hex.is_ascii() {
            anyhow::bail!("Invalid hex color format '{hex}'. Expected 6 hex digits (RRGGBB)");
        }

        let r = u8::from_str_radix(&hex[0..2], 16)
            .context(format!("Invalid red channel in hex color '{hex}'"))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .context(format!("Invalid green channel in hex color '{hex}'"))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .context(format!("Invalid blue channel in hex color '{hex}'"))?;

        Ok(Self::new(r, g, b))
    }

    /// Parses a hex color, returning `fallback` for anything unparseable.
    ///
    /// Hand-edited records often carry colors without the leading `#` or
    /// with stray whitespace; those still parse. Empty or malformed values
    /// fall back instead of failing the whole record.
    ///
    /// ```
    /// use kmkpad::models::RgbColor;
    ///
    /// assert_eq!(RgbColor::from_hex_or("ff8800", RgbColor::WHITE), RgbColor::new(255, 136, 0));
    /// assert_eq!(RgbColor::from_hex_or("oops", RgbColor::WHITE), RgbColor::WHITE);
    /// ```
    #[must_use]
    pub fn from_hex_or(hex: &str, fallback: Self) -> Self {
        Self::from_hex(hex).unwrap_or(fallback)
    }

    /// Converts the color to a hex string in the format "#RRGGBB" (uppercase).
    ///
    /// # Examples
    ///
    /// ```
    /// use kmkpad::models::RgbColor;
    ///
    /// let color = RgbColor::new(0, 128, 255);
    /// assert_eq!(color.to_hex(), "#0080FF");
    /// ```
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Renders the color as a Python list literal, e.g. `[255, 0, 0]`.
    #[must_use]
    pub fn to_python_list(&self) -> String {
        format!("[{}, {}, {}]", self.r, self.g, self.b)
    }

    /// Renders the color as a Python tuple literal, e.g. `(255, 0, 0)`.
    #[must_use]
    pub fn to_python_tuple(&self) -> String {
        format!("({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for RgbColor {
    /// Default color is white (#FFFFFF).
    fn default() -> Self {
        Self::WHITE
    }
}

impl TryFrom<String> for RgbColor {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::from_hex(&value).map_err(|e| e.to_string())
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_valid() {
        let color = RgbColor::from_hex("#FF0000").unwrap();
        assert_eq!(color, RgbColor::new(255, 0, 0));

        let color = RgbColor::from_hex("#0000ff").unwrap();
        assert_eq!(color, RgbColor::new(0, 0, 255));

        let color = RgbColor::from_hex("  #FFFFFF  ").unwrap();
        assert_eq!(color, RgbColor::new(255, 255, 255));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(RgbColor::from_hex("#FFF").is_err());
        assert!(RgbColor::from_hex("#FFFFFFF").is_err());
        assert!(RgbColor::from_hex("GGGGGG").is_err());
        assert!(RgbColor::from_hex("").is_err());
        assert!(RgbColor::from_hex("#").is_err());
        assert!(RgbColor::from_hex("#ÄÄÄÄ").is_err());
    }

    #[test]
    fn test_from_hex_or_falls_back() {
        assert_eq!(RgbColor::from_hex_or("", RgbColor::BLACK), RgbColor::BLACK);
        assert_eq!(RgbColor::from_hex_or("#12", RgbColor::BLACK), RgbColor::BLACK);
        assert_eq!(
            RgbColor::from_hex_or("#00ff00", RgbColor::BLACK),
            RgbColor::new(0, 255, 0)
        );
    }

    #[test]
    fn test_to_hex_uppercase() {
        assert_eq!(RgbColor::new(255, 0, 0).to_hex(), "#FF0000");
        assert_eq!(RgbColor::new(171, 205, 239).to_hex(), "#ABCDEF");
        assert_eq!(RgbColor::BLACK.to_hex(), "#000000");
    }

    #[test]
    fn test_python_literals() {
        let color = RgbColor::new(1, 2, 3);
        assert_eq!(color.to_python_list(), "[1, 2, 3]");
        assert_eq!(color.to_python_tuple(), "(1, 2, 3)");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&RgbColor::new(255, 170, 0)).unwrap();
        assert_eq!(json, "\"#FFAA00\"");

        let parsed: RgbColor = serde_json::from_str("\"#00ff80\"").unwrap();
        assert_eq!(parsed, RgbColor::new(0, 255, 128));

        assert!(serde_json::from_str::<RgbColor>("\"blue\"").is_err());
    }
}
