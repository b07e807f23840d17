//! Optional hardware extensions and the per-layer color map.
//!
//! Extension code is opaque text written by the user and passed through to
//! the generated script untouched. Lighting additionally carries structured
//! settings and a sparse [`ColorMap`].

use crate::constants::DEFAULT_RGB_PIN;
use crate::models::category::ColorTarget;
use crate::models::RgbColor;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Extension kinds, in the fixed order the generator emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtensionKind {
    /// Rotary encoder
    Encoder,
    /// Analog input (sliders, pots)
    AnalogIn,
    /// Per-key RGB lighting
    Lighting,
}

impl ExtensionKind {
    /// All kinds in generation order.
    pub const ALL: [Self; 3] = [Self::Encoder, Self::AnalogIn, Self::Lighting];

    /// Short ID used by the CLI and logs.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Encoder => "encoder",
            Self::AnalogIn => "analogin",
            Self::Lighting => "rgb",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Encoder => "Encoder",
            Self::AnalogIn => "Analog Input",
            Self::Lighting => "RGB Matrix",
        }
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Enabled flag plus opaque user code for one extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Whether the generator includes this extension
    pub enabled: bool,
    /// User-authored script text, emitted verbatim after the default template
    pub code: String,
}

/// Channel order of the LED strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RgbOrder {
    /// Red, green, blue
    Rgb,
    /// Red, blue, green
    Rbg,
    /// Green, red, blue (WS2812)
    #[default]
    Grb,
    /// Green, blue, red
    Gbr,
    /// Blue, red, green
    Brg,
    /// Blue, green, red
    Bgr,
}

impl RgbOrder {
    /// Channel index tuple expected by the firmware, e.g. `(1, 0, 2)` for GRB.
    #[must_use]
    pub const fn tuple(self) -> (u8, u8, u8) {
        match self {
            Self::Rgb => (0, 1, 2),
            Self::Rbg => (0, 2, 1),
            Self::Grb => (1, 0, 2),
            Self::Gbr => (1, 2, 0),
            Self::Brg => (2, 0, 1),
            Self::Bgr => (2, 1, 0),
        }
    }
}

/// Structured settings of the RGB matrix extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    /// Data pin expression (e.g. `board.GP9`)
    pub pixel_pin: String,
    /// Global brightness cap, 0.0 to 1.0
    pub brightness_limit: f64,
    /// LED channel order
    pub rgb_order: RgbOrder,
    /// Whether the firmware defers LED writes
    pub disable_auto_write: bool,
    /// Number of underglow LEDs after the key LEDs
    pub num_underglow: usize,
    /// Color of keys without a color map entry
    #[serde(deserialize_with = "lenient_white")]
    pub default_key_color: RgbColor,
    /// Color of underglow LEDs without an entry
    #[serde(deserialize_with = "lenient_black")]
    pub default_underglow_color: RgbColor,
    /// Underglow LED index -> color
    pub underglow_colors: BTreeMap<usize, RgbColor>,
    /// User-picked colors for bulk coloring, keyed by category or group ID
    pub category_colors: BTreeMap<String, RgbColor>,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            pixel_pin: DEFAULT_RGB_PIN.to_string(),
            brightness_limit: 0.5,
            rgb_order: RgbOrder::default(),
            disable_auto_write: true,
            num_underglow: 0,
            default_key_color: RgbColor::WHITE,
            default_underglow_color: RgbColor::BLACK,
            underglow_colors: BTreeMap::new(),
            category_colors: BTreeMap::new(),
        }
    }
}

impl LightingSettings {
    /// The color to use for a bulk-coloring target.
    #[must_use]
    pub fn color_for(&self, target: ColorTarget) -> RgbColor {
        self.category_colors
            .get(target.id())
            .copied()
            .unwrap_or_else(|| target.default_color())
    }

    /// Pixel pin with surrounding quotes and whitespace removed.
    ///
    /// Falls back to the default pin when empty.
    #[must_use]
    pub fn pixel_pin_expr(&self) -> &str {
        let pin = self.pixel_pin.trim();
        let pin = pin
            .strip_prefix('\'')
            .and_then(|p| p.strip_suffix('\''))
            .or_else(|| pin.strip_prefix('"').and_then(|p| p.strip_suffix('"')))
            .unwrap_or(pin);
        if pin.is_empty() {
            DEFAULT_RGB_PIN
        } else {
            pin
        }
    }
}

fn lenient_color<'de, D: Deserializer<'de>>(
    deserializer: D,
    fallback: RgbColor,
) -> Result<RgbColor, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map_or(fallback, |hex| RgbColor::from_hex_or(&hex, fallback)))
}

fn lenient_white<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RgbColor, D::Error> {
    lenient_color(deserializer, RgbColor::WHITE)
}

fn lenient_black<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RgbColor, D::Error> {
    lenient_color(deserializer, RgbColor::BLACK)
}

/// Sparse per-layer key colors: layer index -> linear key index -> color.
///
/// Serialized with string keys (`{"0": {"3": "#FF0000"}}`). Entries address
/// positions only; they are not moved when the grid is resized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMap {
    layers: BTreeMap<usize, BTreeMap<usize, RgbColor>>,
}

impl ColorMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no layer has any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.values().all(BTreeMap::is_empty)
    }

    /// Color of one key, if set.
    #[must_use]
    pub fn get(&self, layer: usize, key_index: usize) -> Option<RgbColor> {
        self.layers.get(&layer)?.get(&key_index).copied()
    }

    /// Entries of one layer, sorted by key index.
    #[must_use]
    pub fn layer(&self, layer: usize) -> Option<&BTreeMap<usize, RgbColor>> {
        self.layers.get(&layer).filter(|keys| !keys.is_empty())
    }

    /// Non-empty layers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &BTreeMap<usize, RgbColor>)> {
        self.layers
            .iter()
            .filter(|(_, keys)| !keys.is_empty())
            .map(|(layer, keys)| (*layer, keys))
    }

    /// Sets one key's color.
    pub fn set(&mut self, layer: usize, key_index: usize, color: RgbColor) {
        self.layers.entry(layer).or_default().insert(key_index, color);
    }

    /// Removes one key's color, returning it.
    pub fn clear(&mut self, layer: usize, key_index: usize) -> Option<RgbColor> {
        let keys = self.layers.get_mut(&layer)?;
        let removed = keys.remove(&key_index);
        if keys.is_empty() {
            self.layers.remove(&layer);
        }
        removed
    }

    /// Removes every entry of a layer.
    pub fn clear_layer(&mut self, layer: usize) {
        self.layers.remove(&layer);
    }

    /// Drops a deleted layer's entries and shifts later layers down by one.
    pub fn remove_layer(&mut self, layer: usize) {
        let later = self.layers.split_off(&layer);
        for (idx, keys) in later {
            if idx > layer {
                self.layers.insert(idx - 1, keys);
            }
        }
    }

    /// Sets every key `0..key_count` of a layer to one color.
    pub fn fill_layer(&mut self, layer: usize, key_count: usize, color: RgbColor) {
        let keys = self.layers.entry(layer).or_default();
        for idx in 0..key_count {
            keys.insert(idx, color);
        }
    }
}

/// All extension state of a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionConfigs {
    encoder: ExtensionConfig,
    analogin: ExtensionConfig,
    lighting: ExtensionConfig,
    /// Structured lighting settings
    pub lighting_settings: LightingSettings,
    /// Per-layer key colors
    pub color_map: ColorMap,
}

impl ExtensionConfigs {
    /// Creates a configuration with every extension disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Config of one extension.
    #[must_use]
    pub const fn get(&self, kind: ExtensionKind) -> &ExtensionConfig {
        match kind {
            ExtensionKind::Encoder => &self.encoder,
            ExtensionKind::AnalogIn => &self.analogin,
            ExtensionKind::Lighting => &self.lighting,
        }
    }

    /// Mutable config of one extension.
    pub fn get_mut(&mut self, kind: ExtensionKind) -> &mut ExtensionConfig {
        match kind {
            ExtensionKind::Encoder => &mut self.encoder,
            ExtensionKind::AnalogIn => &mut self.analogin,
            ExtensionKind::Lighting => &mut self.lighting,
        }
    }

    /// Whether an extension is enabled.
    #[must_use]
    pub const fn is_enabled(&self, kind: ExtensionKind) -> bool {
        self.get(kind).enabled
    }

    /// Enables or disables an extension.
    pub fn set_enabled(&mut self, kind: ExtensionKind, enabled: bool) {
        self.get_mut(kind).enabled = enabled;
    }

    /// Replaces an extension's user code.
    pub fn set_code(&mut self, kind: ExtensionKind, code: impl Into<String>) {
        self.get_mut(kind).code = code.into();
    }

    /// Enabled extensions in generation order.
    pub fn enabled(&self) -> impl Iterator<Item = (ExtensionKind, &ExtensionConfig)> {
        ExtensionKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|(_, config)| config.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::{KeyCategory, KeyGroup};

    #[test]
    fn test_enabled_order_is_fixed() {
        let mut ext = ExtensionConfigs::new();
        ext.set_enabled(ExtensionKind::Lighting, true);
        ext.set_enabled(ExtensionKind::Encoder, true);
        ext.set_code(ExtensionKind::Encoder, "enc = 1");
        let kinds: Vec<ExtensionKind> = ext.enabled().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![ExtensionKind::Encoder, ExtensionKind::Lighting]);
        assert_eq!(ext.get(ExtensionKind::Encoder).code, "enc = 1");
        assert!(!ext.is_enabled(ExtensionKind::AnalogIn));
    }

    #[test]
    fn test_color_map_edits() {
        let mut map = ColorMap::new();
        assert!(map.is_empty());

        map.set(1, 3, RgbColor::new(255, 0, 0));
        assert_eq!(map.get(1, 3), Some(RgbColor::new(255, 0, 0)));
        assert_eq!(map.clear(1, 3), Some(RgbColor::new(255, 0, 0)));
        assert!(map.layer(1).is_none());
        assert!(map.is_empty());

        map.fill_layer(0, 4, RgbColor::BLACK);
        assert_eq!(map.layer(0).map(BTreeMap::len), Some(4));
        map.clear_layer(0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_color_map_remove_layer_shifts() {
        let mut map = ColorMap::new();
        map.set(0, 0, RgbColor::WHITE);
        map.set(1, 1, RgbColor::BLACK);
        map.set(3, 2, RgbColor::new(1, 1, 1));
        map.remove_layer(1);
        assert_eq!(map.get(0, 0), Some(RgbColor::WHITE));
        assert!(map.layer(1).is_none());
        assert_eq!(map.get(2, 2), Some(RgbColor::new(1, 1, 1)));
    }

    #[test]
    fn test_color_map_json_uses_string_keys() {
        let mut map = ColorMap::new();
        map.set(2, 10, RgbColor::new(0, 0, 255));
        map.set(0, 1, RgbColor::new(1, 2, 3));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r##"{"0":{"1":"#010203"},"2":{"10":"#0000FF"}}"##);

        let parsed: ColorMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, map);
        assert!(serde_json::from_str::<ColorMap>(r#"{"x":{}}"#).is_err());
    }

    #[test]
    fn test_lighting_settings_lenient_colors() {
        let settings: LightingSettings = serde_json::from_str(
            r#"{"default_key_color":"ff0000","default_underglow_color":"bogus","rgb_order":"BGR"}"#,
        )
        .unwrap();
        assert_eq!(settings.default_key_color, RgbColor::new(255, 0, 0));
        assert_eq!(settings.default_underglow_color, RgbColor::BLACK);
        assert_eq!(settings.rgb_order.tuple(), (2, 1, 0));
        assert!((settings.brightness_limit - 0.5).abs() < f64::EPSILON);
        assert_eq!(settings.pixel_pin, "board.GP9");
    }

    #[test]
    fn test_pixel_pin_expr() {
        let mut settings = LightingSettings::default();
        settings.pixel_pin = " 'board.GP2' ".into();
        assert_eq!(settings.pixel_pin_expr(), "board.GP2");
        settings.pixel_pin = String::new();
        assert_eq!(settings.pixel_pin_expr(), "board.GP9");
    }

    #[test]
    fn test_category_color_override() {
        let mut settings = LightingSettings::default();
        let nav = ColorTarget::Category(KeyCategory::Navigation);
        assert_eq!(settings.color_for(nav), KeyCategory::Navigation.default_color());
        settings
            .category_colors
            .insert("navigation".into(), RgbColor::new(9, 9, 9));
        assert_eq!(settings.color_for(nav), RgbColor::new(9, 9, 9));
        assert_eq!(
            settings.color_for(ColorTarget::Group(KeyGroup::Tab)),
            KeyGroup::Tab.default_color()
        );
    }
}
