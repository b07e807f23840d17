//! Default script blocks for the optional extensions.
//!
//! Each enabled extension gets its default block in the generated script,
//! followed by the user's own code for that extension. The encoder and
//! analog blocks are fixed text; the lighting block is computed from the
//! lighting settings, layer 0 of the keymap and the color map.

use crate::constants::DEFAULT_KEY;
use crate::models::{ColorMap, ExtensionConfigs, ExtensionKind, KeymapModel, LightingSettings, RgbColor};

/// Color entries per line in the lighting block.
const ENTRIES_PER_LINE: usize = 8;

const ENCODER_TEMPLATE: &[&str] = &[
    "# --- Encoder Handler (auto-generated) ---",
    "encoder_handler = EncoderHandler()",
    "# Configure pins and map for your hardware. Examples:",
    "# encoder_handler.pins = ((board.GP17, board.GP15, board.GP14),)",
    "# encoder_handler.map = [ ((KC.VOLD, KC.VOLU, KC.MUTE),), ]",
    "keyboard.modules.append(encoder_handler)",
];

const ANALOG_TEMPLATE: &[&str] = &[
    "# --- Analog Inputs (auto-generated) ---",
    "# Example usage (requires 'analogio' on target device):",
    "# from analogio import AnalogIn",
    "# a0 = AnalogInput(AnalogIn(board.A0))",
    "# analog = AnalogInputs([a0], [[AnalogKey(KC.X)]])",
    "# keyboard.modules.append(analog)",
];

/// Import line an extension adds to the script header.
#[must_use]
pub const fn import_line(kind: ExtensionKind) -> &'static str {
    match kind {
        ExtensionKind::Encoder => "from kmk.modules.encoder import EncoderHandler",
        ExtensionKind::AnalogIn => "from kmk.modules.analogin import AnalogInputs, AnalogInput",
        ExtensionKind::Lighting => {
            "from kmk.extensions.peg_rgb_matrix import Rgb_matrix, Rgb_matrix_data"
        }
    }
}

/// Comment line placed before an extension's user code.
#[must_use]
pub const fn user_code_header(kind: ExtensionKind) -> &'static str {
    match kind {
        ExtensionKind::Encoder => "# Encoder configuration:",
        ExtensionKind::AnalogIn => "# AnalogIn configuration provided by user:",
        ExtensionKind::Lighting => "# RGB configuration provided by user:",
    }
}

/// Default block for one extension.
#[must_use]
pub fn default_template(
    kind: ExtensionKind,
    extensions: &ExtensionConfigs,
    keymap: &KeymapModel,
) -> Vec<String> {
    match kind {
        ExtensionKind::Encoder => to_lines(ENCODER_TEMPLATE),
        ExtensionKind::AnalogIn => to_lines(ANALOG_TEMPLATE),
        ExtensionKind::Lighting => lighting_template(
            &extensions.lighting_settings,
            keymap,
            &extensions.color_map,
        ),
    }
}

fn to_lines(template: &[&str]) -> Vec<String> {
    template.iter().map(ToString::to_string).collect()
}

/// Peg RGB matrix setup: one LED per key (layer 0 colors) plus underglow.
#[must_use]
pub fn lighting_template(
    settings: &LightingSettings,
    keymap: &KeymapModel,
    color_map: &ColorMap,
) -> Vec<String> {
    let key_colors = key_colors(settings, keymap, color_map);
    let underglow_colors: Vec<RgbColor> = (0..settings.num_underglow)
        .map(|idx| {
            settings
                .underglow_colors
                .get(&idx)
                .copied()
                .unwrap_or(settings.default_underglow_color)
        })
        .collect();
    let total = key_colors.len() + underglow_colors.len();
    let (r, g, b) = settings.rgb_order.tuple();

    let mut lines = vec![
        "# --- RGB Matrix (auto-generated) ---".to_string(),
        format!("keyboard.rgb_pixel_pin = {}", settings.pixel_pin_expr()),
        format!("keyboard.num_pixels = {total}"),
        format!(
            "keyboard.brightness_limit = {:?}",
            brightness(settings.brightness_limit)
        ),
        format!("keyboard.led_key_pos = list(range({total}))  # Keys + underglow indices"),
        "rgb = Rgb_matrix(".to_string(),
    ];

    if underglow_colors.is_empty() {
        lines.push(format!("    ledDisplay={},", format_entries(&key_colors)));
    } else {
        lines.push("    ledDisplay=Rgb_matrix_data(".to_string());
        lines.push(format!("        keys={},", format_entries(&key_colors)));
        lines.push(format!("        underglow={}", format_entries(&underglow_colors)));
        lines.push("    ),".to_string());
    }

    lines.push(format!("    rgb_order=({r}, {g}, {b}),"));
    lines.push(format!(
        "    disable_auto_write={},",
        if settings.disable_auto_write { "True" } else { "False" }
    ));
    lines.push(")".to_string());
    lines.push("keyboard.extensions.append(rgb)".to_string());
    lines
}

/// Layer-0 key colors in row-major order.
///
/// A color map entry wins; otherwise unassigned keys are dark and the rest
/// use the default key color.
fn key_colors(
    settings: &LightingSettings,
    keymap: &KeymapModel,
    color_map: &ColorMap,
) -> Vec<RgbColor> {
    let Some(grid) = keymap.layer(0) else {
        return Vec::new();
    };
    grid.iter()
        .flatten()
        .enumerate()
        .map(|(idx, token)| {
            color_map.get(0, idx).unwrap_or(if token == DEFAULT_KEY {
                RgbColor::BLACK
            } else {
                settings.default_key_color
            })
        })
        .collect()
}

fn brightness(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Renders colors as a Python list of `[r, g, b]`, eight per line.
fn format_entries(colors: &[RgbColor]) -> String {
    if colors.is_empty() {
        return "[]".to_string();
    }
    let rows: Vec<String> = colors
        .chunks(ENTRIES_PER_LINE)
        .map(|chunk| {
            let entries: Vec<String> = chunk.iter().map(RgbColor::to_python_list).collect();
            format!("{}{}", " ".repeat(16), entries.join(", "))
        })
        .collect();
    format!("[\n{}\n            ]", rows.join(",\n"))
}
