//! End-to-end tests for firmware script generation.

use kmkpad::firmware::ScriptGenerator;
use kmkpad::models::{
    CellPos, ExtensionKind, HardwareProfile, HardwareSettings, MacroAction, Project, RgbColor,
};

fn two_by_two_project() -> Project {
    let mut project = Project::new();
    project.apply_profile(&HardwareProfile {
        rows: 2,
        cols: 2,
        settings: HardwareSettings {
            row_pins: vec!["board.GP8".into(), "board.GP7".into()],
            col_pins: vec!["board.GP0".into(), "board.GP1".into()],
            ..HardwareSettings::default()
        },
    });
    project
        .add_macro(
            "hello",
            vec![
                MacroAction::Text(r#"hi "you""#.into()),
                MacroAction::Tap("KC.ENT".into()),
                MacroAction::Delay(50),
            ],
        )
        .unwrap();

    let keymap = project.keymap_mut();
    keymap.set_cell(0, CellPos::new(0, 0), "KC.A");
    keymap.set_cell(0, CellPos::new(0, 1), "MACRO(HELLO)");
    keymap.set_cell(0, CellPos::new(1, 0), "KC.LCTL(KC.C)");
    let layer = keymap.add_layer();
    keymap.set_cell(layer, CellPos::new(0, 0), "KC.TRNS");
    project
}

const EXPECTED_WITH_ENCODER: &str = r#"# Generated by KMK Macropad Configurator
import board
from kmk.kmk_keyboard import KMKKeyboard
from kmk.keys import KC
from kmk.scanners import DiodeOrientation
from kmk.modules.layers import Layers
from kmk.extensions.media_keys import MediaKeys
from kmk.modules.encoder import EncoderHandler
from kmk.modules.macros import Macros, Tap, Press, Release, Delay

keyboard = KMKKeyboard()

# --- Extensions ---
keyboard.extensions.append(MediaKeys())

# --- Modules ---
keyboard.modules.append(Layers())
keyboard.modules.append(Macros())

# --- Hardware Settings ---
keyboard.diode_orientation = DiodeOrientation.COL2ROW
keyboard.col_pins = (board.GP0, board.GP1,)
keyboard.row_pins = (board.GP8, board.GP7,)

# --- Encoder Handler (auto-generated) ---
encoder_handler = EncoderHandler()
# Configure pins and map for your hardware. Examples:
# encoder_handler.pins = ((board.GP17, board.GP15, board.GP14),)
# encoder_handler.map = [ ((KC.VOLD, KC.VOLU, KC.MUTE),), ]
keyboard.modules.append(encoder_handler)
# Encoder configuration:
encoder_handler.pins = ((board.GP10, board.GP11, board.GP14),)

# --- Macro Definitions ---
HELLO = KC.MACRO("hi \"you\"", Tap(KC.ENT), Delay(50))

# --- Keymap ---
keyboard.keymap = [
    # Layer 0
    [
        KC.A, HELLO,
        KC.LCTL(KC.C), KC.NO,
    ],
    # Layer 1
    [
        KC.TRNS, KC.NO,
        KC.NO, KC.NO,
    ],
]

if __name__ == '__main__':
    keyboard.go()
"#;

#[test]
fn test_full_script_matches_expected_text() {
    let mut project = two_by_two_project();
    let ext = project.extensions_mut();
    ext.set_enabled(ExtensionKind::Encoder, true);
    ext.set_code(
        ExtensionKind::Encoder,
        "encoder_handler.pins = ((board.GP10, board.GP11, board.GP14),)\n",
    );

    let script = ScriptGenerator::for_project(&project).generate();
    assert_eq!(script, EXPECTED_WITH_ENCODER);
}

#[test]
fn test_generation_is_deterministic() {
    let mut project = two_by_two_project();
    let ext = project.extensions_mut();
    for kind in ExtensionKind::ALL {
        ext.set_enabled(kind, true);
        ext.set_code(kind, format!("# user {kind}"));
    }
    ext.color_map.set(1, 3, RgbColor::new(0, 0, 255));
    ext.color_map.set(0, 0, RgbColor::new(255, 0, 0));

    let first = ScriptGenerator::for_project(&project).generate();
    let second = ScriptGenerator::for_project(&project.clone()).generate();
    assert_eq!(first, second);
}

#[test]
fn test_extension_sections_follow_fixed_order() {
    let mut project = two_by_two_project();
    let ext = project.extensions_mut();
    ext.set_enabled(ExtensionKind::Lighting, true);
    ext.set_enabled(ExtensionKind::AnalogIn, true);
    ext.set_enabled(ExtensionKind::Encoder, true);
    ext.set_code(ExtensionKind::AnalogIn, "slider = 1");
    ext.set_code(ExtensionKind::Lighting, "rgb.brightness = 1");

    let script = ScriptGenerator::for_project(&project).generate();
    let at = |needle: &str| {
        script
            .find(needle)
            .unwrap_or_else(|| panic!("missing {needle:?}"))
    };

    assert!(at("import EncoderHandler") < at("import AnalogInputs"));
    assert!(at("import AnalogInputs") < at("import Rgb_matrix"));
    assert!(at("import Rgb_matrix") < at("from kmk.modules.macros"));

    assert!(at("# --- Hardware Settings ---") < at("# --- Encoder Handler"));
    assert!(at("# --- Encoder Handler") < at("# --- Analog Inputs"));
    assert!(at("# --- Analog Inputs") < at("# AnalogIn configuration provided by user:\nslider = 1"));
    assert!(at("slider = 1") < at("# --- RGB Matrix"));
    assert!(at("# --- RGB Matrix") < at("# RGB configuration provided by user:\nrgb.brightness = 1"));
    assert!(at("rgb.brightness = 1") < at("# --- Macro Definitions ---"));
    assert!(at("# --- Macro Definitions ---") < at("# --- Keymap ---"));

    // encoder has no user code, so only its template appears
    assert!(!script.contains("# Encoder configuration:"));
}

#[test]
fn test_user_code_is_not_deduplicated() {
    let mut project = Project::new();
    let ext = project.extensions_mut();
    ext.set_enabled(ExtensionKind::Encoder, true);
    ext.set_code(ExtensionKind::Encoder, "encoder_handler = EncoderHandler()");

    let script = ScriptGenerator::for_project(&project).generate();
    assert_eq!(script.matches("encoder_handler = EncoderHandler()").count(), 2);
}

#[test]
fn test_lighting_block_and_sparse_color_lookup() {
    let mut project = two_by_two_project();
    let ext = project.extensions_mut();
    ext.set_enabled(ExtensionKind::Lighting, true);
    ext.color_map.set(0, 1, RgbColor::new(255, 0, 0));
    ext.color_map.set(1, 3, RgbColor::new(0, 0, 255));

    let script = ScriptGenerator::for_project(&project).generate();
    assert!(script.contains("keyboard.rgb_pixel_pin = board.GP9\n"));
    assert!(script.contains("keyboard.num_pixels = 4\n"));
    assert!(script.contains("keyboard.brightness_limit = 0.5\n"));
    // layer 0: KC.A default white, HELLO from the map, combo white, KC.NO dark
    assert!(script.contains(
        "                [255, 255, 255], [255, 0, 0], [255, 255, 255], [0, 0, 0]\n"
    ));
    assert!(script.contains(
        "LAYER_KEY_COLORS = {\n    0: {1: (255, 0, 0)},\n    1: {3: (0, 0, 255)},\n}\n"
    ));
    assert!(
        script.find("LAYER_KEY_COLORS").unwrap()
            < script.find("# --- Macro Definitions ---").unwrap()
    );
}

#[test]
fn test_unknown_tokens_pass_through() {
    let mut project = Project::new();
    project
        .keymap_mut()
        .set_cell(0, CellPos::new(4, 3), "KC.DEFINITELY_NOT_REAL");
    project
        .keymap_mut()
        .set_cell(0, CellPos::new(0, 0), "MACRO(GONE)");

    let script = ScriptGenerator::for_project(&project).generate();
    assert!(script.contains("KC.DEFINITELY_NOT_REAL,\n"));
    assert!(script.contains("        MACRO(GONE), KC.NO"));
    assert!(!script.contains("Macros"));
}

#[test]
fn test_rename_is_reflected_in_script() {
    let mut project = two_by_two_project();
    project.rename_macro("HELLO", "greet").unwrap();

    let script = ScriptGenerator::for_project(&project).generate();
    assert!(script.contains("GREET = KC.MACRO("));
    assert!(script.contains("        KC.A, GREET,\n"));
    assert!(!script.contains("HELLO"));
}
