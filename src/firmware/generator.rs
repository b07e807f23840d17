//! KMK `code.py` generation.
//!
//! The generator is a pure function of the project: the same inputs always
//! produce byte-identical text, so generated scripts can be diffed. Cell
//! tokens are passed through verbatim; checking them is the validator's job.
//!
//! Section order:
//!
//! 1. core imports, extension imports (encoder, analog input, lighting),
//!    macro import
//! 2. keyboard, extension and module registration
//! 3. hardware settings
//! 4. per enabled extension: default block, then the user's code
//! 5. per-layer color lookup (lighting enabled, color map non-empty)
//! 6. macro definitions in library order
//! 7. keymap, one section per layer
//! 8. entry point

use tracing::debug;

use crate::constants::APP_NAME;
use crate::firmware::templates;
use crate::firmware::COLOR_LOOKUP_NAME;
use crate::models::assignment::macro_reference_name;
use crate::models::{
    ColorMap, ExtensionConfigs, ExtensionKind, HardwareSettings, KeymapModel, MacroAction,
    MacroLibrary, Project,
};

const CORE_IMPORTS: &[&str] = &[
    "import board",
    "from kmk.kmk_keyboard import KMKKeyboard",
    "from kmk.keys import KC",
    "from kmk.scanners import DiodeOrientation",
    "from kmk.modules.layers import Layers",
    "from kmk.extensions.media_keys import MediaKeys",
];

const MACROS_IMPORT: &str = "from kmk.modules.macros import Macros, Tap, Press, Release, Delay";

const TRAILER: &[&str] = &["if __name__ == '__main__':", "    keyboard.go()"];

/// Renders a firmware script from borrowed project parts.
pub struct ScriptGenerator<'a> {
    hardware: &'a HardwareSettings,
    keymap: &'a KeymapModel,
    macros: &'a MacroLibrary,
    extensions: &'a ExtensionConfigs,
}

impl<'a> ScriptGenerator<'a> {
    /// Creates a generator over the given parts.
    #[must_use]
    pub const fn new(
        hardware: &'a HardwareSettings,
        keymap: &'a KeymapModel,
        macros: &'a MacroLibrary,
        extensions: &'a ExtensionConfigs,
    ) -> Self {
        Self {
            hardware,
            keymap,
            macros,
            extensions,
        }
    }

    /// Creates a generator over a whole project.
    #[must_use]
    pub const fn for_project(project: &'a Project) -> Self {
        Self::new(
            project.hardware(),
            project.keymap(),
            project.macros(),
            project.extensions(),
        )
    }

    /// Generates the complete script text, ending with a newline.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut lines = Vec::new();
        self.push_imports(&mut lines);
        self.push_registration(&mut lines);
        self.push_hardware(&mut lines);
        self.push_extensions(&mut lines);
        self.push_color_lookup(&mut lines);
        self.push_macros(&mut lines);
        self.push_keymap(&mut lines);

        lines.push(String::new());
        lines.extend(TRAILER.iter().map(ToString::to_string));

        debug!(
            layers = self.keymap.layer_count(),
            macros = self.macros.len(),
            extensions = self.extensions.enabled().count(),
            lines = lines.len(),
            "generated firmware script"
        );

        let mut script = lines.join("\n");
        script.push('\n');
        script
    }

    fn push_imports(&self, lines: &mut Vec<String>) {
        lines.push(format!("# Generated by {APP_NAME}"));
        lines.extend(CORE_IMPORTS.iter().map(ToString::to_string));
        for (kind, _) in self.extensions.enabled() {
            lines.push(templates::import_line(kind).to_string());
        }
        if !self.macros.is_empty() {
            lines.push(MACROS_IMPORT.to_string());
        }
    }

    fn push_registration(&self, lines: &mut Vec<String>) {
        lines.push(String::new());
        lines.push("keyboard = KMKKeyboard()".to_string());
        lines.push(String::new());
        lines.push("# --- Extensions ---".to_string());
        lines.push("keyboard.extensions.append(MediaKeys())".to_string());
        lines.push(String::new());
        lines.push("# --- Modules ---".to_string());
        lines.push("keyboard.modules.append(Layers())".to_string());
        if !self.macros.is_empty() {
            lines.push("keyboard.modules.append(Macros())".to_string());
        }
    }

    fn push_hardware(&self, lines: &mut Vec<String>) {
        lines.push(String::new());
        lines.push("# --- Hardware Settings ---".to_string());
        lines.push(format!(
            "keyboard.diode_orientation = DiodeOrientation.{}",
            self.hardware.diode_orientation
        ));
        lines.push(format!("keyboard.col_pins = {}", pin_tuple(&self.hardware.col_pins)));
        lines.push(format!("keyboard.row_pins = {}", pin_tuple(&self.hardware.row_pins)));
    }

    fn push_extensions(&self, lines: &mut Vec<String>) {
        for (kind, config) in self.extensions.enabled() {
            lines.push(String::new());
            lines.extend(templates::default_template(kind, self.extensions, self.keymap));

            let code = config.code.trim_end();
            if !code.trim().is_empty() {
                lines.push(templates::user_code_header(kind).to_string());
                lines.extend(code.lines().map(ToString::to_string));
            }
        }
    }

    fn push_color_lookup(&self, lines: &mut Vec<String>) {
        let map = &self.extensions.color_map;
        if !self.extensions.is_enabled(ExtensionKind::Lighting) || map.is_empty() {
            return;
        }
        lines.push(String::new());
        lines.push("# --- Per-layer key colors ---".to_string());
        lines.extend(color_lookup(map));
    }

    fn push_macros(&self, lines: &mut Vec<String>) {
        if self.macros.is_empty() {
            return;
        }
        lines.push(String::new());
        lines.push("# --- Macro Definitions ---".to_string());
        for (name, sequence) in self.macros.iter() {
            let steps: Vec<String> = sequence.iter().map(render_action).collect();
            lines.push(format!("{name} = KC.MACRO({})", steps.join(", ")));
        }
    }

    fn push_keymap(&self, lines: &mut Vec<String>) {
        lines.push(String::new());
        lines.push("# --- Keymap ---".to_string());
        lines.push("keyboard.keymap = [".to_string());
        for (index, grid) in self.keymap.layers().iter().enumerate() {
            lines.push(format!("    # Layer {index}"));
            lines.push("    [".to_string());
            for row in grid {
                let cells: Vec<&str> = row.iter().map(|cell| self.render_cell(cell)).collect();
                lines.push(format!("        {},", cells.join(", ")));
            }
            lines.push("    ],".to_string());
        }
        lines.push("]".to_string());
    }

    /// A reference to an existing macro becomes its bare name; anything
    /// else is emitted unchanged.
    fn render_cell<'c>(&self, cell: &'c str) -> &'c str {
        match macro_reference_name(cell) {
            Some(name) if self.macros.contains(name) => name,
            _ => cell,
        }
    }
}

/// `(a, b,)`, or `()` when there are no pins.
fn pin_tuple(pins: &[String]) -> String {
    if pins.is_empty() {
        "()".to_string()
    } else {
        format!("({},)", pins.join(", "))
    }
}

fn render_action(action: &MacroAction) -> String {
    match action {
        MacroAction::Text(text) => format!("\"{}\"", text.replace('"', "\\\"")),
        MacroAction::Tap(code) => format!("Tap({code})"),
        MacroAction::Press(code) => format!("Press({code})"),
        MacroAction::Release(code) => format!("Release({code})"),
        MacroAction::Delay(ms) => format!("Delay({ms})"),
    }
}

/// Sparse `{layer: {key: (r, g, b)}}` dict, one layer per line.
fn color_lookup(map: &ColorMap) -> Vec<String> {
    let mut lines = vec![format!("{COLOR_LOOKUP_NAME} = {{")];
    for (layer, keys) in map.iter() {
        let entries: Vec<String> = keys
            .iter()
            .map(|(idx, color)| format!("{idx}: {}", color.to_python_tuple()))
            .collect();
        lines.push(format!("    {layer}: {{{}}},", entries.join(", ")));
    }
    lines.push("}".to_string());
    lines
}
