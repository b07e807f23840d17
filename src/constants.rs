//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the defaults of a fresh macropad.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "KMK Macropad Configurator";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "kmkpad";

/// Keycode token written into every empty or cleared cell.
pub const DEFAULT_KEY: &str = "KC.NO";

/// Grid rows of a fresh session (Raspberry Pi Pico 5x4 pad).
pub const DEFAULT_ROWS: usize = 5;

/// Grid columns of a fresh session.
pub const DEFAULT_COLS: usize = 4;

/// Row pins of a fresh session, top to bottom.
pub const DEFAULT_ROW_PINS: [&str; 5] = ["board.GP8", "board.GP7", "board.GP6", "board.GP5", "board.GP4"];

/// Column pins of a fresh session, left to right.
pub const DEFAULT_COL_PINS: [&str; 4] = ["board.GP0", "board.GP1", "board.GP2", "board.GP3"];

/// Data pin driving the per-key LEDs.
pub const DEFAULT_RGB_PIN: &str = "board.GP9";

/// Tap threshold used by the macro recorder, in milliseconds.
pub const DEFAULT_TAP_THRESHOLD_MS: u64 = 200;
