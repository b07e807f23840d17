//! Bulk coloring of keys by category or group.
//!
//! Indices are row-major (`row * cols + col`) over every cell, matching or
//! not, so they line up with the LED order of the lighting block.

use tracing::debug;

use crate::keycode_db::KeycodeDb;
use crate::models::{ColorMap, ColorTarget, KeymapModel, Project, RgbColor};

/// Colors every cell of `layer` that belongs to `target`.
///
/// Non-matching keys keep whatever color they had. Returns the number of
/// keys colored.
pub fn apply_color_target(
    keymap: &KeymapModel,
    color_map: &mut ColorMap,
    layer: usize,
    target: ColorTarget,
    color: RgbColor,
    db: &KeycodeDb,
) -> usize {
    let Some(grid) = keymap.layer(layer) else {
        return 0;
    };

    let mut colored = 0;
    for (idx, token) in grid.iter().flatten().enumerate() {
        if target.matches(db, token) {
            color_map.set(layer, idx, color);
            colored += 1;
        }
    }
    debug!(layer, target = %target, colored, "applied color target");
    colored
}

/// Colors a project layer with the color configured for `target`.
pub fn color_project_layer(
    project: &mut Project,
    layer: usize,
    target: ColorTarget,
    db: &KeycodeDb,
) -> usize {
    let color = project.extensions().lighting_settings.color_for(target);
    // keymap is cloned out so the color map can be borrowed mutably
    let keymap = project.keymap().clone();
    apply_color_target(
        &keymap,
        &mut project.extensions_mut().color_map,
        layer,
        target,
        color,
        db,
    )
}
