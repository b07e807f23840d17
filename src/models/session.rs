//! Per-session UI context: which layer is shown and which cell is selected.

use crate::error::{ModelError, ModelResult};
use crate::models::keymap::{CellPos, KeymapModel};

/// Explicit session state passed into model operations by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionContext {
    current_layer: usize,
    selection: Option<CellPos>,
}

impl SessionContext {
    /// Fresh context on layer 0 with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer being edited.
    #[must_use]
    pub const fn current_layer(&self) -> usize {
        self.current_layer
    }

    /// Selected cell, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<CellPos> {
        self.selection
    }

    /// Switches to a layer, clamped to the keymap's last layer.
    pub fn set_layer(&mut self, layer: usize, keymap: &KeymapModel) {
        self.current_layer = layer.min(keymap.layer_count() - 1);
    }

    /// Clicks a cell: selects it, or deselects it if it was already selected.
    ///
    /// Returns the new selection.
    pub fn toggle_select(&mut self, pos: CellPos) -> Option<CellPos> {
        self.selection = if self.selection == Some(pos) {
            None
        } else {
            Some(pos)
        };
        self.selection
    }

    /// Drops the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Re-validates the context after layers were removed or the grid resized.
    pub fn clamp_to(&mut self, keymap: &KeymapModel) {
        self.current_layer = self.current_layer.min(keymap.layer_count() - 1);
        if self
            .selection
            .is_some_and(|pos| pos.row >= keymap.rows() || pos.col >= keymap.cols())
        {
            self.selection = None;
        }
    }

    /// Writes `assignment` into the selected cell of the current layer.
    pub fn assign(&self, keymap: &mut KeymapModel, assignment: impl Into<String>) -> ModelResult<CellPos> {
        let pos = self.selection.ok_or_else(|| {
            ModelError::invalid_operation("Select a key on the grid before assigning a keycode")
        })?;
        keymap.set_cell(self.current_layer, pos, assignment);
        Ok(pos)
    }
}
