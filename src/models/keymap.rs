//! Layered key grid.

use crate::constants::DEFAULT_KEY;
use crate::error::{ModelError, ModelResult};
use crate::models::assignment::{macro_reference_name, KeyAssignment};

/// One layer: `rows` rows of `cols` cell texts.
pub type Grid = Vec<Vec<String>>;

/// Cell position inside a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    /// Row (0-based)
    pub row: usize,
    /// Column (0-based)
    pub col: usize,
}

impl CellPos {
    /// Creates a new position.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// The layered grid of key assignments.
///
/// Every layer always has exactly `rows x cols` cells, and there is always
/// at least one layer. Cell text is interpreted through [`KeyAssignment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeymapModel {
    rows: usize,
    cols: usize,
    layers: Vec<Grid>,
}

impl KeymapModel {
    /// Creates a keymap with one layer of default keys.
    ///
    /// Dimensions below 1 are raised to 1.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            layers: vec![blank_grid(rows, cols)],
        }
    }

    /// Builds a keymap from persisted layers, adapting each to `rows x cols`.
    ///
    /// Overlapping cells are copied and the rest filled with the default key;
    /// an empty layer list yields one default layer.
    #[must_use]
    pub fn from_layers(rows: usize, cols: usize, layers: Vec<Grid>) -> Self {
        let mut model = Self::new(rows, cols);
        if !layers.is_empty() {
            model.layers = layers
                .iter()
                .map(|layer| adapt_grid(layer, model.rows, model.cols))
                .collect();
        }
        model
    }

    /// Number of rows in every layer.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in every layer.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Cells per layer.
    #[must_use]
    pub const fn key_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Row-major linear index of a cell.
    #[must_use]
    pub const fn linear_index(&self, pos: CellPos) -> usize {
        pos.row * self.cols + pos.col
    }

    /// Number of layers (always at least one).
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// All layers in order.
    #[must_use]
    pub fn layers(&self) -> &[Grid] {
        &self.layers
    }

    /// A single layer, if it exists.
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&Grid> {
        self.layers.get(index)
    }

    /// Changes the grid dimensions of every layer at once.
    ///
    /// The overlapping top-left region is preserved and new cells get the
    /// default key. Dimensions below 1 are raised to 1.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        let rows = rows.max(1);
        let cols = cols.max(1);
        self.layers = self
            .layers
            .iter()
            .map(|layer| adapt_grid(layer, rows, cols))
            .collect();
        self.rows = rows;
        self.cols = cols;
    }

    /// Returns the text of a cell.
    ///
    /// # Panics
    ///
    /// Panics if the layer or position is out of range.
    #[must_use]
    pub fn cell(&self, layer: usize, pos: CellPos) -> &str {
        self.check_bounds(layer, pos);
        &self.layers[layer][pos.row][pos.col]
    }

    /// Returns the parsed assignment of a cell.
    ///
    /// # Panics
    ///
    /// Panics if the layer or position is out of range.
    #[must_use]
    pub fn assignment(&self, layer: usize, pos: CellPos) -> KeyAssignment {
        KeyAssignment::parse(self.cell(layer, pos))
    }

    /// Overwrites a cell.
    ///
    /// # Panics
    ///
    /// Panics if the layer or position is out of range.
    pub fn set_cell(&mut self, layer: usize, pos: CellPos, assignment: impl Into<String>) {
        self.check_bounds(layer, pos);
        self.layers[layer][pos.row][pos.col] = assignment.into();
    }

    /// Appends a layer of default keys and returns its index.
    pub fn add_layer(&mut self) -> usize {
        self.layers.push(blank_grid(self.rows, self.cols));
        self.layers.len() - 1
    }

    /// Removes a layer; later layers shift down by one.
    pub fn remove_layer(&mut self, index: usize) -> ModelResult<()> {
        if self.layers.len() <= 1 {
            return Err(ModelError::invalid_operation(
                "You must have at least one layer",
            ));
        }
        if index >= self.layers.len() {
            return Err(ModelError::invalid_operation(format!(
                "Layer {index} does not exist ({} layers)",
                self.layers.len()
            )));
        }
        self.layers.remove(index);
        Ok(())
    }

    /// Rewrites every reference to macro `old` so it points at `new`.
    ///
    /// Returns the number of cells changed.
    pub fn rename_macro_references(&mut self, old: &str, new: &str) -> usize {
        let replacement = KeyAssignment::macro_ref(new).to_string();
        self.rewrite_references(old, &replacement)
    }

    /// Replaces every reference to macro `name` with the default key.
    ///
    /// Returns the number of cells changed.
    pub fn clear_macro_references(&mut self, name: &str) -> usize {
        self.rewrite_references(name, DEFAULT_KEY)
    }

    /// Iterates `(layer, position, text)` over every cell, row-major per layer.
    pub fn cells(&self) -> impl Iterator<Item = (usize, CellPos, &str)> + '_ {
        self.layers.iter().enumerate().flat_map(|(l, grid)| {
            grid.iter().enumerate().flat_map(move |(r, row)| {
                row.iter()
                    .enumerate()
                    .map(move |(c, text)| (l, CellPos::new(r, c), text.as_str()))
            })
        })
    }

    /// Number of cells, across all layers, referencing macro `name`.
    #[must_use]
    pub fn count_macro_references(&self, name: &str) -> usize {
        self.cells()
            .filter(|(_, _, text)| macro_reference_name(text) == Some(name))
            .count()
    }

    fn rewrite_references(&mut self, name: &str, replacement: &str) -> usize {
        let mut changed = 0;
        for cell in self.layers.iter_mut().flatten().flatten() {
            if macro_reference_name(cell) == Some(name) {
                *cell = replacement.to_string();
                changed += 1;
            }
        }
        changed
    }

    fn check_bounds(&self, layer: usize, pos: CellPos) {
        assert!(
            layer < self.layers.len() && pos.row < self.rows && pos.col < self.cols,
            "cell ({layer}, {}, {}) outside {} layers of {}x{}",
            pos.row,
            pos.col,
            self.layers.len(),
            self.rows,
            self.cols
        );
    }
}

impl Default for KeymapModel {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_ROWS, crate::constants::DEFAULT_COLS)
    }
}

fn blank_grid(rows: usize, cols: usize) -> Grid {
    vec![vec![DEFAULT_KEY.to_string(); cols]; rows]
}

/// Copies the overlapping top-left region of `src` into a fresh grid.
fn adapt_grid(src: &Grid, rows: usize, cols: usize) -> Grid {
    let mut grid = blank_grid(rows, cols);
    for (dst_row, src_row) in grid.iter_mut().zip(src) {
        for (dst, text) in dst_row.iter_mut().zip(src_row) {
            dst.clone_from(text);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(rows: usize, cols: usize) -> KeymapModel {
        let mut model = KeymapModel::new(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                model.set_cell(0, CellPos::new(r, c), format!("KC.F{}", r * cols + c + 1));
            }
        }
        model
    }

    #[test]
    fn test_new_and_default() {
        let model = KeymapModel::default();
        assert_eq!((model.rows(), model.cols()), (5, 4));
        assert_eq!(model.layer_count(), 1);
        assert!(model.cells().all(|(_, _, text)| text == DEFAULT_KEY));

        let model = KeymapModel::new(0, 0);
        assert_eq!((model.rows(), model.cols()), (1, 1));
    }

    #[test]
    fn test_resize_round_trip_preserves_overlap() {
        let mut model = filled(3, 4);
        model.add_layer();
        model.set_cell(1, CellPos::new(0, 0), "KC.ESC");
        let before = model.clone();

        model.resize(2, 6);
        assert_eq!(model.cell(0, CellPos::new(1, 3)), "KC.F8");
        assert_eq!(model.cell(0, CellPos::new(1, 5)), DEFAULT_KEY);

        model.resize(3, 4);
        for r in 0..2 {
            for c in 0..4 {
                let pos = CellPos::new(r, c);
                assert_eq!(model.cell(0, pos), before.cell(0, pos));
            }
        }
        assert_eq!(model.cell(0, CellPos::new(2, 0)), DEFAULT_KEY);
        assert_eq!(model.cell(1, CellPos::new(0, 0)), "KC.ESC");
    }

    #[test]
    fn test_resize_to_single_cell() {
        let mut model = filled(5, 4);
        model.resize(1, 1);
        assert_eq!(model.key_count(), 1);
        assert_eq!(model.cell(0, CellPos::new(0, 0)), "KC.F1");
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_range_cell_panics() {
        let model = KeymapModel::new(2, 2);
        let _ = model.cell(0, CellPos::new(2, 0));
    }

    #[test]
    fn test_remove_layer_rules() {
        let mut model = KeymapModel::new(2, 2);
        assert!(matches!(model.remove_layer(0), Err(ModelError::InvalidOperation(_))));

        assert_eq!(model.add_layer(), 1);
        assert_eq!(model.add_layer(), 2);
        model.set_cell(2, CellPos::new(0, 0), "KC.B");
        assert!(model.remove_layer(5).is_err());

        model.remove_layer(1).unwrap();
        assert_eq!(model.layer_count(), 2);
        assert_eq!(model.cell(1, CellPos::new(0, 0)), "KC.B");
    }

    #[test]
    fn test_macro_reference_rewrites() {
        let mut model = KeymapModel::new(2, 2);
        model.add_layer();
        model.set_cell(0, CellPos::new(0, 1), "MACRO(FOO)");
        model.set_cell(1, CellPos::new(1, 0), "MACRO(FOO)");
        model.set_cell(1, CellPos::new(1, 1), "MACRO(FOOBAR)");

        assert_eq!(model.rename_macro_references("FOO", "BAR"), 2);
        assert_eq!(model.cell(0, CellPos::new(0, 1)), "MACRO(BAR)");
        assert_eq!(model.cell(1, CellPos::new(1, 0)), "MACRO(BAR)");
        assert_eq!(model.cell(1, CellPos::new(1, 1)), "MACRO(FOOBAR)");

        assert_eq!(model.clear_macro_references("BAR"), 2);
        assert_eq!(model.count_macro_references("BAR"), 0);
        assert_eq!(model.cell(1, CellPos::new(1, 0)), DEFAULT_KEY);
    }

    #[test]
    fn test_from_layers_adapts_shape() {
        let layers = vec![
            vec![vec!["KC.A".to_string()]],
            vec![
                vec!["KC.B".to_string(), "KC.C".to_string(), "KC.D".to_string()],
                vec!["KC.E".to_string()],
            ],
        ];
        let model = KeymapModel::from_layers(2, 2, layers);
        assert_eq!(model.layer_count(), 2);
        assert_eq!(model.cell(0, CellPos::new(0, 0)), "KC.A");
        assert_eq!(model.cell(0, CellPos::new(1, 1)), DEFAULT_KEY);
        assert_eq!(model.cell(1, CellPos::new(0, 1)), "KC.C");
        assert_eq!(model.cell(1, CellPos::new(1, 1)), DEFAULT_KEY);

        assert_eq!(KeymapModel::from_layers(2, 2, Vec::new()).layer_count(), 1);
    }
}
