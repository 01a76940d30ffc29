//! Row types

use std::collections::BTreeMap;

use crate::cell::{Cell, CellAddress};

/// A row: metadata plus its cells, keyed by 1-based column
///
/// Cells do not store their own address; a cell's row is always the
/// index of the row that owns it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    index: u32,
    /// Custom height in points (None = default)
    pub height: Option<f64>,
    /// Row is hidden
    pub hidden: bool,
    cells: BTreeMap<u32, Cell>,
}

impl Row {
    /// Create an empty row with default settings
    pub fn new(index: u32) -> Self {
        Self {
            index,
            height: None,
            hidden: false,
            cells: BTreeMap::new(),
        }
    }

    /// 1-based row index
    pub fn index(&self) -> u32 {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: u32) {
        self.index = index;
    }

    /// Check if this row has any custom settings
    pub fn has_custom_settings(&self) -> bool {
        self.height.is_some() || self.hidden
    }

    /// Get a cell by column
    pub fn cell(&self, column: u32) -> Option<&Cell> {
        self.cells.get(&column)
    }

    pub(crate) fn cell_mut(&mut self, column: u32) -> Option<&mut Cell> {
        self.cells.get_mut(&column)
    }

    pub(crate) fn cell_or_create(&mut self, column: u32) -> &mut Cell {
        self.cells.entry(column).or_default()
    }

    pub(crate) fn remove_cell(&mut self, column: u32) -> Option<Cell> {
        self.cells.remove(&column)
    }

    pub(crate) fn cells_mut(&mut self) -> &mut BTreeMap<u32, Cell> {
        &mut self.cells
    }

    /// Iterate cells in ascending column order
    pub fn cells(&self) -> impl Iterator<Item = (u32, &Cell)> {
        self.cells.iter().map(|(&c, cell)| (c, cell))
    }

    /// Address of the cell at `column` in this row
    pub fn address_of(&self, column: u32) -> Option<CellAddress> {
        CellAddress::new(self.index, column).ok()
    }

    /// Number of materialized cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Lowest and highest used column
    pub fn column_span(&self) -> Option<(u32, u32)> {
        let first = *self.cells.keys().next()?;
        let last = *self.cells.keys().next_back()?;
        Some((first, last))
    }
}
