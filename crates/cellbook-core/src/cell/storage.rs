//! Cell storage implementation
//!
//! Sparse storage for worksheet cells. Rows live in a `BTreeMap` keyed by
//! row index and each row keeps its cells in a `BTreeMap` keyed by column,
//! so iteration is always ordered without sorting after the fact.

use std::collections::BTreeMap;

use super::{CellAddress, CellRange, CellValue};
use crate::column::Column;
use crate::row::Row;
use crate::shift::{remap_keys, AxisEdit};
use crate::{DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT};

/// A single cell: value, style index and optional formula text
///
/// A cell with a formula still carries a cached `value`; nothing here
/// recomputes it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// The cell's value
    pub value: CellValue,
    /// Index into the workbook's style table (0 = default style)
    pub style_index: u32,
    /// Formula text without the leading `=`
    pub formula: Option<String>,
}

impl Cell {
    /// Create a new cell with a value and default style
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Create a new cell with a value and style
    pub fn with_style(value: CellValue, style_index: u32) -> Self {
        Self {
            value,
            style_index,
            formula: None,
        }
    }

    /// Check if this cell carries nothing (no value, default style, no formula)
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.style_index == 0 && self.formula.is_none()
    }
}

/// Sparse row-ordered cell storage plus row/column metadata
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellStore {
    rows: BTreeMap<u32, Row>,
    columns: BTreeMap<u32, Column>,
}

impl CellStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get_cell(&self, addr: CellAddress) -> Option<&Cell> {
        self.rows.get(&addr.row()).and_then(|r| r.cell(addr.column()))
    }

    /// Get a mutable cell
    pub fn get_cell_mut(&mut self, addr: CellAddress) -> Option<&mut Cell> {
        self.rows
            .get_mut(&addr.row())
            .and_then(|r| r.cell_mut(addr.column()))
    }

    /// Get a cell, creating it (and its row) if absent
    pub fn get_or_create_cell(&mut self, addr: CellAddress) -> &mut Cell {
        self.row_or_create(addr.row()).cell_or_create(addr.column())
    }

    /// Remove a cell, dropping its row if nothing else keeps it alive
    pub fn remove_cell(&mut self, addr: CellAddress) -> Option<Cell> {
        let row = self.rows.get_mut(&addr.row())?;
        let removed = row.remove_cell(addr.column());
        if row.is_empty() && !row.has_custom_settings() {
            self.rows.remove(&addr.row());
        }
        removed
    }

    /// Get a row
    pub fn row(&self, index: u32) -> Option<&Row> {
        self.rows.get(&index)
    }

    /// Get a row, creating it if absent
    pub fn row_or_create(&mut self, index: u32) -> &mut Row {
        self.rows.entry(index).or_insert_with(|| Row::new(index))
    }

    /// Iterate rows in ascending index order
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    /// Number of materialized rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get column metadata
    pub fn column(&self, index: u32) -> Option<&Column> {
        self.columns.get(&index)
    }

    /// Get column metadata, creating it if absent
    pub fn column_or_create(&mut self, index: u32) -> &mut Column {
        self.columns
            .entry(index)
            .or_insert_with(|| Column::new(index))
    }

    /// Iterate column metadata in ascending index order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Iterate all cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (CellAddress, &Cell)> {
        self.rows.iter().flat_map(|(&r, row)| {
            row.cells()
                .map(move |(c, cell)| (CellAddress::from_parts(r, c), cell))
        })
    }

    /// Number of materialized cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(Row::cell_count).sum()
    }

    /// Largest number of cells in any one row
    pub fn widest_row(&self) -> usize {
        self.rows.values().map(Row::cell_count).max().unwrap_or(0)
    }

    /// Smallest range covering every materialized cell
    pub fn used_range(&self) -> Option<CellRange> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for row in self.rows.values() {
            let Some((first, last)) = row.column_span() else {
                continue;
            };
            let r = row.index();
            bounds = Some(match bounds {
                None => (r, first, r, last),
                Some((r0, c0, r1, c1)) => (r0.min(r), c0.min(first), r1.max(r), c1.max(last)),
            });
        }
        let (r0, c0, r1, c1) = bounds?;
        CellRange::from_indices(r0, c0, r1, c1).ok()
    }

    /// Row height (returns default if not customized)
    pub fn row_height(&self, index: u32) -> f64 {
        self.rows
            .get(&index)
            .and_then(|r| r.height)
            .unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    /// Column width (returns default if not customized)
    pub fn column_width(&self, index: u32) -> f64 {
        self.columns
            .get(&index)
            .and_then(|c| c.width)
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// Check if a row is hidden
    pub fn is_row_hidden(&self, index: u32) -> bool {
        self.rows.get(&index).map_or(false, |r| r.hidden)
    }

    /// Check if a column is hidden
    pub fn is_column_hidden(&self, index: u32) -> bool {
        self.columns.get(&index).map_or(false, |c| c.hidden)
    }

    /// Apply a row insertion or deletion to cells and row metadata
    pub(crate) fn shift_rows(&mut self, edit: AxisEdit) {
        remap_keys(&mut self.rows, edit, |row, index| row.set_index(index));
    }

    /// Apply a column insertion or deletion to cells and column metadata
    pub(crate) fn shift_columns(&mut self, edit: AxisEdit) {
        for row in self.rows.values_mut() {
            remap_keys(row.cells_mut(), edit, |_, _| {});
        }
        self.rows
            .retain(|_, row| !row.is_empty() || row.has_custom_settings());
        remap_keys(&mut self.columns, edit, |col, index| col.set_index(index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    #[test]
    fn test_basic_operations() {
        let mut store = CellStore::new();
        store.get_or_create_cell(addr("B2")).value = CellValue::Number(42.0);

        let cell = store.get_cell(addr("B2")).unwrap();
        assert_eq!(cell.value.as_number(), Some(42.0));
        assert!(store.get_cell(addr("A1")).is_none());
    }

    #[test]
    fn test_rows_stay_ordered() {
        let mut store = CellStore::new();
        for a in ["C10", "A1", "B5", "A5", "Z2"] {
            store.get_or_create_cell(addr(a)).value = CellValue::text(a);
        }

        let order: Vec<String> = store.iter().map(|(a, _)| a.to_string()).collect();
        assert_eq!(order, vec!["A1", "Z2", "A5", "B5", "C10"]);

        let rows: Vec<u32> = store.rows().map(Row::index).collect();
        assert_eq!(rows, vec![1, 2, 5, 10]);
    }

    #[test]
    fn test_remove_cell_prunes_row() {
        let mut store = CellStore::new();
        store.get_or_create_cell(addr("A3")).value = CellValue::Number(1.0);
        assert_eq!(store.row_count(), 1);

        store.remove_cell(addr("A3"));
        assert_eq!(store.row_count(), 0);

        // rows carrying metadata survive
        store.row_or_create(4).hidden = true;
        store.get_or_create_cell(addr("A4"));
        store.remove_cell(addr("A4"));
        assert_eq!(store.row_count(), 1);
    }

    #[test]
    fn test_used_range() {
        let mut store = CellStore::new();
        assert!(store.used_range().is_none());

        store.get_or_create_cell(addr("D6"));
        store.get_or_create_cell(addr("H11"));
        store.get_or_create_cell(addr("B3"));

        assert_eq!(store.used_range().unwrap().to_string(), "B3:H11");
        assert_eq!(store.widest_row(), 1);
    }

    #[test]
    fn test_metadata_defaults() {
        let mut store = CellStore::new();
        assert_eq!(store.row_height(1), 15.0);
        assert_eq!(store.column_width(1), 8.43);

        store.row_or_create(5).height = Some(30.0);
        store.column_or_create(3).width = Some(20.0);
        assert_eq!(store.row_height(5), 30.0);
        assert_eq!(store.column_width(3), 20.0);
    }

    #[test]
    fn test_shift_rows_and_columns() {
        let mut store = CellStore::new();
        store.get_or_create_cell(addr("A4")).value = CellValue::Number(4.0);
        store.get_or_create_cell(addr("A10")).value = CellValue::Number(10.0);
        store.get_or_create_cell(addr("C1")).value = CellValue::Number(3.0);

        store.shift_rows(AxisEdit::Insert { start: 5, count: 3, limit: crate::MAX_ROWS });
        assert!(store.get_cell(addr("A4")).is_some());
        assert_eq!(store.get_cell(addr("A13")).unwrap().value, CellValue::Number(10.0));
        assert_eq!(store.row(13).unwrap().index(), 13);

        store.shift_columns(AxisEdit::Delete { start: 1, count: 1 });
        assert_eq!(store.get_cell(addr("B1")).unwrap().value, CellValue::Number(3.0));
        assert!(store.get_cell(addr("A4")).is_none());
        // rows left empty by the delete are dropped
        assert!(store.row(4).is_none());
    }
}
