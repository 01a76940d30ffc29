//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`Cell`] - Value, style index and formula of one cell
//! - [`CellStore`] - Sparse ordered storage for a sheet's cells

mod address;
mod storage;
mod value;

pub use address::{
    column_letters_to_index, format, index_to_column_letters, parse, CellAddress, CellRange,
    CellRangeIter,
};
pub use storage::{Cell, CellStore};
pub use value::{date_to_serial, serial_to_datetime, CellValue, SharedStrings};
