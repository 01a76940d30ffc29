//! # cellbook-core
//!
//! In-memory spreadsheet document model for cellbook.
//!
//! This crate holds the workbook structure and the edit operations that
//! keep it consistent:
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing (1-based)
//! - [`CellValue`] and [`CellStore`] - sparse, ordered cell storage
//! - [`Worksheet`] - structural edits, merges, validations, freeze panes
//! - [`StyleTable`] - append-only style records referenced by index
//! - [`Workbook`] - sheet lifecycle, styles, shared strings, properties
//!
//! Reading and writing files lives in `cellbook-xlsx`.
//!
//! ## Example
//!
//! ```rust
//! use cellbook_core::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_value("A10", "moves").unwrap();
//! sheet.insert_rows(5, 3).unwrap();
//! assert_eq!(sheet.get_value("A13").unwrap(), CellValue::Text("moves".into()));
//!
//! let range = sheet.get_range("A1", "B10").unwrap();
//! assert_eq!((range.row_count(), range.column_count()), (10, 2));
//! ```

pub mod cell;
pub mod column;
pub mod comment;
pub mod error;
pub mod image;
pub mod properties;
pub mod protection;
pub mod range;
pub mod row;
mod shift;
pub mod style;
pub mod validation;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{
    column_letters_to_index, date_to_serial, index_to_column_letters, serial_to_datetime, Cell,
    CellAddress, CellRange, CellStore, CellValue, SharedStrings,
};
pub use column::Column;
pub use comment::Comment;
pub use error::{Error, Result};
pub use image::{Image, ImageAnchor, SheetImage};
pub use properties::DocumentProperties;
pub use protection::SheetProtection;
pub use range::{Range, RangeMut};
pub use row::Row;
pub use style::{
    Alignment, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle, HorizontalAlignment,
    Style, StyleTable, VerticalAlignment,
};
pub use validation::{ValidationCriteria, ValidationEntry, ValidationRule, ValidationType};
pub use workbook::Workbook;
pub use worksheet::{FreezePaneState, SheetId, SheetVisibility, Worksheet};

/// Maximum number of rows in a worksheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet
pub const MAX_COLUMNS: u32 = 16_384;

/// Maximum length of a sheet name, in characters
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Column width used when a column has no custom width
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Row height in points used when a row has no custom height
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;
