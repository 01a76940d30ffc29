//! # cellbook
//!
//! A Rust library for building, editing and saving spreadsheet workbooks.
//!
//! The document model lives in `cellbook-core` and the `.xlsx` package
//! codec in `cellbook-xlsx`; this crate ties them together.
//!
//! ## Features
//!
//! - A1-style addressing with a strict, reversible codec
//! - Sparse cell storage that stays consistent under row/column inserts and deletes
//! - Shared, append-only style table
//! - Merged regions, data validation, freeze panes, protection, comments, images
//! - Read and write XLSX files (Office Open XML)
//!
//! ## Example
//!
//! ```rust
//! use cellbook::prelude::*;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_value("A1", "Hello").unwrap();
//! sheet.set_value("B1", 42.0).unwrap();
//! sheet.put_formula("C1", "=B1*2").unwrap();
//! sheet.merge_cells("A3", "C3").unwrap();
//!
//! // workbook.save("output.xlsx").unwrap();
//! ```

pub mod document;
pub mod error;
pub mod prelude;

pub use document::Document;
pub use error::{Error, Result};

pub use cellbook_core::{
    column_letters_to_index, date_to_serial, index_to_column_letters, serial_to_datetime,
    Alignment, BorderLineStyle, BorderStyle, Cell, CellAddress, CellRange, CellValue, Color,
    Column, Comment, DocumentProperties, FillStyle, FontStyle, FreezePaneState,
    HorizontalAlignment, Image, ImageAnchor, Range, RangeMut, Row, SharedStrings, SheetId,
    SheetImage, SheetProtection, SheetVisibility, Style, StyleTable, ValidationCriteria,
    ValidationEntry, ValidationRule, ValidationType, VerticalAlignment, Workbook, Worksheet,
    DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT, MAX_COLUMNS, MAX_ROWS, MAX_SHEET_NAME_LEN,
};

pub use cellbook_xlsx::{XlsxError, XlsxReader, XlsxWriter};

use std::path::Path;

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt: Sized {
    /// Open a workbook from a file
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;

    /// Save the workbook to a file
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Xlsx,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("xlsx") => Ok(FileFormat::Xlsx),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        let path = path.as_ref();
        match FileFormat::from_path(path)? {
            FileFormat::Xlsx => Ok(XlsxReader::read_file(path)?),
        }
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match FileFormat::from_path(path)? {
            FileFormat::Xlsx => {
                XlsxWriter::write_file(self, path)?;
                log::debug!("saved {}", path.display());
                Ok(())
            }
        }
    }
}
