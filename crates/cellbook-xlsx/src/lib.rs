//! # cellbook-xlsx
//!
//! XLSX (Office Open XML) package reader and writer for cellbook.
//!
//! The reader opens the zip archive, parses every part into a
//! [`cellbook_core::Workbook`] and drops the archive before returning,
//! on success and on error alike. The writer flattens a workbook into a
//! fresh archive in a single call.
//!
//! ```no_run
//! use cellbook_core::Workbook;
//! use cellbook_xlsx::{XlsxReader, XlsxWriter};
//!
//! let mut workbook = Workbook::new();
//! workbook.worksheet_mut(0).unwrap().set_value("A1", "aaa A1").unwrap();
//! XlsxWriter::write_file(&workbook, "out.xlsx").unwrap();
//!
//! let loaded = XlsxReader::read_file("out.xlsx").unwrap();
//! assert_eq!(loaded.sheet_names(), vec!["Sheet1"]);
//! ```

pub mod error;
pub mod reader;
pub mod writer;

mod doc_props;
mod styles;
mod xml;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
