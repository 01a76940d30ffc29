//! Error type for the facade crate

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from opening, editing or saving a workbook file
#[derive(Debug, Error)]
pub enum Error {
    /// The document model rejected an edit
    #[error(transparent)]
    Core(#[from] cellbook_core::Error),

    /// The package could not be read or written
    #[error(transparent)]
    Xlsx(#[from] cellbook_xlsx::XlsxError),

    /// The file extension names no supported format
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// `save` was called on a document that was never opened from or saved to a path
    #[error("Document has no file path; use save_as")]
    NoPath,
}
