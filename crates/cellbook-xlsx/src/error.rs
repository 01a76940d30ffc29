//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX reading/writing
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The archive is not a spreadsheet package
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// A part the package must contain is absent
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A part is present but its content cannot be understood
    #[error("Parse error: {0}")]
    Parse(String),

    /// The document model rejected loaded content
    #[error("Core error: {0}")]
    Core(#[from] cellbook_core::Error),
}
