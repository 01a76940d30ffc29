//! Error types for cellbook-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellbook-core
///
/// Every error is a local failure of the call that produced it; the
/// workbook stays usable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed cell reference text
    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    /// Range whose end lies before its start
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Sheet name collides with an existing sheet
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Sheet name is too long or contains a reserved character
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// The workbook must keep at least one sheet
    #[error("Cannot remove the last remaining sheet")]
    CannotRemoveLastSheet,

    /// Every sheet id up to `u32::MAX` has been handed out
    #[error("No sheet ids left in this workbook")]
    SheetIdsExhausted,

    /// Merge region intersects an existing one
    #[error("Merge region {0} overlaps an existing merged region")]
    OverlappingMergeRegion(String),

    /// Validation kind not accepted by the requested constructor
    #[error("Unsupported validation type: {0}")]
    UnsupportedValidationType(String),

    /// Image extension with characters other than ASCII letters and digits
    #[error("Invalid image extension: {0}")]
    InvalidImageExtension(String),

    /// A list option that the package list syntax cannot carry
    #[error("Invalid list option: {0}")]
    InvalidListOption(String),

    /// Bad font size, color, or style index
    #[error("Invalid style parameter: {0}")]
    InvalidStyleParameter(String),

    /// A required string argument was empty
    #[error("Argument required: {0}")]
    ArgumentRequired(&'static str),
}

impl Error {
    /// Shorthand for an [`Error::InvalidReference`]
    pub fn reference<S: Into<String>>(msg: S) -> Self {
        Error::InvalidReference(msg.into())
    }
}
