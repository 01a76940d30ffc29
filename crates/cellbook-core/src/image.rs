//! Embedded pictures
//!
//! Image bytes are opaque: they are never decoded, only stored with the
//! file extension that says what they are.

use crate::cell::{CellAddress, CellRange};
use crate::error::{Error, Result};

/// Raw picture bytes plus their file extension
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Image {
    data: Vec<u8>,
    extension: String,
}

impl Image {
    /// Create an image, normalizing `extension` (".PNG" becomes "png")
    ///
    /// The extension names the media part in a package, so after
    /// normalizing it must be ASCII letters and digits only.
    pub fn new(data: Vec<u8>, extension: &str) -> Result<Self> {
        let extension = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        if extension.is_empty() {
            return Err(Error::ArgumentRequired("extension"));
        }
        if !extension.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(Error::InvalidImageExtension(extension));
        }
        if data.is_empty() {
            return Err(Error::ArgumentRequired("data"));
        }
        Ok(Self { data, extension })
    }

    /// Encoded bytes (PNG, JPEG, ...)
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Lower-case extension without a leading dot, e.g. `"png"`
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// MIME type for the package content-type table
    pub fn content_type(&self) -> String {
        match self.extension.as_str() {
            "jpg" | "jpeg" => "image/jpeg".to_string(),
            "svg" => "image/svg+xml".to_string(),
            "tif" | "tiff" => "image/tiff".to_string(),
            "emf" => "image/x-emf".to_string(),
            "wmf" => "image/x-wmf".to_string(),
            other => format!("image/{}", other),
        }
    }
}

/// The cell rectangle an image is stretched over (1-based, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageAnchor {
    range: CellRange,
}

impl ImageAnchor {
    /// Create an anchor; the end must not lie before the start
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Result<Self> {
        Ok(Self {
            range: CellRange::from_indices(start_row, start_col, end_row, end_col)?,
        })
    }

    pub(crate) fn from_range(range: CellRange) -> Self {
        Self { range }
    }

    /// Covered cells
    pub fn range(&self) -> CellRange {
        self.range
    }

    /// Top-left cell
    pub fn start(&self) -> CellAddress {
        self.range.start()
    }

    /// Bottom-right cell
    pub fn end(&self) -> CellAddress {
        self.range.end()
    }
}

/// An image placed on a sheet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetImage {
    pub image: Image,
    pub anchor: ImageAnchor,
}
