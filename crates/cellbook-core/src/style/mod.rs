//! Cell styling types
//!
//! This module contains types for cell formatting:
//! - [`Style`] - Complete style record
//! - [`FontStyle`] - Font settings
//! - [`FillStyle`] - Background fill
//! - [`BorderStyle`] - Cell borders
//! - [`Alignment`] - Text alignment
//! - [`Color`] - Color representation
//! - [`StyleTable`] - The workbook's append-only style registry

mod alignment;
mod border;
mod color;
mod fill;
mod font;
mod table;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderLineStyle, BorderStyle};
pub use color::Color;
pub use fill::FillStyle;
pub use font::FontStyle;
pub use table::StyleTable;

/// Complete style record
///
/// Cells refer to records by their index in the [`StyleTable`]; they never
/// own one.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    /// Font settings
    pub font: FontStyle,
    /// Fill/background settings
    pub fill: FillStyle,
    /// Border settings
    pub border: BorderStyle,
    /// Text alignment, `None` for the application default
    pub alignment: Option<Alignment>,
}

impl Style {
    /// Create a new default style (Arial 12, black, no alignment)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font size in points
    pub fn font_size(mut self, size: f64) -> Self {
        self.font.size = size;
        self
    }

    /// Set font name
    pub fn font_name<S: Into<String>>(mut self, name: S) -> Self {
        self.font.name = name.into();
        self
    }

    /// Set font color
    pub fn font_color(mut self, color: Color) -> Self {
        self.font.color = color;
        self
    }

    /// Set fill color (solid fill)
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = FillStyle::Solid { color };
        self
    }

    /// Set all four border edges
    pub fn border(mut self, line: BorderLineStyle) -> Self {
        self.border = BorderStyle::all(line);
        self
    }

    /// Set horizontal alignment
    pub fn horizontal_alignment(mut self, align: HorizontalAlignment) -> Self {
        self.alignment.get_or_insert_with(Alignment::default).horizontal = Some(align);
        self
    }

    /// Set vertical alignment
    pub fn vertical_alignment(mut self, align: VerticalAlignment) -> Self {
        self.alignment.get_or_insert_with(Alignment::default).vertical = Some(align);
        self
    }
}
