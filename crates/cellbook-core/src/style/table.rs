//! Append-only style registry

use super::{Alignment, Color, HorizontalAlignment, Style, VerticalAlignment};
use crate::error::{Error, Result};

/// The workbook's style registry
///
/// Index 0 is the default style and always exists. Records are only ever
/// appended, so an index handed out once stays valid for the lifetime of
/// the workbook. Identical records are not merged.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleTable {
    styles: Vec<Style>,
}

impl StyleTable {
    /// Create a table holding only the default style
    pub fn new() -> Self {
        Self {
            styles: vec![Style::default()],
        }
    }

    /// Rebuild a table from loaded records, keeping their order
    ///
    /// An empty list yields a fresh table with the default style.
    pub fn from_records(records: Vec<Style>) -> Self {
        if records.is_empty() {
            Self::new()
        } else {
            Self { styles: records }
        }
    }

    /// Append a style built from font and alignment settings
    ///
    /// ```
    /// use cellbook_core::{HorizontalAlignment, StyleTable};
    ///
    /// let mut table = StyleTable::new();
    /// let idx = table
    ///     .create_style("Calibri", 14.0, "#F00", Some(HorizontalAlignment::Center), None)
    ///     .unwrap();
    /// assert_eq!(idx, 1);
    /// ```
    pub fn create_style(
        &mut self,
        font_name: &str,
        font_size: f64,
        color: &str,
        horizontal: Option<HorizontalAlignment>,
        vertical: Option<VerticalAlignment>,
    ) -> Result<u32> {
        let style = build_style(font_name, font_size, color, horizontal, vertical)?;
        self.push(style)
    }

    /// Append a complete style record and return its index
    pub fn push(&mut self, style: Style) -> Result<u32> {
        validate(&style)?;
        let idx = self.styles.len() as u32;
        self.styles.push(style);
        Ok(idx)
    }

    /// Replace the default style (index 0) in place
    pub fn update_default_style(
        &mut self,
        font_name: &str,
        font_size: f64,
        color: &str,
        horizontal: Option<HorizontalAlignment>,
        vertical: Option<VerticalAlignment>,
    ) -> Result<()> {
        let style = build_style(font_name, font_size, color, horizontal, vertical)?;
        self.styles[0] = style;
        Ok(())
    }

    /// Get a style by index
    pub fn get(&self, index: u32) -> Option<&Style> {
        self.styles.get(index as usize)
    }

    /// Check whether `index` refers to a record
    pub fn contains(&self, index: u32) -> bool {
        (index as usize) < self.styles.len()
    }

    /// Get the default style (index 0)
    pub fn default_style(&self) -> &Style {
        &self.styles[0]
    }

    /// Number of records, including the default
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Always false: the default record cannot be removed
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Iterate over all styles with their indices
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Style)> {
        self.styles.iter().enumerate().map(|(i, s)| (i as u32, s))
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

fn build_style(
    font_name: &str,
    font_size: f64,
    color: &str,
    horizontal: Option<HorizontalAlignment>,
    vertical: Option<VerticalAlignment>,
) -> Result<Style> {
    let mut style = Style::new()
        .font_name(font_name)
        .font_size(font_size)
        .font_color(Color::from_hex(color)?);
    style.alignment = Alignment::from_parts(horizontal, vertical);
    validate(&style)?;
    Ok(style)
}

fn validate(style: &Style) -> Result<()> {
    if style.font.name.trim().is_empty() {
        return Err(Error::ArgumentRequired("font_name"));
    }
    let size = style.font.size;
    if !size.is_finite() || size <= 0.0 {
        return Err(Error::InvalidStyleParameter(format!(
            "font size must be positive, got {}",
            size
        )));
    }
    Ok(())
}
