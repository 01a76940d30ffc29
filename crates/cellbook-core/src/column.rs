//! Column types

/// Column metadata
///
/// Columns hold no cells; they exist only when a width or the hidden flag
/// has been set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    index: u32,
    /// Custom width in characters (None = default)
    pub width: Option<f64>,
    /// Column is hidden
    pub hidden: bool,
}

impl Column {
    /// Create a new column with default settings
    pub fn new(index: u32) -> Self {
        Self {
            index,
            width: None,
            hidden: false,
        }
    }

    /// 1-based column index
    pub fn index(&self) -> u32 {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: u32) {
        self.index = index;
    }

    /// Check if this column has any custom settings
    pub fn has_custom_settings(&self) -> bool {
        self.width.is_some() || self.hidden
    }
}
