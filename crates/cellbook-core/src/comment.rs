//! Cell comments (notes)
//!
//! ## Example
//!
//! ```rust
//! use cellbook_core::Workbook;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.add_comment("A1", "Ada", "Check this total").unwrap();
//! assert_eq!(sheet.comment("A1").unwrap().unwrap().author, "Ada");
//! ```

use std::fmt;

/// A note attached to one cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comment {
    /// Author of the comment (may be empty)
    pub author: String,
    /// Comment text
    pub text: String,
}

impl Comment {
    /// Create a comment
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }

    /// Check if this comment has an author
    pub fn has_author(&self) -> bool {
        !self.author.is_empty()
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_author() {
            write!(f, "[{}]: {}", self.author, self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Comment::new("Bo", "hi").to_string(), "[Bo]: hi");
        assert_eq!(Comment::new("", "hi").to_string(), "hi");
    }
}
