//! Border style types

/// Border line style of each cell edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderStyle {
    pub left: BorderLineStyle,
    pub right: BorderLineStyle,
    pub top: BorderLineStyle,
    pub bottom: BorderLineStyle,
}

impl BorderStyle {
    /// Create a border style with no lines
    pub fn new() -> Self {
        Self::default()
    }

    /// Same line style on all four edges
    pub fn all(style: BorderLineStyle) -> Self {
        Self {
            left: style,
            right: style,
            top: style,
            bottom: style,
        }
    }

    /// Check if no edge has a line
    pub fn is_empty(&self) -> bool {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .all(|s| *s == BorderLineStyle::None)
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderLineStyle {
    /// No border
    #[default]
    None,
    /// Thin line
    Thin,
    /// Medium line
    Medium,
    /// Thick line
    Thick,
    /// Dashed line
    Dashed,
    /// Dotted line
    Dotted,
    /// Double line
    Double,
    /// Hair line (very thin)
    Hair,
}

impl BorderLineStyle {
    /// Package attribute value (`None` has no attribute)
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            BorderLineStyle::None => None,
            BorderLineStyle::Thin => Some("thin"),
            BorderLineStyle::Medium => Some("medium"),
            BorderLineStyle::Thick => Some("thick"),
            BorderLineStyle::Dashed => Some("dashed"),
            BorderLineStyle::Dotted => Some("dotted"),
            BorderLineStyle::Double => Some("double"),
            BorderLineStyle::Hair => Some("hair"),
        }
    }

    /// Parse a package attribute value; unknown styles map to `None`
    pub fn parse(s: &str) -> Self {
        match s {
            "thin" => BorderLineStyle::Thin,
            "medium" => BorderLineStyle::Medium,
            "thick" => BorderLineStyle::Thick,
            "dashed" => BorderLineStyle::Dashed,
            "dotted" => BorderLineStyle::Dotted,
            "double" => BorderLineStyle::Double,
            "hair" => BorderLineStyle::Hair,
            _ => BorderLineStyle::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_style_names() {
        for style in [
            BorderLineStyle::Thin,
            BorderLineStyle::Medium,
            BorderLineStyle::Double,
            BorderLineStyle::Hair,
        ] {
            let name = style.as_str().unwrap();
            assert_eq!(BorderLineStyle::parse(name), style);
        }
        assert_eq!(BorderLineStyle::None.as_str(), None);
        assert_eq!(BorderLineStyle::parse("mediumDashDot"), BorderLineStyle::None);
    }

    #[test]
    fn test_all_edges() {
        let b = BorderStyle::all(BorderLineStyle::Thin);
        assert!(!b.is_empty());
        assert!(BorderStyle::new().is_empty());
    }
}
