//! Text alignment types

/// Alignment of a style record; an unset axis uses the application default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alignment {
    /// Horizontal alignment
    pub horizontal: Option<HorizontalAlignment>,
    /// Vertical alignment
    pub vertical: Option<VerticalAlignment>,
}

impl Alignment {
    /// Build from optional axes; `None` when neither is set
    pub fn from_parts(
        horizontal: Option<HorizontalAlignment>,
        vertical: Option<VerticalAlignment>,
    ) -> Option<Self> {
        if horizontal.is_none() && vertical.is_none() {
            None
        } else {
            Some(Self {
                horizontal,
                vertical,
            })
        }
    }
}

/// How text sits across the width of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HorizontalAlignment {
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
    /// Center across selection
    CenterContinuous,
    Distributed,
}

const HORIZONTAL_NAMES: [(HorizontalAlignment, &str); 8] = [
    (HorizontalAlignment::General, "general"),
    (HorizontalAlignment::Left, "left"),
    (HorizontalAlignment::Center, "center"),
    (HorizontalAlignment::Right, "right"),
    (HorizontalAlignment::Fill, "fill"),
    (HorizontalAlignment::Justify, "justify"),
    (HorizontalAlignment::CenterContinuous, "centerContinuous"),
    (HorizontalAlignment::Distributed, "distributed"),
];

impl HorizontalAlignment {
    /// Package attribute value
    pub fn as_str(&self) -> &'static str {
        lookup_name(&HORIZONTAL_NAMES, *self)
    }

    /// Parse a package attribute value
    pub fn parse(s: &str) -> Option<Self> {
        lookup_value(&HORIZONTAL_NAMES, s)
    }
}

/// How text sits across the height of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
    Justify,
    Distributed,
}

const VERTICAL_NAMES: [(VerticalAlignment, &str); 5] = [
    (VerticalAlignment::Top, "top"),
    (VerticalAlignment::Center, "center"),
    (VerticalAlignment::Bottom, "bottom"),
    (VerticalAlignment::Justify, "justify"),
    (VerticalAlignment::Distributed, "distributed"),
];

impl VerticalAlignment {
    /// Package attribute value
    pub fn as_str(&self) -> &'static str {
        lookup_name(&VERTICAL_NAMES, *self)
    }

    /// Parse a package attribute value
    pub fn parse(s: &str) -> Option<Self> {
        lookup_value(&VERTICAL_NAMES, s)
    }
}

fn lookup_name<T: PartialEq>(table: &[(T, &'static str)], value: T) -> &'static str {
    table
        .iter()
        .find(|(v, _)| *v == value)
        .map_or("", |(_, name)| *name)
}

fn lookup_value<T: Copy>(table: &[(T, &str)], name: &str) -> Option<T> {
    table.iter().find(|(_, n)| *n == name).map(|(v, _)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_reversible() {
        for (value, name) in HORIZONTAL_NAMES {
            assert_eq!(value.as_str(), name);
            assert_eq!(HorizontalAlignment::parse(name), Some(value));
        }
        for (value, name) in VERTICAL_NAMES {
            assert_eq!(VerticalAlignment::parse(value.as_str()), Some(value));
            assert_eq!(value.as_str(), name);
        }
        assert_eq!(VerticalAlignment::parse("middle"), None);
    }

    #[test]
    fn test_from_parts_needs_an_axis() {
        assert_eq!(Alignment::from_parts(None, None), None);
        let a = Alignment::from_parts(None, Some(VerticalAlignment::Top)).unwrap();
        assert_eq!(a.horizontal, None);
    }
}
