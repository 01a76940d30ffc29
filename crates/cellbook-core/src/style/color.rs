//! Color representation

use crate::error::{Error, Result};
use lazy_regex::regex_captures;
use std::fmt;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parse a hex color: 3 or 6 hex digits with an optional `#`
    ///
    /// The short form doubles each digit, so `"F00"` is `"FF0000"`.
    ///
    /// ```
    /// use cellbook_core::Color;
    ///
    /// assert_eq!(Color::from_hex("#f00").unwrap(), Color::RED);
    /// assert_eq!(Color::from_hex("00FF00").unwrap(), Color::GREEN);
    /// assert!(Color::from_hex("#12345").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let (_, _, head, tail) = regex_captures!(r"^(#)?([0-9a-fA-F]{3})([0-9a-fA-F]{3})?$", hex)
            .ok_or_else(|| Error::InvalidStyleParameter(format!("malformed color '{}'", hex)))?;

        let digits = if tail.is_empty() {
            head.chars().flat_map(|c| [c, c]).collect::<String>()
        } else {
            format!("{}{}", head, tail)
        };

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| Error::InvalidStyleParameter(format!("malformed color '{}'", hex)))
        };

        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parse the 8-digit ARGB form stored in packages; alpha is dropped
    pub fn from_argb_hex(hex: &str) -> Option<Self> {
        let rgb = match hex.len() {
            8 => hex.get(2..)?,
            6 => hex,
            _ => return None,
        };
        Self::from_hex(rgb).ok()
    }

    /// Convert to hex string (without # prefix)
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to opaque ARGB hex, e.g. `"FFFF0000"` for red
    pub fn to_argb_hex(&self) -> String {
        format!("FF{}", self.to_hex())
    }

    // Common colors
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF0000").unwrap(), Color::RED);
        assert_eq!(Color::from_hex("00ff00").unwrap(), Color::GREEN);
        assert_eq!(Color::from_hex("#abc").unwrap(), Color::rgb(0xAA, 0xBB, 0xCC));
        assert_eq!(Color::from_hex("000").unwrap(), Color::BLACK);
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        for bad in ["", "#", "FF00", "#FF00000", "GGG", "##FFF", "FF 000"] {
            assert!(
                matches!(Color::from_hex(bad), Err(Error::InvalidStyleParameter(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_argb() {
        assert_eq!(Color::RED.to_argb_hex(), "FFFF0000");
        assert_eq!(Color::from_argb_hex("FF0000FF"), Some(Color::BLUE));
        assert_eq!(Color::from_argb_hex("nope"), None);
    }

    #[test]
    fn test_argb_rejects_non_ascii() {
        // eight bytes, but the second character spans two of them
        assert_eq!(Color::from_argb_hex("A\u{e9}45678"), None);
        assert_eq!(Color::from_argb_hex("FF\u{e9}4567"), None);
        assert_eq!(Color::from_argb_hex("\u{e9}FFFF"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::rgb(1, 2, 255).to_string(), "#0102FF");
    }
}
