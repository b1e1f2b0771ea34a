//! Colors for cell text, fills and borders.
//!
//! Colors are handed through to the canvas unchanged; this crate never
//! converts between color spaces. Parsing accepts the forms callers tend to
//! write in table options: named colors, `#RRGGBB`, `#RGB` and
//! `rgb(r, g, b)`.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex};

use lru::LruCache;
use regex::Regex;

use crate::sync::lock_recover_debug;

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

const NAMED_COLORS: [(&str, Color); 11] = [
    ("black", Color::BLACK),
    ("white", Color::WHITE),
    ("red", Color::from_rgb(255, 0, 0)),
    ("green", Color::from_rgb(0, 128, 0)),
    ("blue", Color::from_rgb(0, 0, 255)),
    ("yellow", Color::from_rgb(255, 255, 0)),
    ("cyan", Color::from_rgb(0, 255, 255)),
    ("magenta", Color::from_rgb(255, 0, 255)),
    ("gray", Color::from_rgb(128, 128, 128)),
    ("grey", Color::from_rgb(128, 128, 128)),
    ("orange", Color::from_rgb(255, 165, 0)),
];

impl Color {
    /// Pure black.
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);

    /// Create a color from its channels.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse a color string (cached).
    ///
    /// Supported formats:
    /// - Named colors: `black`, `red`, `grey`
    /// - Hex format: `#FF0000` or `#F00`
    /// - RGB format: `rgb(255,0,0)`
    ///
    /// # Errors
    ///
    /// Returns `ColorParseError` if the color string is empty, malformed,
    /// or names an unknown color.
    pub fn parse(color: &str) -> Result<Self, ColorParseError> {
        static CACHE: LazyLock<Mutex<LruCache<String, Color>>> = LazyLock::new(|| {
            Mutex::new(LruCache::new(NonZeroUsize::new(256).expect("non-zero")))
        });

        let normalized = color.trim().to_lowercase();

        if let Some(cached) = lock_recover_debug(&CACHE, "color parse cache").get(&normalized) {
            return Ok(*cached);
        }

        let result = Self::parse_uncached(&normalized)?;
        lock_recover_debug(&CACHE, "color parse cache").put(normalized, result);
        Ok(result)
    }

    fn parse_uncached(color: &str) -> Result<Self, ColorParseError> {
        static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$")
                .expect("valid regex")
        });

        if color.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Some(hex) = color.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(color.to_string()));
        }

        if let Some(caps) = RGB_RE.captures(color) {
            let channel = |idx: usize| caps[idx].parse::<u8>().ok();
            return match (channel(1), channel(2), channel(3)) {
                (Some(r), Some(g), Some(b)) => Ok(Self::from_rgb(r, g, b)),
                _ => Err(ColorParseError::InvalidRgb(color.to_string())),
            };
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == color)
            .map(|(_, value)| *value)
            .ok_or_else(|| ColorParseError::UnknownColor(color.to_string()))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => Some(Self::from_rgb(
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            )),
            3 => {
                let expand = |idx: usize| {
                    let digit = u8::from_str_radix(&hex[idx..=idx], 16).ok()?;
                    Some(digit * 17)
                };
                Some(Self::from_rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Color {
    type Error = ColorParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::from_rgb(red, green, blue)
    }
}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    Empty,
    InvalidHex(String),
    InvalidRgb(String),
    UnknownColor(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty color string"),
            Self::InvalidHex(s) => write!(f, "Invalid hex color: {s}"),
            Self::InvalidRgb(s) => write!(f, "Invalid RGB color: {s}"),
            Self::UnknownColor(s) => write!(f, "Unknown color: {s}"),
        }
    }
}

impl std::error::Error for ColorParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named() {
        assert_eq!(Color::parse("black").unwrap(), Color::BLACK);
        assert_eq!(Color::parse(" Red ").unwrap(), Color::from_rgb(255, 0, 0));
        assert_eq!(Color::parse("grey").unwrap(), Color::parse("gray").unwrap());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse("#ff8000").unwrap(), Color::from_rgb(255, 128, 0));
        assert_eq!(Color::parse("#F00").unwrap(), Color::from_rgb(255, 0, 0));
        assert!(matches!(
            Color::parse("#12345"),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(Color::parse("#zzzzzz").is_err());
    }

    #[test]
    fn test_parse_rgb() {
        assert_eq!(
            Color::parse("rgb(1, 2, 3)").unwrap(),
            Color::from_rgb(1, 2, 3)
        );
        assert!(matches!(
            Color::parse("rgb(300,0,0)"),
            Err(ColorParseError::InvalidRgb(_))
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Color::parse(""), Err(ColorParseError::Empty));
        assert!(matches!(
            Color::parse("chartreuse-ish"),
            Err(ColorParseError::UnknownColor(_))
        ));
    }

    #[test]
    fn test_display() {
        let color = Color::from_rgb(255, 0, 51);
        assert_eq!(color.to_string(), "#ff0033");
    }
}
