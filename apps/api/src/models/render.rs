use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::models::language::Language;

pub const DEFAULT_FONT_SIZE_PX: u32 = 64;
pub const DEFAULT_TEXT_COLOR: Rgb = Rgb(0xff, 0xff, 0xff);
pub const DEFAULT_BACKGROUND_COLOR: Rgb = Rgb(0x00, 0x00, 0x00);

/// An opaque sRGB color parsed from six hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected 6 hex digits, got {0:?}")]
pub struct InvalidColor(pub String);

impl FromStr for Rgb {
    type Err = InvalidColor;

    /// Accepts `rrggbb` with an optional leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| InvalidColor(s.to_string()))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// A validated request to render one piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Non-empty, as received from the caller.
    pub source_text: String,
    pub language: Language,
    pub requested_font_size_px: u32,
    pub text_color: Rgb,
    pub background_color: Rgb,
    pub transparent_background: bool,
}

/// Lenient font size parsing: anything that is not a positive integer
/// falls back to the default.
pub fn parse_font_size(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_FONT_SIZE_PX)
}

pub fn parse_color(raw: Option<&str>, default: Rgb) -> Rgb {
    match raw {
        Some(value) => value.parse().unwrap_or_else(|err: InvalidColor| {
            tracing::debug!("Ignoring color parameter: {err}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_parses_lower_and_upper_hex() {
        assert_eq!("ff8000".parse::<Rgb>(), Ok(Rgb(255, 128, 0)));
        assert_eq!("FF8000".parse::<Rgb>(), Ok(Rgb(255, 128, 0)));
    }

    #[test]
    fn test_rgb_accepts_hash_prefix() {
        assert_eq!("#0a0b0c".parse::<Rgb>(), Ok(Rgb(10, 11, 12)));
    }

    #[test]
    fn test_rgb_rejects_short_and_non_hex() {
        assert!("fff".parse::<Rgb>().is_err());
        assert!("zzzzzz".parse::<Rgb>().is_err());
        assert!("ffffff0".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_rgb_display_is_lowercase_hex() {
        assert_eq!(Rgb(255, 0, 171).to_string(), "ff00ab");
    }

    #[test]
    fn test_parse_font_size_defaults() {
        assert_eq!(parse_font_size(None), 64);
        assert_eq!(parse_font_size(Some("abc")), 64);
        assert_eq!(parse_font_size(Some("0")), 64);
        assert_eq!(parse_font_size(Some("-12")), 64);
        assert_eq!(parse_font_size(Some("80")), 80);
    }

    #[test]
    fn test_parse_color_falls_back_on_garbage() {
        assert_eq!(parse_color(Some("nope"), DEFAULT_TEXT_COLOR), DEFAULT_TEXT_COLOR);
        assert_eq!(parse_color(Some("00ff00"), DEFAULT_TEXT_COLOR), Rgb(0, 255, 0));
        assert_eq!(parse_color(None, DEFAULT_BACKGROUND_COLOR), DEFAULT_BACKGROUND_COLOR);
    }
}
