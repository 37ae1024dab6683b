//! Background color parsing.
//!
//! Accepts `#RRGGBB` (made opaque) and `#RRGGBBAA`; the leading `#` is optional.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SplashError;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("hex color pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(0xff, 0xff, 0xff);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 0xff }
    }

    /// Parse a configured color string.
    pub fn parse(value: &str) -> Result<Self, SplashError> {
        let trimmed = value.trim();
        if !HEX_COLOR.is_match(trimmed) {
            return Err(SplashError::configuration(
                crate::common::constants::KEY_BACKGROUND_COLOR,
                format!("'{value}' is not a #RRGGBB or #RRGGBBAA color"),
            ));
        }

        let hex = trimmed.trim_start_matches('#');
        let channel = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).unwrap_or(0);

        Ok(Rgba {
            r: channel(0),
            g: channel(2),
            b: channel(4),
            a: if hex.len() == 8 { channel(6) } else { 0xff },
        })
    }

    /// Packed `0xAARRGGBB`, the layout most native color APIs take.
    pub fn to_argb_u32(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    /// Alpha as a 0.0-1.0 fraction.
    pub fn alpha_fraction(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

impl FromStr for Rgba {
    type Err = SplashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgba::parse(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}
