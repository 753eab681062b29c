//! Hex color values as they appear in the form and the config document.

use std::fmt;
use std::str::FromStr;

use palette::{LinSrgb, Srgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StudioError;

/// An opaque sRGB color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(pub Srgb<u8>);

impl HexColor {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Srgb::new(r, g, b))
    }

    /// Returns the color in linear light, the space material tints live in.
    pub fn to_linear(self) -> LinSrgb<f32> {
        self.0.into_format::<f32>().into_linear()
    }

    pub fn as_tuple(self) -> (u8, u8, u8) {
        (self.0.red, self.0.green, self.0.blue)
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.as_tuple();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl FromStr for HexColor {
    type Err = StudioError;

    /// Accepts `#rrggbb` and `#rgb`, with or without the leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Srgb::<u8>::from_str(s.trim())
            .map(Self)
            .map_err(|_| StudioError::InvalidColor(s.to_string()))
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!("#ff8000".parse::<HexColor>().unwrap(), HexColor::rgb(255, 128, 0));
        assert_eq!("fff".parse::<HexColor>().unwrap(), HexColor::WHITE);
        assert!("#zzzzzz".parse::<HexColor>().is_err());
    }

    #[test]
    fn displays_lowercase_padded() {
        assert_eq!(HexColor::rgb(1, 2, 255).to_string(), "#0102ff");
        assert_eq!(HexColor::WHITE.to_string(), "#ffffff");
    }

    #[test]
    fn white_is_linear_one() {
        let lin = HexColor::WHITE.to_linear();
        assert!((lin.red - 1.0).abs() < 1e-6);
        assert!((lin.blue - 1.0).abs() < 1e-6);
    }
}
