// src/color.rs

//! Defines the `Rgba` pixel color, its `#RRGGBB` text form, and colorkey
//! detection for font images.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FontError;
use crate::surface::PixelBuffer;

/// RGBA color in 32-bit format (8 bits per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to RGBA byte array
    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Compares color channels only. Colorkeys and font colors are defined
    /// without alpha, so decoded pixels are matched on RGB.
    pub fn same_rgb(&self, other: &Rgba) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// Alpha-blends `self` over `base`.
    pub fn over(&self, base: Rgba) -> Rgba {
        let a = self.a as u32;
        let inv = 255 - a;
        let mix = |top: u8, bottom: u8| ((top as u32 * a + bottom as u32 * inv) / 255) as u8;
        Rgba::new(
            mix(self.r, base.r),
            mix(self.g, base.g),
            mix(self.b, base.b),
            base.a.max(self.a),
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Rgba {
    type Err = FontError;

    /// Parses `#RRGGBB` or `#RRGGBBAA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| FontError::Format(format!("color '{}' must start with '#'", s)))?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(FontError::Format(format!(
                "color '{}' must be #RRGGBB or #RRGGBBAA",
                s
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| FontError::Format(format!("color '{}' has invalid hex digits", s)))
        };
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Returns the background color of a font image if all four corners agree.
pub fn detect_colorkey(image: &PixelBuffer) -> Option<Rgba> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    let (w, h) = (image.width() - 1, image.height() - 1);
    let corners = [
        image.pixel(0, 0)?,
        image.pixel(w, 0)?,
        image.pixel(0, h)?,
        image.pixel(w, h)?,
    ];
    if corners.iter().all(|c| c.same_rgb(&corners[0])) {
        Some(Rgba { a: 255, ..corners[0] })
    } else {
        debug!("Corners disagree, no colorkey detected: {:?}", corners);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_print_hex() {
        let c: Rgba = "#7F7F7F".parse().unwrap();
        assert_eq!(c, Rgba::opaque(127, 127, 127));
        assert_eq!(c.to_string(), "#7F7F7F");

        let with_alpha: Rgba = "#FF000080".parse().unwrap();
        assert_eq!(with_alpha, Rgba::new(255, 0, 0, 128));
        assert_eq!(with_alpha.to_string(), "#FF000080");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("7F7F7F".parse::<Rgba>().is_err());
        assert!("#7F7F".parse::<Rgba>().is_err());
        assert!("#GG0000".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let json = serde_json::to_string(&Rgba::opaque(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgba::opaque(1, 2, 3));
    }

    #[test]
    fn test_detect_colorkey_from_corners() {
        let mut img = PixelBuffer::filled(4, 4, Rgba::opaque(9, 9, 9));
        img.set_pixel(1, 1, Rgba::opaque(255, 255, 255));
        assert_eq!(detect_colorkey(&img), Some(Rgba::opaque(9, 9, 9)));

        img.set_pixel(3, 3, Rgba::opaque(255, 0, 0));
        assert_eq!(detect_colorkey(&img), None);
    }

    #[test]
    fn test_over_blends_half_alpha() {
        let top = Rgba::new(255, 0, 0, 128);
        let out = top.over(Rgba::opaque(0, 0, 0));
        assert_eq!(out.r, 128);
        assert_eq!(out.a, 255);
    }
}
