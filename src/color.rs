use palette::{FromColor, Hsl as PaletteHsl, Hsv, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};

/// Threshold on the grayscale value above which a color reads as light.
const LIGHT_THRESHOLD: f32 = 0.5;

/// Core color type used throughout the pipeline.
/// Wraps sRGB u8 components plus alpha. All hue/saturation conversions in the
/// crate go through the methods on this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Hue, saturation and brightness, each in `[0, 1]`. Hue is a fraction of the
/// full circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsb {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

/// Hue, saturation and lightness, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsb {
    pub fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue: wrap_hue(hue),
            saturation: saturation.clamp(0.0, 1.0),
            brightness: brightness.clamp(0.0, 1.0),
        }
    }
}

impl Color {
    /// Opaque color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse a hex color string like `#ff8800` or `#FF8800`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ThemeError::invalid_config("hex color", hex));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ThemeError::invalid_config("hex color", hex))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Serialize to lowercase hex `#rrggbb`. Alpha is not included.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn to_srgb_f32(self) -> Srgb<f32> {
        Srgb::new(self.r, self.g, self.b).into_format()
    }

    /// Clamp an Srgb<f32> to [0, 1] and convert to an opaque Color.
    fn from_srgb_f32_clamped(srgb: Srgb<f32>) -> Self {
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(r, g, b)
    }

    /// Convert to HSL (used for target scoring).
    pub fn to_hsl(self) -> Hsl {
        let hsl: PaletteHsl = self.to_srgb_f32().into_color();
        Hsl {
            hue: hsl.hue.into_positive_degrees() / 360.0,
            saturation: hsl.saturation,
            lightness: hsl.lightness,
        }
    }

    /// Convert to HSB (used for theme derivation).
    pub fn to_hsb(self) -> Hsb {
        let hsv: Hsv = self.to_srgb_f32().into_color();
        Hsb::new(hsv.hue.into_positive_degrees() / 360.0, hsv.saturation, hsv.value)
    }

    /// Create an opaque color from HSB.
    pub fn from_hsb(hsb: Hsb) -> Self {
        let hsv = Hsv::new(hsb.hue * 360.0, hsb.saturation, hsb.brightness);
        Self::from_srgb_f32_clamped(Srgb::from_color(hsv))
    }

    /// Grayscale "white" value of the color, Rec. 601 luma over the encoded
    /// channels.
    pub fn white_level(self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    /// Whether the color reads as light. Every light/dark decision in the
    /// crate goes through here.
    pub fn is_light(self) -> bool {
        self.white_level() >= LIGHT_THRESHOLD
    }
}

/// Wrap a hue onto `[0, 1)`.
pub fn wrap_hue(hue: f32) -> f32 {
    let wrapped = hue.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Shortest distance between two hues on the unit circle, in `[0, 0.5]`.
pub fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs().rem_euclid(1.0);
    d.min(1.0 - d)
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Color::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}
