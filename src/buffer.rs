use image::RgbaImage;

use crate::color::Color;
use crate::error::{Result, ThemeError};

const CHANNELS: usize = 4;

/// A borrowed, row-major RGBA8 pixel buffer.
///
/// The core only reads the pixels and never keeps the borrow beyond one
/// extraction call.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Wrap raw RGBA8 bytes, checking that the length matches the dimensions.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or(ThemeError::Dimensions { width, height })?;
        if data.len() != expected {
            return Err(ThemeError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len() / CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + 'a {
        self.data
            .chunks_exact(CHANNELS)
            .map(|p| Color::new(p[0], p[1], p[2]).with_alpha(p[3]))
    }
}

impl<'a> From<&'a RgbaImage> for PixelBuffer<'a> {
    fn from(img: &'a RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.as_raw(),
        }
    }
}

/// Flatten colors into an owned RGBA8 byte vector, handy for building buffers
/// in tests and callers that already hold [`Color`] values.
pub fn to_rgba_bytes(colors: &[Color]) -> Vec<u8> {
    colors.iter().flat_map(|c| [c.r, c.g, c.b, c.a]).collect()
}
