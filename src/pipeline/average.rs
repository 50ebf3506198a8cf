use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba};
use log::debug;

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::config::SamplerConfig;
use crate::error::{Result, ThemeError};

/// Reduce a buffer to the mean of each RGB channel, rounded to the nearest
/// value. Alpha is ignored on input and opaque on output.
///
/// With `sample_size` set, larger buffers are first resized to fit within a
/// `sample_size × sample_size` box. The triangle filter keeps the result
/// within a few channel units of the full-resolution mean on photographic
/// input.
pub fn average_color(buffer: &PixelBuffer<'_>, config: &SamplerConfig) -> Result<Color> {
    if buffer.is_empty() {
        return Err(ThemeError::EmptyInput);
    }

    match config.sample_size {
        Some(size) if buffer.width() > size || buffer.height() > size => {
            let (width, height) = fit_within(buffer.width(), buffer.height(), size);
            let view: ImageBuffer<Rgba<u8>, &[u8]> =
                ImageBuffer::from_raw(buffer.width(), buffer.height(), buffer.as_bytes()).ok_or(
                    ThemeError::BufferSize {
                        expected: buffer.len() * 4,
                        actual: buffer.as_bytes().len(),
                    },
                )?;
            let small = imageops::resize(&view, width, height, FilterType::Triangle);
            debug!(
                "downsampled {}x{} to {}x{} before averaging",
                buffer.width(),
                buffer.height(),
                width,
                height
            );
            let small_buffer = PixelBuffer::from(&small);
            Ok(mean(&small_buffer))
        }
        _ => Ok(mean(buffer)),
    }
}

fn mean(buffer: &PixelBuffer<'_>) -> Color {
    let mut sums = [0u64; 3];
    for pixel in buffer.pixels() {
        sums[0] += pixel.r as u64;
        sums[1] += pixel.g as u64;
        sums[2] += pixel.b as u64;
    }
    let count = buffer.len() as f64;
    let channel = |sum: u64| (sum as f64 / count).round() as u8;
    Color::new(channel(sums[0]), channel(sums[1]), channel(sums[2]))
}

/// Scale dimensions to fit within `size` on the longer side, keeping aspect.
fn fit_within(width: u32, height: u32, size: u32) -> (u32, u32) {
    let longest = width.max(height) as f64;
    let scale = size as f64 / longest;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}
