//! # photo-theme
//!
//! Extracts a color theme from a decoded image: the average color, a set of
//! swatches matched to vibrant/muted targets, and role colors for text,
//! backgrounds and calls to action.
//!
//! ```rust
//! use photo_theme::{extract_theme, Color, PixelBuffer};
//!
//! let pixels = photo_theme::buffer::to_rgba_bytes(&[
//!     Color::new(255, 0, 0),
//!     Color::new(255, 0, 0),
//!     Color::new(255, 255, 255),
//!     Color::new(255, 255, 255),
//! ]);
//! let buffer = PixelBuffer::new(2, 2, &pixels)?;
//! let theme = extract_theme(&buffer)?;
//! println!("{}", theme.serialize());
//! # Ok::<(), photo_theme::ThemeError>(())
//! ```

pub mod buffer;
pub mod color;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod swatch;
pub mod theme;

use log::debug;

pub use buffer::PixelBuffer;
pub use color::{Color, Hsb, Hsl};
pub use config::{ExtractionConfig, MatcherConfig, QuantizerConfig, SamplerConfig};
pub use error::{Result, ThemeError};
pub use pipeline::target::{Target, TargetKind, TargetSelection};
pub use swatch::Swatch;
pub use theme::{ColorTheme, ThemeRecord};

use pipeline::average::average_color;
use pipeline::derive::derive_theme;
use pipeline::quantize::quantize;
use pipeline::target::match_targets;

/// Extract a theme with the default configuration.
pub fn extract_theme(buffer: &PixelBuffer<'_>) -> Result<ColorTheme> {
    extract_theme_with(buffer, &ExtractionConfig::default())
}

/// Extract a theme. Fails on an empty buffer or an invalid configuration;
/// any non-empty buffer yields a theme, possibly with few swatches.
pub fn extract_theme_with(buffer: &PixelBuffer<'_>, config: &ExtractionConfig) -> Result<ColorTheme> {
    config.validate()?;
    if buffer.is_empty() {
        return Err(ThemeError::EmptyInput);
    }

    let (average, swatches) = if config.parallel {
        std::thread::scope(|scope| {
            let sampler = scope.spawn(|| average_color(buffer, &config.sampler));
            let swatches = quantize(buffer, &config.quantizer);
            let average = match sampler.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            };
            (average, swatches)
        })
    } else {
        (
            average_color(buffer, &config.sampler),
            quantize(buffer, &config.quantizer),
        )
    };
    let (average, swatches) = (average?, swatches?);

    let selection = match_targets(&swatches, &config.matcher);
    debug!(
        "average {average}, {} swatches, {} targets matched",
        swatches.len(),
        selection.len()
    );
    Ok(derive_theme(average, selection))
}
