//! Tunable parameters for theme extraction.
//!
//! Every field has a default, so a JSON file only needs to name the values it
//! changes:
//!
//! ```no_run
//! use photo_theme::ExtractionConfig;
//! use std::path::Path;
//!
//! let config = ExtractionConfig::from_json_file(Path::new("theme.json"))?;
//! # Ok::<(), photo_theme::ThemeError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};
use crate::pipeline::target::{Target, DEFAULT_TARGETS};

pub const DEFAULT_MAX_COLORS: usize = 16;
pub const DEFAULT_BITS_PER_CHANNEL: u8 = 5;
pub const DEFAULT_HUE_THRESHOLD: f32 = 1.0 / 12.0;
pub const DEFAULT_ACCEPTABLE_SCORE: f32 = 0.5;

/// Complete configuration for one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub sampler: SamplerConfig,
    pub quantizer: QuantizerConfig,
    pub matcher: MatcherConfig,

    /// Run the average sampler and the quantizer on separate threads.
    pub parallel: bool,
}

/// Average color sampling.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Downsample to fit within this many pixels per side before averaging.
    /// `None` averages the full-resolution buffer.
    pub sample_size: Option<u32>,
}

/// Median-cut quantization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizerConfig {
    /// Maximum number of swatches (K).
    pub max_colors: usize,

    /// Histogram precision per channel, 1..=8 bits.
    pub bits_per_channel: u8,
}

/// Swatch-to-target matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Two selected hues closer than this fraction of the circle clash.
    pub hue_threshold: f32,

    /// Minimum score an alternative swatch needs to replace a clashing one.
    pub acceptable_score: f32,

    /// Targets in priority order.
    pub targets: Vec<Target>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            quantizer: QuantizerConfig::default(),
            matcher: MatcherConfig::default(),
            parallel: true,
        }
    }
}

impl Default for QuantizerConfig {
    fn default() -> Self {
        Self {
            max_colors: DEFAULT_MAX_COLORS,
            bits_per_channel: DEFAULT_BITS_PER_CHANNEL,
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            hue_threshold: DEFAULT_HUE_THRESHOLD,
            acceptable_score: DEFAULT_ACCEPTABLE_SCORE,
            targets: DEFAULT_TARGETS.to_vec(),
        }
    }
}

impl QuantizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_colors == 0 {
            return Err(ThemeError::invalid_config("max_colors", self.max_colors));
        }
        if !(1..=8).contains(&self.bits_per_channel) {
            return Err(ThemeError::invalid_config(
                "bits_per_channel",
                self.bits_per_channel,
            ));
        }
        Ok(())
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == Some(0) {
            return Err(ThemeError::invalid_config("sample_size", 0));
        }
        Ok(())
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=0.5).contains(&self.hue_threshold) {
            return Err(ThemeError::invalid_config(
                "hue_threshold",
                self.hue_threshold,
            ));
        }
        if !(0.0..=1.0).contains(&self.acceptable_score) {
            return Err(ThemeError::invalid_config(
                "acceptable_score",
                self.acceptable_score,
            ));
        }
        for (i, target) in self.targets.iter().enumerate() {
            target.validate()?;
            if self.targets[..i].iter().any(|earlier| earlier.kind == target.kind) {
                return Err(ThemeError::invalid_config(
                    "targets",
                    format!("duplicate {:?}", target.kind),
                ));
            }
        }
        Ok(())
    }
}

impl ExtractionConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ThemeError::config(format!("cannot read {}", path.display()), e))?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ThemeError::config("invalid JSON", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.sampler.validate()?;
        self.quantizer.validate()?;
        self.matcher.validate()
    }
}
