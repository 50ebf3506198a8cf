use serde::{Deserialize, Serialize};

use crate::color::{Color, Hsb};
use crate::pipeline::target::{TargetKind, TargetSelection};
use crate::swatch::Swatch;

/// Role colors derived from one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTheme {
    pub average_color: Color,
    /// Readable tone over `average_color`.
    pub contrasting_tone: Color,
    pub body_dark: Color,
    pub body_light: Color,
    pub cta_color: Color,
    /// Readable tone over `cta_color`.
    pub cta_contrast: Color,
    /// The average color followed by every matched swatch in target priority
    /// order.
    pub all_colors: Vec<Color>,
    pub selection: TargetSelection,
}

/// A color written out for fixtures and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRecord {
    pub hex: String,
    pub hsb: Hsb,
}

/// Serializable snapshot of a [`ColorTheme`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRecord {
    pub average_color: ColorRecord,
    pub contrasting_tone: ColorRecord,
    pub body_dark: ColorRecord,
    pub body_light: ColorRecord,
    pub cta_color: ColorRecord,
    pub cta_contrast: ColorRecord,
    pub all_colors: Vec<ColorRecord>,
    pub swatches: Vec<(TargetKind, Swatch)>,
}

impl From<Color> for ColorRecord {
    fn from(color: Color) -> Self {
        Self {
            hex: color.to_hex(),
            hsb: color.to_hsb(),
        }
    }
}

impl ColorTheme {
    /// The swatch matched to `kind`, if any.
    pub fn swatch(&self, kind: TargetKind) -> Option<Swatch> {
        self.selection.get(kind)
    }

    pub fn to_record(&self) -> ThemeRecord {
        ThemeRecord {
            average_color: self.average_color.into(),
            contrasting_tone: self.contrasting_tone.into(),
            body_dark: self.body_dark.into(),
            body_light: self.body_light.into(),
            cta_color: self.cta_color.into(),
            cta_contrast: self.cta_contrast.into(),
            all_colors: self.all_colors.iter().map(|&c| c.into()).collect(),
            swatches: self.selection.iter().collect(),
        }
    }

    /// Serialize to a line-oriented `key = #rrggbb` form. Role colors come
    /// first, then one `palette = N=#rrggbb` line per entry of `all_colors`.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (key, color) in [
            ("average-color", self.average_color),
            ("contrasting-tone", self.contrasting_tone),
            ("body-dark", self.body_dark),
            ("body-light", self.body_light),
            ("cta-color", self.cta_color),
            ("cta-contrast", self.cta_contrast),
        ] {
            out.push_str(&format!("{key} = {}\n", color.to_hex()));
        }
        for (i, color) in self.all_colors.iter().enumerate() {
            out.push_str(&format!("palette = {i}={}\n", color.to_hex()));
        }
        out
    }
}
