use crate::color::{Color, Hsb};
use crate::pipeline::target::TargetSelection;
use crate::theme::ColorTheme;

const HUE_SHIFT: f32 = 0.05;

/// Build the full theme from the average color and the matched swatches.
/// Pure: the same inputs always give the same theme.
pub fn derive_theme(average: Color, selection: TargetSelection) -> ColorTheme {
    let base = average.to_hsb();

    let cta_color = cta_color(base);
    let mut all_colors = Vec::with_capacity(selection.len() + 1);
    all_colors.push(average);
    all_colors.extend(selection.iter().map(|(_, swatch)| swatch.color()));

    ColorTheme {
        average_color: average,
        contrasting_tone: contrasting_tone(average).with_alpha(average.a),
        body_dark: Color::from_hsb(Hsb::new(
            base.hue,
            base.saturation.min(0.8),
            base.brightness.min(0.2),
        )),
        body_light: Color::from_hsb(Hsb::new(
            base.hue,
            base.saturation.min(0.2),
            base.brightness.max(0.9),
        )),
        cta_color,
        cta_contrast: cta_contrast(cta_color),
        all_colors,
        selection,
    }
}

/// Near-black on light colors, near-white on dark ones, keeping the hue.
pub fn contrasting_tone(color: Color) -> Color {
    let hsb = color.to_hsb();
    if color.is_light() {
        Color::from_hsb(Hsb::new(hsb.hue, 0.9, 0.1))
    } else {
        Color::from_hsb(Hsb::new(hsb.hue, hsb.saturation.min(0.15), 0.95))
    }
}

fn cta_color(base: Hsb) -> Color {
    Color::from_hsb(Hsb::new(
        base.hue + HUE_SHIFT,
        (base.saturation * 2.0).min(0.8),
        (base.brightness * 3.0).min(0.9),
    ))
}

/// Text color for a call-to-action surface.
pub fn cta_contrast(cta: Color) -> Color {
    let hsb = cta.to_hsb();
    let brightness = if cta.is_light() { 0.05 } else { 0.95 };
    Color::from_hsb(Hsb::new(hsb.hue, hsb.saturation.min(0.1), brightness))
}
