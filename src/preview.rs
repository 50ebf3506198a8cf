use std::io::Write;

use anyhow::Result;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::QueueableCommand;

use photo_theme::{Color, ColorTheme};

const SWATCH_WIDTH: usize = 18;

fn term(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Black or white, whichever reads on the given background.
fn label_color(background: Color) -> Color {
    if background.is_light() {
        Color::new(0, 0, 0)
    } else {
        Color::new(255, 255, 255)
    }
}

fn swatch_line(out: &mut impl Write, label: &str, background: Color, foreground: Color) -> Result<()> {
    let text = format!(" {label:<w$}", w = SWATCH_WIDTH - 1);
    out.queue(SetBackgroundColor(term(background)))?
        .queue(SetForegroundColor(term(foreground)))?
        .queue(Print(text))?
        .queue(ResetColor)?
        .queue(Print(format!(" {background}\n")))?;
    Ok(())
}

/// Print each role color as a labelled block, rendered with its paired text
/// color where the theme defines one.
pub fn print_preview(out: &mut impl Write, theme: &ColorTheme) -> Result<()> {
    swatch_line(out, "average", theme.average_color, theme.contrasting_tone)?;
    swatch_line(out, "body dark", theme.body_dark, theme.body_light)?;
    swatch_line(out, "body light", theme.body_light, theme.body_dark)?;
    swatch_line(out, "cta", theme.cta_color, theme.cta_contrast)?;
    for (kind, swatch) in theme.selection.iter() {
        let color = swatch.color();
        let label = format!("{kind:?} ({})", swatch.population());
        swatch_line(out, &label, color, label_color(color))?;
    }
    out.flush()?;
    Ok(())
}
