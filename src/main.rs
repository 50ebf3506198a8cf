mod cli;
mod loader;
mod preview;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use cli::Args;
use photo_theme::{extract_theme_with, ExtractionConfig, PixelBuffer};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = build_config(&args)?;
    let img = loader::load_rgba(&args.image)?;
    info!(
        "loaded {} ({}x{})",
        args.image.display(),
        img.width(),
        img.height()
    );

    let buffer = PixelBuffer::from(&img);
    let theme = extract_theme_with(&buffer, &config)
        .with_context(|| format!("cannot extract a theme from {}", args.image.display()))?;

    let mut stdout = std::io::stdout().lock();
    if args.preview {
        preview::print_preview(&mut stdout, &theme)?;
    } else if args.json {
        serde_json::to_writer_pretty(&mut stdout, &theme.to_record())?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{}", theme.serialize())?;
    }
    Ok(())
}

/// Start from the config file (or defaults) and apply command-line overrides.
fn build_config(args: &Args) -> Result<ExtractionConfig> {
    let mut config = match &args.config {
        Some(path) => ExtractionConfig::from_json_file(path)?,
        None => ExtractionConfig::default(),
    };
    if let Some(colors) = args.colors {
        config.quantizer.max_colors = colors;
    }
    if let Some(bits) = args.bits {
        config.quantizer.bits_per_channel = bits;
    }
    if args.sample_size.is_some() {
        config.sampler.sample_size = args.sample_size;
    }
    if args.sequential {
        config.parallel = false;
    }
    config.validate()?;
    Ok(config)
}
