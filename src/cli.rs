use std::path::PathBuf;

use clap::Parser;

/// Extract a color theme from an image.
#[derive(Parser, Debug)]
#[command(name = "photo-theme", version, about)]
pub struct Args {
    /// Path to the input image
    pub image: PathBuf,

    /// JSON configuration file (defaults apply to missing fields)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of quantized swatches
    #[arg(short = 'k', long = "colors")]
    pub colors: Option<usize>,

    /// Histogram precision per channel (1-8 bits)
    #[arg(long)]
    pub bits: Option<u8>,

    /// Downsample to this size before averaging
    #[arg(long)]
    pub sample_size: Option<u32>,

    /// Run the sampler and quantizer on one thread
    #[arg(long)]
    pub sequential: bool,

    /// Print the theme as JSON instead of key = value lines
    #[arg(long)]
    pub json: bool,

    /// Print a colored terminal preview of the theme
    #[arg(long)]
    pub preview: bool,
}
