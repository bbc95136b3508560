use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tallview_core::decode::PixelFormat;
use tallview_core::io::{probe, ImageBytes};
use tallview_core::viewport::window_height_for;

use super::{parse_viewport, PixelFormatArg};

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,

    /// Viewport used for the per-frame buffer estimate
    #[arg(long, value_parser = parse_viewport, default_value = "1080x1920")]
    pub viewport: (u32, u32),

    /// Pixel format of decoded regions
    #[arg(long, value_enum, default_value = "rgb565")]
    pub format: PixelFormatArg,
}

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let bytes = ImageBytes::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let meta = probe(&bytes).with_context(|| format!("Failed to probe {}", args.file.display()))?;
    let format = PixelFormat::from(args.format);

    let (vw, vh) = args.viewport;
    let scale = vw as f32 / meta.width as f32;
    let rows = (window_height_for(vh, scale).max(0) as u32).min(meta.height);
    let window_bytes =
        u64::from(meta.width) * u64::from(rows) * format.bytes_per_pixel() as u64;

    println!("File:        {}", args.file.display());
    println!("Format:      {}", meta.format);
    println!("Dimensions:  {}x{}", meta.width, meta.height);
    println!("File size:   {:.1} MB", megabytes(bytes.len() as u64));
    println!(
        "Full decode: {:.1} MB ({})",
        megabytes(meta.decoded_size(format)),
        format
    );
    println!("Viewport:    {}x{} (scale {:.3})", vw, vh, scale);
    println!(
        "Window:      {} rows, {:.1} MB per frame",
        rows,
        megabytes(window_bytes)
    );

    Ok(())
}
