pub mod config;
pub mod info;
pub mod render;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tallview_core::config::ViewerConfig;
use tallview_core::decode::PixelFormat;

#[derive(Clone, Copy, ValueEnum)]
pub enum PixelFormatArg {
    Rgba8888,
    Rgb565,
}

impl From<PixelFormatArg> for PixelFormat {
    fn from(arg: PixelFormatArg) -> Self {
        match arg {
            PixelFormatArg::Rgba8888 => PixelFormat::Rgba8888,
            PixelFormatArg::Rgb565 => PixelFormat::Rgb565,
        }
    }
}

/// Parse `WIDTHxHEIGHT`, e.g. `1080x1920`.
pub fn parse_viewport(s: &str) -> std::result::Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: u32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let height: u32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if width == 0 || height == 0 {
        return Err(format!("viewport must be non-empty, got {width}x{height}"));
    }
    Ok((width, height))
}

/// Read a TOML config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).context("Invalid viewer config")
}
