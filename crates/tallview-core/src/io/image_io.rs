use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::decode::PixelBuffer;
use crate::error::{Result, ViewerError};

/// Expand a decoded region into an RGBA image.
pub fn buffer_to_rgba_image(buffer: &PixelBuffer) -> Result<RgbaImage> {
    RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.to_rgba()).ok_or_else(|| {
        ViewerError::Decode(format!(
            "Buffer does not hold {}x{} pixels",
            buffer.width(),
            buffer.height()
        ))
    })
}

/// Save a composited frame as 8-bit RGBA PNG.
pub fn save_png(frame: &RgbaImage, path: &Path) -> Result<()> {
    frame.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a composited frame as 8-bit RGBA TIFF.
pub fn save_tiff(frame: &RgbaImage, path: &Path) -> Result<()> {
    frame.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save a frame, choosing format from file extension.
pub fn save_frame(frame: &RgbaImage, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tiff" | "tif") => save_tiff(frame, path),
        _ => save_png(frame, path),
    }
}
