use std::sync::Arc;

use image::RgbImage;
use tracing::debug;

use crate::decode::{checked_region, PixelBuffer, PixelFormat, RegionDecoder};
use crate::error::{Result, ViewerError};
use crate::geometry::PixelRect;
use crate::io::probe::{ImageMeta, SourceFormat};
use crate::io::source::ImageBytes;

/// Region decoder for compressed formats handled by the `image` crate.
///
/// Compressed streams cannot be entered at an arbitrary row, so the image is
/// decoded once, on the first request, and regions are cropped from that.
pub struct BufferedRegionDecoder {
    bytes: Arc<ImageBytes>,
    meta: ImageMeta,
    decoded: Option<RgbImage>,
}

impl BufferedRegionDecoder {
    pub fn new(bytes: Arc<ImageBytes>, meta: ImageMeta) -> Self {
        Self {
            bytes,
            meta,
            decoded: None,
        }
    }

    /// Whether the full image has been decoded yet.
    pub fn is_decoded(&self) -> bool {
        self.decoded.is_some()
    }

    fn ensure_decoded(&mut self) -> Result<&RgbImage> {
        if self.decoded.is_none() {
            let image = match self.meta.format {
                SourceFormat::Encoded(format) => {
                    image::load_from_memory_with_format(&self.bytes, format)?
                }
                SourceFormat::Pnm(_) => image::load_from_memory(&self.bytes)?,
            };
            let rgb = image.to_rgb8();
            if rgb.dimensions() != (self.meta.width, self.meta.height) {
                return Err(ViewerError::Decode(format!(
                    "Decoded size {}x{} differs from header {}x{}",
                    rgb.width(),
                    rgb.height(),
                    self.meta.width,
                    self.meta.height
                )));
            }
            debug!(
                width = rgb.width(),
                height = rgb.height(),
                "decoded full image for region cropping"
            );
            self.decoded = Some(rgb);
        }
        self.decoded
            .as_ref()
            .ok_or_else(|| ViewerError::Decode("Image not decoded".into()))
    }
}

impl RegionDecoder for BufferedRegionDecoder {
    fn meta(&self) -> &ImageMeta {
        &self.meta
    }

    fn decode_region(
        &mut self,
        rect: PixelRect,
        format: PixelFormat,
        target: &mut PixelBuffer,
    ) -> Result<()> {
        checked_region(&rect, &self.meta)?;
        let source = self.ensure_decoded()?;

        target.reshape(rect.width() as u32, rect.height() as u32, format);
        let stride = target.stride();
        let bpp = format.bytes_per_pixel();
        let x0 = rect.left as u32;
        let y0 = rect.top as u32;

        for (row, dst) in target.data_mut().chunks_mut(stride).enumerate() {
            let y = y0 + row as u32;
            for (col, px) in dst.chunks_exact_mut(bpp).enumerate() {
                let [r, g, b] = source.get_pixel(x0 + col as u32, y).0;
                format.write_rgb(px, r, g, b);
            }
        }
        Ok(())
    }
}
