use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::geometry::PixelRect;
use crate::io::ImageMeta;

/// Pixel layout of decoded region buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8 bits per channel, R G B A byte order.
    Rgba8888,
    /// 5-6-5 packed RGB, one little-endian `u16` per pixel.
    #[default]
    Rgb565,
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelFormat::Rgba8888 => write!(f, "RGBA 8888"),
            PixelFormat::Rgb565 => write!(f, "RGB 565"),
        }
    }
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8888 => 4,
            PixelFormat::Rgb565 => 2,
        }
    }

    /// Encode one opaque RGB pixel into `dst` (exactly `bytes_per_pixel` long).
    #[inline]
    pub fn write_rgb(self, dst: &mut [u8], r: u8, g: u8, b: u8) {
        match self {
            PixelFormat::Rgba8888 => {
                dst[0] = r;
                dst[1] = g;
                dst[2] = b;
                dst[3] = 255;
            }
            PixelFormat::Rgb565 => {
                let packed = (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3);
                dst[..2].copy_from_slice(&packed.to_le_bytes());
            }
        }
    }

    /// Expand one encoded pixel back to RGBA.
    #[inline]
    pub fn read_rgba(self, src: &[u8]) -> [u8; 4] {
        match self {
            PixelFormat::Rgba8888 => [src[0], src[1], src[2], src[3]],
            PixelFormat::Rgb565 => {
                let packed = u16::from_le_bytes([src[0], src[1]]);
                let r = ((packed >> 11) & 0x1f) as u8;
                let g = ((packed >> 5) & 0x3f) as u8;
                let b = (packed & 0x1f) as u8;
                [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2), 255]
            }
        }
    }
}

/// Reusable decode target.
///
/// The backing `Vec` keeps its allocation across [`PixelBuffer::reshape`]
/// calls, so a buffer that is decoded into every frame at the same size is
/// allocated exactly once.
#[derive(Clone, Debug, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let mut buffer = Self::default();
        buffer.reshape(width, height, format);
        buffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Size of the current allocation in bytes.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Resize to `width`x`height` in `format`, reusing the allocation when it
    /// is large enough. Returns `true` if the buffer had to grow.
    pub fn reshape(&mut self, width: u32, height: u32, format: PixelFormat) -> bool {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        let grew = len > self.data.capacity();
        self.data.clear();
        self.data.resize(len, 0);
        self.width = width;
        self.height = height;
        self.format = format;
        grew
    }

    /// RGBA value at `(x, y)`.
    pub fn rgba_at(&self, x: u32, y: u32) -> [u8; 4] {
        let bpp = self.format.bytes_per_pixel();
        let offset = y as usize * self.stride() + x as usize * bpp;
        self.format.read_rgba(&self.data[offset..offset + bpp])
    }

    /// Copy the whole buffer out as tightly packed RGBA.
    pub fn to_rgba(&self) -> Vec<u8> {
        let bpp = self.format.bytes_per_pixel();
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for px in self.data.chunks_exact(bpp) {
            out.extend_from_slice(&self.format.read_rgba(px));
        }
        out
    }
}

/// Decodes rectangular regions of one encoded image.
pub trait RegionDecoder {
    /// Dimensions of the image this decoder reads.
    fn meta(&self) -> &ImageMeta;

    /// Decode `rect` at native resolution into `target`, reshaping it to
    /// `rect.width()`x`rect.height()` in `format`.
    ///
    /// Implementations must validate the request before touching `target`:
    /// on error the buffer keeps its previous contents.
    fn decode_region(
        &mut self,
        rect: PixelRect,
        format: PixelFormat,
        target: &mut PixelBuffer,
    ) -> Result<()>;
}

/// Check that `rect` is a non-empty region fully inside the image.
pub(crate) fn checked_region(rect: &PixelRect, meta: &ImageMeta) -> Result<()> {
    if rect.is_empty() || rect.intersect(&meta.bounds()) != Some(*rect) {
        return Err(ViewerError::OutOfBoundsRequest {
            top: rect.top,
            bottom: rect.bottom,
            image_height: meta.height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb565_keeps_extremes() {
        let mut px = [0u8; 2];
        PixelFormat::Rgb565.write_rgb(&mut px, 255, 255, 255);
        assert_eq!(PixelFormat::Rgb565.read_rgba(&px), [255, 255, 255, 255]);
        PixelFormat::Rgb565.write_rgb(&mut px, 0, 0, 0);
        assert_eq!(PixelFormat::Rgb565.read_rgba(&px), [0, 0, 0, 255]);
    }

    #[test]
    fn test_reshape_reuses_allocation() {
        let mut buf = PixelBuffer::new(100, 50, PixelFormat::Rgba8888);
        let cap = buf.capacity();
        assert!(!buf.reshape(100, 50, PixelFormat::Rgba8888));
        assert!(!buf.reshape(50, 50, PixelFormat::Rgb565));
        assert_eq!(buf.capacity(), cap);
        assert_eq!(buf.data().len(), 50 * 50 * 2);
        assert!(buf.reshape(200, 200, PixelFormat::Rgba8888));
    }
}
