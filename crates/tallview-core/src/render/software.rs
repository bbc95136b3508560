use image::{Rgba, RgbaImage};
use kurbo::{Affine, Point};

use crate::decode::PixelBuffer;
use crate::render::Canvas;

/// Software canvas compositing into an RGBA frame of viewport size.
///
/// Sampling is nearest-neighbour through the inverse transform. Device pixels
/// whose centre falls within half a source pixel of the buffer edge sample the
/// edge, so a window of `round(viewport_height / scale)` rows fills the whole
/// viewport.
pub struct ImageCanvas {
    frame: RgbaImage,
    background: Rgba<u8>,
    covered: u64,
}

impl ImageCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        let background = Rgba([0, 0, 0, 255]);
        Self {
            frame: RgbaImage::from_pixel(width, height, background),
            background,
            covered: 0,
        }
    }

    pub fn with_background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.frame = RgbaImage::from_pixel(width, height, self.background);
    }

    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// Device pixels written by the last draw.
    pub fn covered_pixels(&self) -> u64 {
        self.covered
    }
}

impl Canvas for ImageCanvas {
    fn draw_bitmap(&mut self, buffer: &PixelBuffer, transform: Affine) {
        for px in self.frame.pixels_mut() {
            *px = self.background;
        }
        self.covered = 0;
        if buffer.is_empty() || transform.determinant().abs() < f64::EPSILON {
            return;
        }

        let inverse = transform.inverse();
        let bw = f64::from(buffer.width());
        let bh = f64::from(buffer.height());

        for (x, y, px) in self.frame.enumerate_pixels_mut() {
            let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if p.x < -0.5 || p.y < -0.5 || p.x >= bw + 0.5 || p.y >= bh + 0.5 {
                continue;
            }
            let sx = p.x.floor().clamp(0.0, bw - 1.0) as u32;
            let sy = p.y.floor().clamp(0.0, bh - 1.0) as u32;
            *px = Rgba(buffer.rgba_at(sx, sy));
            self.covered += 1;
        }
    }
}
