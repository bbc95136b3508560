use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use kurbo::Affine;

use tallview_core::config::ViewerConfig;
use tallview_core::decode::{PixelBuffer, PixelFormat, RegionDecoder};
use tallview_core::error::{Result, ViewerError};
use tallview_core::geometry::PixelRect;
use tallview_core::inertia::SteppedClock;
use tallview_core::io::{ImageMeta, SourceFormat};
use tallview_core::io::pnm::PnmKind;
use tallview_core::render::Canvas;
use tallview_core::view::LongImageView;

/// Gray value stored at `row` by [`build_row_pgm`].
pub fn row_value(row: u32) -> u8 {
    (row % 251) as u8
}

/// Build a binary PGM (P5, maxval 255) from a per-pixel function.
pub fn build_pgm(width: u32, height: u32, pixel: impl Fn(u32, u32) -> u8) -> Vec<u8> {
    let mut buf = format!("P5\n{width} {height}\n255\n").into_bytes();
    for row in 0..height {
        for col in 0..width {
            buf.push(pixel(row, col));
        }
    }
    buf
}

/// PGM whose every row is filled with [`row_value`] of its index.
pub fn build_row_pgm(width: u32, height: u32) -> Vec<u8> {
    build_pgm(width, height, |row, _| row_value(row))
}

/// Build a binary PPM (P6, maxval 255) from a per-pixel function.
pub fn build_ppm(width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 3]) -> Vec<u8> {
    let mut buf = format!("P6\n{width} {height}\n255\n").into_bytes();
    for row in 0..height {
        for col in 0..width {
            buf.extend_from_slice(&pixel(row, col));
        }
    }
    buf
}

/// Build a 16-bit binary PGM (P5, maxval 65535, big-endian samples).
pub fn build_pgm16(width: u32, height: u32, pixel: impl Fn(u32, u32) -> u16) -> Vec<u8> {
    let mut buf = format!("P5\n{width} {height}\n65535\n").into_bytes();
    for row in 0..height {
        for col in 0..width {
            buf.extend_from_slice(&pixel(row, col).to_be_bytes());
        }
    }
    buf
}

/// View driven by a 16 ms stepped clock, so flings are deterministic.
pub fn stepped_view(config: ViewerConfig) -> LongImageView {
    let step = config.frame_interval();
    LongImageView::with_clock(config, Box::new(SteppedClock::new(step)))
}

pub fn default_stepped_view() -> LongImageView {
    stepped_view(ViewerConfig::default())
}

/// One recorded `draw_bitmap` call.
#[derive(Clone, Debug)]
pub struct DrawCall {
    pub width: u32,
    pub height: u32,
    pub transform: Affine,
    pub first_pixel: [u8; 4],
}

/// Canvas that records what it was asked to draw.
#[derive(Default)]
pub struct RecordingCanvas {
    pub draws: Vec<DrawCall>,
}

impl Canvas for RecordingCanvas {
    fn draw_bitmap(&mut self, buffer: &PixelBuffer, transform: Affine) {
        let first_pixel = if buffer.is_empty() {
            [0; 4]
        } else {
            buffer.rgba_at(0, 0)
        };
        self.draws.push(DrawCall {
            width: buffer.width(),
            height: buffer.height(),
            transform,
            first_pixel,
        });
    }
}

/// Decoder for an image that exists only as dimensions.
///
/// Writes the region's top row index into the first pixel of the buffer,
/// records every request, and panics if a request leaves the image. Clones
/// share the request log and the failure switch.
#[derive(Clone)]
pub struct SyntheticDecoder {
    meta: ImageMeta,
    pub requests: Arc<Mutex<Vec<PixelRect>>>,
    pub fail: Arc<AtomicBool>,
}

impl SyntheticDecoder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            meta: ImageMeta {
                width,
                height,
                format: SourceFormat::Pnm(PnmKind::Graymap),
            },
            requests: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl RegionDecoder for SyntheticDecoder {
    fn meta(&self) -> &ImageMeta {
        &self.meta
    }

    fn decode_region(
        &mut self,
        rect: PixelRect,
        format: PixelFormat,
        target: &mut PixelBuffer,
    ) -> Result<()> {
        assert!(
            !rect.is_empty() && rect.within(self.meta.width, self.meta.height),
            "decoder asked for {rect} outside {}x{}",
            self.meta.width,
            self.meta.height
        );
        self.requests.lock().unwrap().push(rect);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ViewerError::Decode("injected failure".into()));
        }
        target.reshape(rect.width() as u32, rect.height() as u32, format);
        let marker = row_value(rect.top as u32);
        let bpp = format.bytes_per_pixel();
        format.write_rgb(&mut target.data_mut()[..bpp], marker, marker, marker);
        Ok(())
    }
}
