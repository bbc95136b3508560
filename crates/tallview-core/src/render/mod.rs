mod software;

use kurbo::Affine;
use tracing::{debug, warn};

use crate::decode::{PixelBuffer, PixelFormat, RegionDecoder};
use crate::error::Result;
use crate::geometry::PixelRect;

pub use software::ImageCanvas;

/// Surface that composites decoded regions onto the screen.
pub trait Canvas {
    /// Draw `buffer` with its top-left corner at the origin, mapped through
    /// `transform` into device pixels.
    fn draw_bitmap(&mut self, buffer: &PixelBuffer, transform: Affine);
}

/// Counters describing render work so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames decoded and handed to the canvas.
    pub frames: u64,
    /// Decodes that failed; the frame was skipped.
    pub decode_failures: u64,
    /// Times the pixel buffer had to grow.
    pub allocations: u64,
}

/// What a call to [`RenderLoop::render_frame`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing to draw with.
    NoDecoder,
    /// `region` was decoded and composited.
    Composited { region: PixelRect },
}

/// Decodes the visible region into a single reused buffer and composites it.
pub struct RenderLoop {
    decoder: Option<Box<dyn RegionDecoder>>,
    buffer: Option<PixelBuffer>,
    format: PixelFormat,
    stats: RenderStats,
}

impl RenderLoop {
    pub fn new(format: PixelFormat) -> Self {
        Self {
            decoder: None,
            buffer: None,
            format,
            stats: RenderStats::default(),
        }
    }

    /// Replace the decoder and release the buffer sized for the old image.
    pub fn attach(&mut self, decoder: Box<dyn RegionDecoder>) {
        self.decoder = Some(decoder);
        self.buffer = None;
    }

    pub fn detach(&mut self) {
        self.decoder = None;
        self.buffer = None;
    }

    pub fn has_decoder(&self) -> bool {
        self.decoder.is_some()
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// The last successfully decoded buffer, if any.
    pub fn last_buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref().filter(|b| !b.is_empty())
    }

    /// Decode `region` and composite it scaled by `scale`.
    ///
    /// A failed decode leaves the previous buffer in place and skips the
    /// composite; the error is returned so the host can report it.
    pub fn render_frame(
        &mut self,
        region: PixelRect,
        scale: f32,
        canvas: &mut dyn Canvas,
    ) -> Result<FrameOutcome> {
        let Some(decoder) = self.decoder.as_mut() else {
            return Ok(FrameOutcome::NoDecoder);
        };

        let buffer = self.buffer.get_or_insert_with(PixelBuffer::default);
        let capacity = buffer.capacity();

        if let Err(e) = decoder.decode_region(region, self.format, buffer) {
            self.stats.decode_failures += 1;
            warn!(%region, error = %e, "region decode failed, keeping previous frame");
            return Err(e);
        }

        if buffer.capacity() > capacity {
            self.stats.allocations += 1;
            debug!(bytes = buffer.capacity(), "pixel buffer grown");
        }

        canvas.draw_bitmap(buffer, Affine::scale(f64::from(scale)));
        self.stats.frames += 1;
        Ok(FrameOutcome::Composited { region })
    }
}
