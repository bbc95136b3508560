use tracing::debug;

use crate::error::{Result, ViewerError};

/// Viewport size in device pixels and the fit-to-width scale derived from it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewportState {
    width: u32,
    height: u32,
    image_width: u32,
    scale: Option<f32>,
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `viewport_width / image_width`; `None` until both are non-zero.
    pub fn scale(&self) -> Option<f32> {
        self.scale
    }

    /// Record a layout pass.
    pub fn on_layout(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.recompute();
    }

    /// Record the width of a newly loaded image (0 clears the scale).
    pub fn set_image_width(&mut self, image_width: u32) {
        self.image_width = image_width;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.scale = if self.image_width > 0 && self.width > 0 {
            Some(self.width as f32 / self.image_width as f32)
        } else {
            None
        };
        debug!(
            viewport_width = self.width,
            viewport_height = self.height,
            scale = ?self.scale,
            "viewport scale updated"
        );
    }

    /// Height of the viewport mapped into image space, `round(height / scale)`.
    pub fn window_height(&self) -> Option<i32> {
        self.scale
            .map(|scale| window_height_for(self.height, scale))
    }

    /// Fails with `InvalidGeometry` while either viewport dimension is zero.
    pub fn check_geometry(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ViewerError::InvalidGeometry {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// `round(viewport_height / scale)` as an image-space row count.
pub fn window_height_for(viewport_height: u32, scale: f32) -> i32 {
    (viewport_height as f32 / scale).round() as i32
}
