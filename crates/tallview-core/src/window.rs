//! The visible window: which rows of the image are currently on screen.
//!
//! The window always spans the full image width (the view is scaled to fit
//! width) and is `round(viewport_height / scale)` rows tall. Panning only
//! translates it vertically; every pan is followed by the bottom-edge clamp
//! and then the top-edge clamp, in that order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ViewerError};
use crate::geometry::PixelRect;
use crate::viewport::window_height_for;

/// Which image dimension the bottom-edge clamp measures from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BottomClampPolicy {
    /// `top = image_height - window_height`: the window stays pinned to the
    /// bottom edge with its height intact.
    #[default]
    ImageHeight,
    /// `top = image_width - window_height`, kept for parity with viewers that
    /// shipped this formula. Only equivalent to `ImageHeight` for square images.
    LegacyImageWidth,
}

impl std::fmt::Display for BottomClampPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BottomClampPolicy::ImageHeight => write!(f, "Image Height"),
            BottomClampPolicy::LegacyImageWidth => write!(f, "Legacy Image Width"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum WindowState {
    Uninitialized,
    Ready {
        rect: PixelRect,
        image_width: i32,
        image_height: i32,
        window_height: i32,
    },
}

/// Clamped image-space rectangle mapped onto the viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleWindow {
    state: WindowState,
    policy: BottomClampPolicy,
}

impl Default for VisibleWindow {
    fn default() -> Self {
        Self::new(BottomClampPolicy::default())
    }
}

impl VisibleWindow {
    pub fn new(policy: BottomClampPolicy) -> Self {
        Self {
            state: WindowState::Uninitialized,
            policy,
        }
    }

    pub fn policy(&self) -> BottomClampPolicy {
        self.policy
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, WindowState::Ready { .. })
    }

    /// Current rectangle, or `None` before initialization.
    pub fn rect(&self) -> Option<PixelRect> {
        match self.state {
            WindowState::Ready { rect, .. } => Some(rect),
            WindowState::Uninitialized => None,
        }
    }

    pub fn top(&self) -> Option<i32> {
        self.rect().map(|r| r.top)
    }

    /// Image-space height of the window, `round(viewport_height / scale)`.
    pub fn window_height(&self) -> Option<i32> {
        match self.state {
            WindowState::Ready { window_height, .. } => Some(window_height),
            WindowState::Uninitialized => None,
        }
    }

    /// Largest `top` that keeps the window inside the image.
    pub fn max_top(&self) -> Option<i32> {
        match self.state {
            WindowState::Ready {
                image_height,
                window_height,
                ..
            } => Some((image_height - window_height).max(0)),
            WindowState::Uninitialized => None,
        }
    }

    /// Enter the ready state at the top of the image.
    pub fn initialize(
        &mut self,
        image_width: u32,
        image_height: u32,
        viewport_height: u32,
        scale: f32,
    ) -> PixelRect {
        let window_height = window_height_for(viewport_height, scale);
        let rect = PixelRect::new(0, 0, image_width as i32, window_height);
        self.state = WindowState::Ready {
            rect,
            image_width: image_width as i32,
            image_height: image_height as i32,
            window_height,
        };
        debug!(%rect, "window initialized");
        rect
    }

    /// Recompute the window height after a relayout, keeping `top` where it was
    /// as far as the new height allows.
    pub fn resize(&mut self, viewport_height: u32, scale: f32) -> Option<PixelRect> {
        let (image_width, image_height, old_top) = match self.state {
            WindowState::Ready {
                rect,
                image_width,
                image_height,
                ..
            } => (image_width, image_height, rect.top),
            WindowState::Uninitialized => return None,
        };
        self.initialize(image_width as u32, image_height as u32, viewport_height, scale);
        let top = old_top.clamp(0, self.max_top().unwrap_or(0));
        self.snap_to_top(top)
    }

    /// Back to the uninitialized state (new image or teardown).
    pub fn reset(&mut self) {
        self.state = WindowState::Uninitialized;
    }

    /// Translate vertically by `round(delta_y)`, then clamp to the image.
    pub fn pan_by(&mut self, delta_y: f32) -> Option<PixelRect> {
        let policy = self.policy;
        let WindowState::Ready {
            rect,
            image_width,
            image_height,
            window_height,
        } = &mut self.state
        else {
            return None;
        };

        rect.offset(0, delta_y.round() as i32);

        if rect.bottom > *image_height {
            let base = match policy {
                BottomClampPolicy::ImageHeight => *image_height,
                BottomClampPolicy::LegacyImageWidth => *image_width,
            };
            rect.bottom = *image_height;
            rect.top = base - *window_height;
            debug!(top = rect.top, bottom = rect.bottom, %policy, "clamped to bottom edge");
        }

        if rect.top < 0 {
            rect.top = 0;
            rect.bottom = *window_height;
            debug!(bottom = rect.bottom, "clamped to top edge");
        }

        Some(*rect)
    }

    /// Move the window so it starts at `top`. Used by inertia, whose solver
    /// already keeps `top` within bounds.
    pub fn snap_to_top(&mut self, top: i32) -> Option<PixelRect> {
        let WindowState::Ready {
            rect,
            window_height,
            ..
        } = &mut self.state
        else {
            return None;
        };
        rect.top = top;
        rect.bottom = top + *window_height;
        Some(*rect)
    }

    /// The part of the window a decoder may be asked for.
    ///
    /// Clipped to the image bottom for images shorter than the viewport. A
    /// window that starts outside the image is reported as
    /// `OutOfBoundsRequest` instead of being forwarded.
    pub fn decode_rect(&self) -> Result<PixelRect> {
        let WindowState::Ready {
            rect,
            image_width,
            image_height,
            ..
        } = self.state
        else {
            return Err(ViewerError::InvalidGeometry {
                width: 0,
                height: 0,
            });
        };

        let out_of_bounds = ViewerError::OutOfBoundsRequest {
            top: rect.top,
            bottom: rect.bottom,
            image_height: image_height as u32,
        };
        if rect.top < 0 || rect.top >= image_height {
            return Err(out_of_bounds);
        }
        rect.intersect(&PixelRect::new(0, 0, image_width, image_height))
            .ok_or(out_of_bounds)
    }
}
