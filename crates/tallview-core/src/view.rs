//! The embeddable long-image view.
//!
//! A [`LongImageView`] is built empty and then receives a viewport size
//! ([`LongImageView::configure`]) and an image ([`LongImageView::load_image`])
//! in either order; the window is initialized by whichever arrives last. The
//! host feeds it gestures and calls [`LongImageView::frame`] once per display
//! refresh while [`LongImageView::take_redraw_request`] or
//! [`LongImageView::is_animating`] say there is something to draw.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ViewerConfig;
use crate::decode::RegionDecoder;
use crate::error::{Result, ViewerError};
use crate::geometry::PixelRect;
use crate::gesture::{GestureAdapter, GestureEvent};
use crate::inertia::{
    ExponentialFling, FrameClock, InertiaController, InertiaSolver, InertiaTick, SystemClock,
};
use crate::io::{open_decoder, probe, ImageBytes, ImageMeta};
use crate::render::{Canvas, FrameOutcome, RenderLoop, RenderStats};
use crate::viewport::ViewportState;
use crate::window::VisibleWindow;

/// Summary of one [`LongImageView::frame`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    pub inertia: InertiaTick,
    pub outcome: FrameOutcome,
    /// A fling is still running; the host should schedule another frame.
    pub animating: bool,
}

pub struct LongImageView {
    config: ViewerConfig,
    meta: Option<ImageMeta>,
    viewport: ViewportState,
    window: VisibleWindow,
    inertia: InertiaController,
    render: RenderLoop,
    gestures: GestureAdapter,
    redraw_requested: bool,
}

impl LongImageView {
    /// An empty view driven by the wall clock.
    pub fn new(config: ViewerConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock::new()))
    }

    /// An empty view with the default fling physics and a custom clock.
    pub fn with_clock(config: ViewerConfig, clock: Box<dyn FrameClock>) -> Self {
        let solver = Box::new(ExponentialFling::new(&config.fling));
        Self::with_parts(config, solver, clock)
    }

    pub fn with_parts(
        config: ViewerConfig,
        solver: Box<dyn InertiaSolver>,
        clock: Box<dyn FrameClock>,
    ) -> Self {
        Self {
            meta: None,
            viewport: ViewportState::new(),
            window: VisibleWindow::new(config.bottom_clamp),
            inertia: InertiaController::new(solver, clock),
            render: RenderLoop::new(config.pixel_format),
            gestures: GestureAdapter,
            redraw_requested: false,
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn meta(&self) -> Option<&ImageMeta> {
        self.meta.as_ref()
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn scale(&self) -> Option<f32> {
        self.viewport.scale()
    }

    pub fn window(&self) -> &VisibleWindow {
        &self.window
    }

    /// Current visible rectangle, once initialized.
    pub fn visible_rect(&self) -> Option<PixelRect> {
        self.window.rect()
    }

    pub fn render_stats(&self) -> RenderStats {
        self.render.stats()
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render
    }

    /// Layout pass: set the viewport size in device pixels.
    ///
    /// A relayout that changes the window height stops any fling.
    pub fn configure(&mut self, width: u32, height: u32) {
        self.viewport.on_layout(width, height);
        match self.viewport.scale() {
            Some(scale) if self.window.is_ready() && height > 0 => {
                let old_height = self.window.window_height();
                self.window.resize(height, scale);
                // A running fling is bounded by the old max_top.
                if self.window.window_height() != old_height && self.inertia.cancel() {
                    debug!(height, "fling stopped by relayout");
                }
            }
            _ => self.try_initialize(),
        }
        self.redraw_requested = true;
    }

    /// Probe and attach an encoded image.
    ///
    /// On failure the previously loaded image, window and last frame stay in
    /// place.
    pub fn load_image(&mut self, bytes: ImageBytes) -> Result<ImageMeta> {
        let bytes = Arc::new(bytes);
        let meta = probe(&bytes)?;
        let decoder = open_decoder(bytes, &meta)?;
        self.install(meta, decoder);
        Ok(meta)
    }

    /// Memory-map `path` and load it.
    pub fn open(&mut self, path: &Path) -> Result<ImageMeta> {
        let bytes = ImageBytes::open(path)?;
        let meta = self.load_image(bytes)?;
        info!(
            path = %path.display(),
            width = meta.width,
            height = meta.height,
            "image opened"
        );
        Ok(meta)
    }

    /// Attach a custom region decoder in place of a probed stream.
    pub fn set_decoder(&mut self, decoder: Box<dyn RegionDecoder>) -> Result<ImageMeta> {
        let meta = *decoder.meta();
        if meta.width == 0 || meta.height == 0 {
            return Err(ViewerError::InvalidGeometry {
                width: meta.width,
                height: meta.height,
            });
        }
        self.install(meta, decoder);
        Ok(meta)
    }

    /// Drop the image and return to the empty state.
    pub fn unload(&mut self) {
        self.inertia.cancel();
        self.window.reset();
        self.render.detach();
        self.meta = None;
        self.viewport.set_image_width(0);
        self.redraw_requested = true;
    }

    fn install(&mut self, meta: ImageMeta, decoder: Box<dyn RegionDecoder>) {
        self.inertia.cancel();
        self.window.reset();
        self.render.attach(decoder);
        self.meta = Some(meta);
        self.viewport.set_image_width(meta.width);
        self.try_initialize();
        self.redraw_requested = true;
    }

    fn try_initialize(&mut self) {
        if self.window.is_ready() || self.viewport.height() == 0 {
            return;
        }
        if let (Some(meta), Some(scale)) = (self.meta, self.viewport.scale()) {
            self.window
                .initialize(meta.width, meta.height, self.viewport.height(), scale);
        }
    }

    /// Feed one classified gesture.
    pub fn handle_gesture(&mut self, event: GestureEvent) {
        if self
            .gestures
            .handle(event, &mut self.window, &mut self.inertia)
        {
            self.redraw_requested = true;
        }
    }

    /// Returns and clears the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub fn is_animating(&self) -> bool {
        self.inertia.is_active()
    }

    /// Produce one frame: apply one inertia step, then decode and composite.
    pub fn frame(&mut self, canvas: &mut dyn Canvas) -> Result<FrameReport> {
        let inertia = self.gestures.on_frame(&mut self.window, &mut self.inertia);
        self.redraw_requested = self.inertia.is_active();

        if !self.render.has_decoder() {
            return Ok(FrameReport {
                inertia,
                outcome: FrameOutcome::NoDecoder,
                animating: self.inertia.is_active(),
            });
        }

        self.viewport.check_geometry()?;
        let scale = self.viewport.scale().ok_or(ViewerError::InvalidGeometry {
            width: self.viewport.width(),
            height: self.viewport.height(),
        })?;
        let region = self.window.decode_rect()?;

        let outcome = self.render.render_frame(region, scale, canvas)?;
        debug!(%region, ?inertia, "frame rendered");

        Ok(FrameReport {
            inertia,
            outcome,
            animating: self.inertia.is_active(),
        })
    }
}
