use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::{Context, Result};
use tallview_core::config::ViewerConfig;
use tallview_core::view::LongImageView;
use tracing::warn;

use crate::canvas::EguiCanvas;
use crate::messages::UiMessage;
use crate::panels;

const MAX_LOG_LINES: usize = 200;

pub struct TallviewApp {
    pub msg_tx: mpsc::Sender<UiMessage>,
    pub msg_rx: mpsc::Receiver<UiMessage>,
    pub view: LongImageView,
    pub canvas: EguiCanvas,
    pub file_path: Option<PathBuf>,
    /// Viewport size last passed to `configure`, in device pixels.
    pub layout: Option<(u32, u32)>,
    pub last_error: Option<String>,
    pub log_messages: Vec<String>,
    pub show_about: bool,
}

impl TallviewApp {
    pub fn new(ctx: &egui::Context, initial_file: Option<PathBuf>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        let mut app = Self {
            msg_tx,
            msg_rx,
            view: LongImageView::new(ViewerConfig::default()),
            canvas: EguiCanvas::new(ctx),
            file_path: None,
            layout: None,
            last_error: None,
            log_messages: Vec::new(),
            show_about: false,
        };
        if let Some(path) = initial_file {
            app.open_reporting(&path);
        }
        app
    }

    pub fn add_log(&mut self, message: String) {
        self.log_messages.push(message);
        if self.log_messages.len() > MAX_LOG_LINES {
            self.log_messages.remove(0);
        }
    }

    fn open_path(&mut self, path: &Path) -> Result<()> {
        let meta = self
            .view
            .open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        self.file_path = Some(path.to_path_buf());
        self.last_error = None;
        self.add_log(format!(
            "Opened: {} ({}x{}, {})",
            path.display(),
            meta.width,
            meta.height,
            meta.format
        ));
        Ok(())
    }

    /// Open `path`, logging instead of propagating failures. A failed open
    /// keeps whatever image was showing.
    pub fn open_reporting(&mut self, path: &Path) {
        if let Err(e) = self.open_path(path) {
            warn!("{e:#}");
            self.add_log(format!("ERROR: {e:#}"));
        }
    }

    /// Rebuild the view with `config`, then reload the current file and
    /// restore the layout.
    pub fn apply_config(&mut self, config: ViewerConfig) {
        self.view = LongImageView::new(config);
        self.canvas.clear();
        if let Some((width, height)) = self.layout {
            self.view.configure(width, height);
        }
        if let Some(path) = self.file_path.clone() {
            self.open_reporting(&path);
        }
    }

    pub fn close_file(&mut self) {
        self.view.unload();
        self.canvas.clear();
        self.file_path = None;
        self.last_error = None;
    }

    fn poll_messages(&mut self) {
        while let Ok(message) = self.msg_rx.try_recv() {
            match message {
                UiMessage::OpenFile { path } => self.open_reporting(&path),
                UiMessage::ConfigImported { config } => {
                    self.add_log(format!(
                        "Config imported ({}, {})",
                        config.pixel_format, config.bottom_clamp
                    ));
                    self.apply_config(config);
                }
                UiMessage::Log { message } => self.add_log(message),
            }
        }
    }
}

impl eframe::App for TallviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages();

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::viewport::show(ctx, self);

        if self.view.is_animating() {
            ctx.request_repaint();
        }

        if self.show_about {
            egui::Window::new("About Tallview")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Tallview");
                        ui.label("Viewer for very tall images");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}
