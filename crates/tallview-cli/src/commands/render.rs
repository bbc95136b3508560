use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tallview_core::gesture::GestureEvent;
use tallview_core::inertia::SteppedClock;
use tallview_core::io::image_io::save_frame;
use tallview_core::render::ImageCanvas;
use tallview_core::view::LongImageView;
use tracing::warn;

use super::{load_config, parse_viewport, PixelFormatArg};
use crate::summary::{print_render_result, print_render_summary, RenderPlan};

#[derive(Args)]
pub struct RenderArgs {
    /// Input image file
    pub file: PathBuf,

    /// Viewport size in device pixels
    #[arg(long, value_parser = parse_viewport, default_value = "1080x1920")]
    pub viewport: (u32, u32),

    /// Scroll by this many pixels (repeatable, applied in order)
    #[arg(long, allow_hyphen_values = true)]
    pub scroll: Vec<f32>,

    /// Release with this vertical velocity (px/s) after the scrolls
    #[arg(long, allow_hyphen_values = true)]
    pub fling: Option<f32>,

    /// Maximum number of fling frames to render
    #[arg(long, default_value = "120")]
    pub frames: usize,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the decode pixel format
    #[arg(long, value_enum)]
    pub format: Option<PixelFormatArg>,

    /// Output image extension (png or tiff)
    #[arg(long, default_value = "png")]
    pub ext: String,

    /// Output directory
    #[arg(short, long, default_value = "frames")]
    pub output: PathBuf,
}

struct FrameWriter<'a> {
    dir: &'a Path,
    ext: &'a str,
    written: usize,
    skipped: usize,
}

impl FrameWriter<'_> {
    /// Render one frame and save it. Region decode failures are logged and
    /// counted; the session carries on.
    fn step(&mut self, view: &mut LongImageView, canvas: &mut ImageCanvas) -> Result<bool> {
        match view.frame(canvas) {
            Ok(report) => {
                let path = self
                    .dir
                    .join(format!("frame_{:04}.{}", self.written, self.ext));
                save_frame(canvas.frame(), &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                self.written += 1;
                Ok(report.animating)
            }
            Err(e) if e.is_decode() => {
                warn!(error = %e, "frame skipped");
                self.skipped += 1;
                Ok(view.is_animating())
            }
            Err(e) => Err(e.into()),
        }
    }
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(format) = args.format {
        config.pixel_format = format.into();
    }
    let (vw, vh) = args.viewport;

    let clock = SteppedClock::new(config.frame_interval());
    let mut view = LongImageView::with_clock(config, Box::new(clock));
    view.configure(vw, vh);
    let meta = view
        .open(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    print_render_summary(&RenderPlan {
        input: &args.file,
        output: &args.output,
        meta: &meta,
        view: &view,
        scrolls: &args.scroll,
        fling: args.fling,
    });

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let fling_frames = if args.fling.is_some() { args.frames } else { 0 };
    let total = 1 + args.scroll.len() + fling_frames;
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Rendering [{bar:40}] {pos}/{len} frames")?
            .progress_chars("=> "),
    );

    let mut writer = FrameWriter {
        dir: &args.output,
        ext: &args.ext,
        written: 0,
        skipped: 0,
    };
    let mut canvas = ImageCanvas::new(vw, vh);

    writer.step(&mut view, &mut canvas)?;
    pb.inc(1);

    for &dy in &args.scroll {
        view.handle_gesture(GestureEvent::Scroll { dx: 0.0, dy });
        writer.step(&mut view, &mut canvas)?;
        pb.inc(1);
    }

    if let Some(vy) = args.fling {
        view.handle_gesture(GestureEvent::Fling { vx: 0.0, vy });
        for _ in 0..args.frames {
            let animating = writer.step(&mut view, &mut canvas)?;
            pb.inc(1);
            if !animating {
                break;
            }
        }
    }
    pb.finish_and_clear();

    print_render_result(
        writer.written,
        writer.skipped,
        view.visible_rect(),
        view.render_stats(),
        view.is_animating(),
    );
    Ok(())
}
