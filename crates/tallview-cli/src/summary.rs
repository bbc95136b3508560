use std::path::Path;

use console::Style;
use tallview_core::geometry::PixelRect;
use tallview_core::io::ImageMeta;
use tallview_core::render::RenderStats;
use tallview_core::view::LongImageView;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

/// What `tallview render` is about to do.
pub struct RenderPlan<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub meta: &'a ImageMeta,
    pub view: &'a LongImageView,
    pub scrolls: &'a [f32],
    pub fling: Option<f32>,
}

pub fn print_render_summary(plan: &RenderPlan<'_>) {
    let s = Styles::new();
    let config = plan.view.config();
    let viewport = plan.view.viewport();

    println!();
    println!("  {}", s.title.apply_to("Tallview Render"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(15)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(plan.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(plan.output.display())
    );
    println!();

    println!("  {}", s.header.apply_to("Image"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Size"),
        s.value
            .apply_to(format!("{}x{}", plan.meta.width, plan.meta.height))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Format"),
        s.method.apply_to(plan.meta.format)
    );
    println!();

    println!("  {}", s.header.apply_to("Viewport"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Size"),
        s.value
            .apply_to(format!("{}x{}", viewport.width(), viewport.height()))
    );
    if let Some(scale) = viewport.scale() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Scale"),
            s.value.apply_to(format!("{scale:.3}"))
        );
    }
    if let Some(rows) = viewport.window_height() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Window"),
            s.value.apply_to(format!("{rows} rows"))
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Decode"),
        s.method.apply_to(config.pixel_format)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Clamp"),
        s.method.apply_to(config.bottom_clamp)
    );
    println!();

    println!("  {}", s.header.apply_to("Gestures"));
    if plan.scrolls.is_empty() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Scroll"),
            s.disabled.apply_to("none")
        );
    } else {
        for (i, dy) in plan.scrolls.iter().enumerate() {
            println!(
                "    {:<12}{}",
                s.label.apply_to(format!("Scroll {}", i + 1)),
                s.value.apply_to(format!("{dy:+} px"))
            );
        }
    }
    match plan.fling {
        Some(vy) => println!(
            "    {:<12}{}",
            s.label.apply_to("Fling"),
            s.value.apply_to(format!(
                "{vy:+} px/s (friction {}, stop below {} px/s)",
                config.fling.friction, config.fling.min_velocity
            ))
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Fling"),
            s.disabled.apply_to("none")
        ),
    }
    println!();
}

pub fn print_render_result(
    written: usize,
    skipped: usize,
    window: Option<PixelRect>,
    stats: RenderStats,
    still_animating: bool,
) {
    let s = Styles::new();

    println!("  {}", s.header.apply_to("Result"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(written)
    );
    if skipped > 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Skipped"),
            s.disabled.apply_to(skipped)
        );
    }
    if let Some(rect) = window {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Window"),
            s.value.apply_to(rect)
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Buffers"),
        s.value.apply_to(format!(
            "{} allocation(s) for {} frame(s)",
            stats.allocations, stats.frames
        ))
    );
    if still_animating {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Fling"),
            s.disabled.apply_to("cut off by --frames")
        );
    }
    println!();
}
