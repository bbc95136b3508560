mod app;
mod canvas;
mod messages;
mod panels;

use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([540.0, 960.0])
            .with_min_inner_size([320.0, 480.0])
            .with_title("Tallview"),
        ..Default::default()
    };

    eframe::run_native(
        "Tallview",
        options,
        Box::new(|cc| Ok(Box::new(app::TallviewApp::new(&cc.egui_ctx, initial_file)))),
    )
}
