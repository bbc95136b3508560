use crate::app::TallviewApp;

pub fn show(ctx: &egui::Context, app: &mut TallviewApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area, fixed height for 3 lines.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 3.0 + spacing * 2.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.log_messages.is_empty() {
                    for _ in 0..3 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.log_messages {
                        ui.label(msg);
                    }
                }
            });

        ui.horizontal(|ui| {
            if let Some(meta) = app.view.meta() {
                ui.label(format!("{}x{}", meta.width, meta.height));
                ui.separator();
            }
            if let Some(scale) = app.view.scale() {
                ui.label(format!("Scale: {:.0}%", scale * 100.0));
                ui.separator();
            }
            if let Some(rect) = app.view.visible_rect() {
                ui.label(format!("Rows {}..{}", rect.top, rect.bottom));
                ui.separator();
            }
            ui.label(format!("{}", app.view.config().pixel_format));
            if app.view.is_animating() {
                ui.separator();
                ui.label("Flinging");
            }
            let stats = app.view.render_stats();
            if stats.decode_failures > 0 {
                ui.separator();
                ui.label(format!("{} failed decode(s)", stats.decode_failures));
            }
            if let Some(ref err) = app.last_error {
                ui.separator();
                ui.colored_label(egui::Color32::from_rgb(220, 90, 90), err);
            }
        });

        ui.add_space(2.0);
    });
}
