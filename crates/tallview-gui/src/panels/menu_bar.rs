use tallview_core::config::ViewerConfig;

use crate::app::TallviewApp;
use crate::messages::UiMessage;

pub fn show(ctx: &egui::Context, app: &mut TallviewApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui.add(egui::Button::new("Open...").shortcut_text(ctx.format_shortcut(&open_shortcut))).clicked() {
                    ui.close();
                    open_file(app);
                }

                if ui
                    .add_enabled(app.file_path.is_some(), egui::Button::new("Close"))
                    .clicked()
                {
                    ui.close();
                    app.close_file();
                }

                ui.separator();

                if ui.button("Import Config...").clicked() {
                    ui.close();
                    import_config(app);
                }

                if ui.button("Export Config...").clicked() {
                    ui.close();
                    export_config(app);
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui.add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut))).clicked() {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui.button("Reset Defaults").clicked() {
                    ui.close();
                    app.apply_config(Default::default());
                    app.add_log("Config reset to defaults".into());
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            open_file(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn open_file(app: &mut TallviewApp) {
    let msg_tx = app.msg_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "webp", "bmp", "tif", "tiff", "pgm", "ppm"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            let _ = msg_tx.send(UiMessage::OpenFile { path });
        }
    });
}

fn import_config(app: &mut TallviewApp) {
    let msg_tx = app.msg_tx.clone();
    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .pick_file()
        else {
            return;
        };
        let parsed: Result<ViewerConfig, String> = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str(&content).map_err(|e| e.to_string()));
        let message = match parsed {
            Ok(config) => UiMessage::ConfigImported { config },
            Err(e) => UiMessage::Log {
                message: format!("ERROR: invalid config {}: {e}", path.display()),
            },
        };
        let _ = msg_tx.send(message);
    });
}

fn export_config(app: &mut TallviewApp) {
    let config = app.view.config().clone();
    let msg_tx = app.msg_tx.clone();

    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .set_file_name("tallview.toml")
            .save_file()
        {
            let result = toml::to_string_pretty(&config)
                .map_err(|e| e.to_string())
                .and_then(|content| std::fs::write(&path, content).map_err(|e| e.to_string()));
            let message = match result {
                Ok(()) => format!("Config saved: {}", path.display()),
                Err(e) => format!("ERROR: {e}"),
            };
            let _ = msg_tx.send(UiMessage::Log { message });
        }
    });
}
