use tallview_core::gesture::GestureEvent;
use tracing::warn;

use crate::app::TallviewApp;

pub fn show(ctx: &egui::Context, app: &mut TallviewApp) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            paint_background(ui, rect);

            let ppp = ctx.pixels_per_point();
            sync_layout(app, rect, ppp);

            if app.file_path.is_none() {
                show_placeholder(ui);
                return;
            }

            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
            feed_gestures(ui, &response, app, ppp);
            render_if_needed(app);
            draw_image(ui, app, rect, ppp);
        });
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

/// Pass the panel size to the view whenever it changes.
fn sync_layout(app: &mut TallviewApp, rect: egui::Rect, ppp: f32) {
    let size = rect.size() * ppp;
    let layout = (size.x.round().max(0.0) as u32, size.y.round().max(0.0) as u32);
    if app.layout != Some(layout) {
        app.layout = Some(layout);
        app.view.configure(layout.0, layout.1);
    }
}

/// Translate pointer input into gestures, in device pixels.
///
/// Dragging reports how far the finger moved, so the scroll distance is the
/// negated drag delta. Release velocity is passed through as-is; the view
/// inverts it when it starts the fling.
fn feed_gestures(ui: &egui::Ui, response: &egui::Response, app: &mut TallviewApp, ppp: f32) {
    if response.hovered() && ui.input(|i| i.pointer.primary_pressed()) {
        app.view.handle_gesture(GestureEvent::Down);
    }

    if response.dragged_by(egui::PointerButton::Primary) {
        let delta = response.drag_delta() * ppp;
        if delta != egui::Vec2::ZERO {
            app.view.handle_gesture(GestureEvent::Scroll {
                dx: -delta.x,
                dy: -delta.y,
            });
        }
    }

    if response.drag_stopped_by(egui::PointerButton::Primary) {
        let velocity = ui.input(|i| i.pointer.velocity()) * ppp;
        app.view.handle_gesture(GestureEvent::Fling {
            vx: velocity.x,
            vy: velocity.y,
        });
    } else if response.clicked() {
        app.view.handle_gesture(GestureEvent::SingleTap);
    }

    let wheel = ui.input(|i| i.smooth_scroll_delta.y);
    if wheel != 0.0 && response.hovered() {
        app.view.handle_gesture(GestureEvent::Scroll {
            dx: 0.0,
            dy: -wheel * ppp,
        });
    }
}

fn render_if_needed(app: &mut TallviewApp) {
    if !(app.view.take_redraw_request() || app.view.is_animating()) {
        return;
    }
    match app.view.frame(&mut app.canvas) {
        Ok(_) => app.last_error = None,
        Err(e) => {
            warn!(error = %e, "frame not rendered");
            app.last_error = Some(e.to_string());
        }
    }
}

fn draw_image(ui: &egui::Ui, app: &TallviewApp, rect: egui::Rect, ppp: f32) {
    let Some(texture) = app.canvas.texture() else {
        return;
    };
    let img_rect = egui::Rect::from_min_size(rect.min, app.canvas.device_size() / ppp);
    ui.painter().with_clip_rect(rect).image(
        texture.id(),
        img_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Open an image to begin")
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}
