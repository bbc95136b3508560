use kurbo::Affine;
use tallview_core::decode::PixelBuffer;
use tallview_core::render::Canvas;

/// Canvas that uploads each composited region as an egui texture.
///
/// The texture holds the region at native resolution; the viewport panel
/// paints it stretched by the scale carried in the transform.
pub struct EguiCanvas {
    ctx: egui::Context,
    texture: Option<egui::TextureHandle>,
    /// Region size in image pixels times the transform scale.
    device_size: egui::Vec2,
}

impl EguiCanvas {
    pub fn new(ctx: &egui::Context) -> Self {
        Self {
            ctx: ctx.clone(),
            texture: None,
            device_size: egui::Vec2::ZERO,
        }
    }

    pub fn texture(&self) -> Option<&egui::TextureHandle> {
        self.texture.as_ref()
    }

    /// Size of the last draw in device pixels.
    pub fn device_size(&self) -> egui::Vec2 {
        self.device_size
    }

    pub fn clear(&mut self) {
        self.texture = None;
        self.device_size = egui::Vec2::ZERO;
    }
}

impl Canvas for EguiCanvas {
    fn draw_bitmap(&mut self, buffer: &PixelBuffer, transform: Affine) {
        if buffer.is_empty() {
            self.clear();
            return;
        }
        let size = [buffer.width() as usize, buffer.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, &buffer.to_rgba());

        match self.texture.as_mut() {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(self.ctx.load_texture(
                    "long-image",
                    image,
                    egui::TextureOptions::LINEAR,
                ));
            }
        }

        let [sx, _, _, sy, _, _] = transform.as_coeffs();
        self.device_size = egui::vec2(
            (f64::from(buffer.width()) * sx) as f32,
            (f64::from(buffer.height()) * sy) as f32,
        );
    }
}
