//! Zoomable receipt image viewer
//!
//! A fullscreen backdrop with the receipt image scaled to fit. Closed by
//! clicking anywhere or by Escape (routed through the app's input
//! dispatcher). Textures are decoded lazily, once per opened path.

use std::path::PathBuf;

use eframe::egui;

struct Viewed {
    path: PathBuf,
    texture: Option<egui::TextureHandle>,
    error: Option<String>,
}

/// Viewer state: at most one image open at a time
#[derive(Default)]
pub struct ImageViewer {
    current: Option<Viewed>,
}

impl ImageViewer {
    pub fn open(&mut self, path: PathBuf) {
        self.current = Some(Viewed {
            path,
            texture: None,
            error: None,
        });
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Render the viewer if open
    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(viewed) = self.current.as_mut() else {
            return;
        };

        if viewed.texture.is_none() && viewed.error.is_none() {
            match load_texture(ctx, &viewed.path) {
                Ok(texture) => viewed.texture = Some(texture),
                Err(msg) => {
                    log::warn!("viewer: {}: {}", viewed.path.display(), msg);
                    viewed.error = Some(msg);
                }
            }
        }

        let screen = ctx.screen_rect();
        let mut close = false;

        egui::Area::new(egui::Id::new("image_viewer"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let (rect, response) = ui.allocate_exact_size(screen.size(), egui::Sense::click());
                ui.painter()
                    .rect_filled(rect, egui::CornerRadius::ZERO, egui::Color32::from_black_alpha(200));

                match (&viewed.texture, &viewed.error) {
                    (Some(texture), _) => {
                        let size = texture.size_vec2();
                        let scale = (0.9 * rect.width() / size.x)
                            .min(0.9 * rect.height() / size.y)
                            .min(1.0);
                        let image_rect =
                            egui::Rect::from_center_size(rect.center(), size * scale);
                        ui.painter().image(
                            texture.id(),
                            image_rect,
                            egui::Rect::from_min_max(egui::Pos2::ZERO, egui::pos2(1.0, 1.0)),
                            egui::Color32::WHITE,
                        );
                    }
                    (None, Some(msg)) => {
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            format!("Could not display image: {}", msg),
                            egui::FontId::proportional(16.0),
                            egui::Color32::LIGHT_GRAY,
                        );
                    }
                    (None, None) => {}
                }

                if response.clicked() {
                    close = true;
                }
            });

        if close {
            self.close();
        }
    }
}

fn load_texture(ctx: &egui::Context, path: &std::path::Path) -> Result<egui::TextureHandle, String> {
    let decoded = image::ImageReader::open(path)
        .map_err(|e| e.to_string())?
        .decode()
        .map_err(|e| e.to_string())?;
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_flat_samples().as_slice());
    Ok(ctx.load_texture(
        format!("receipt-image:{}", path.display()),
        color_image,
        egui::TextureOptions::LINEAR,
    ))
}
