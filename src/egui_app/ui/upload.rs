use super::style;
use super::*;
use eframe::egui::{Align2, DroppedFile, FontId, Id, LayerId, Order, RichText, Sense, Stroke};

const UPLOAD_ZONE_HEIGHT: f32 = 180.0;

impl EguiApp {
    /// Clickable drop zone that opens the image picker.
    pub(super) fn render_upload(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let analyzing = self.controller.session().is_analyzing();
        let zone = Frame::new()
            .fill(palette.bg_secondary)
            .stroke(Stroke::new(2.0, palette.panel_outline))
            .corner_radius(CornerRadius::same(16))
            .inner_margin(Margin::same(16))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.set_min_height(UPLOAD_ZONE_HEIGHT);
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    if analyzing {
                        ui.add(egui::Spinner::new().size(40.0).color(palette.accent_blue));
                        ui.add_space(12.0);
                        ui.label(
                            RichText::new("Processing Satellite Feed...")
                                .size(18.0)
                                .strong()
                                .color(palette.text_primary),
                        );
                        ui.label(
                            RichText::new("ANALYZING PIXELS...")
                                .monospace()
                                .color(palette.accent_blue),
                        );
                    } else {
                        ui.label(RichText::new("⬆").size(36.0).color(palette.text_muted));
                        ui.add_space(8.0);
                        ui.label(
                            RichText::new("Deploy Satellite Imagery")
                                .size(18.0)
                                .strong()
                                .color(palette.text_primary),
                        );
                        ui.label(muted(
                            "Supports High-Res TIFF, JPG, PNG from Sentinel-2 or Landsat",
                        ));
                    }
                });
            });
        let response = zone.response.interact(Sense::click());
        if analyzing {
            return;
        }
        let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
        if response.hovered() {
            ui.painter().rect_stroke(
                response.rect,
                CornerRadius::same(16),
                Stroke::new(2.0, palette.accent_blue.gamma_multiply(0.5)),
                egui::StrokeKind::Inside,
            );
        }
        if response.clicked() {
            self.controller.select_image_via_dialog();
        }
    }

    /// Treat a dropped image like a picked one; ignored while analyzing.
    pub(super) fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if self.controller.session().is_analyzing() {
            tracing::debug!("Ignoring drop while analysis is running");
            return;
        }
        self.select_dropped_file(file);
    }

    fn select_dropped_file(&mut self, file: DroppedFile) {
        if let Some(path) = file.path {
            self.controller.select_image_path(path);
        } else if let Some(bytes) = file.bytes {
            let name = if file.name.is_empty() {
                "dropped image".to_string()
            } else {
                file.name
            };
            self.controller.select_image_bytes(name, bytes);
        } else {
            tracing::warn!("Dropped file had neither a path nor contents");
        }
    }

    pub(super) fn render_drop_overlay(&mut self, ctx: &egui::Context) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        if !hovering || self.controller.session().is_analyzing() {
            return;
        }
        let palette = style::palette();
        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("drop_overlay")));
        let screen = ctx.viewport_rect();
        painter.rect_filled(screen, CornerRadius::ZERO, palette.bg_primary.gamma_multiply(0.85));
        painter.text(
            screen.center(),
            Align2::CENTER_CENTER,
            "Drop satellite imagery to scan",
            FontId::proportional(24.0),
            palette.accent_blue,
        );
    }
}
