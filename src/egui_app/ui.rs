//! egui renderer for the OrbitalEye window.

mod chrome;
mod dashboard;
mod history;
pub mod style;
mod upload;

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use eframe::egui::{
    self, Color32, ColorImage, CornerRadius, Frame, Margin, TextureHandle, TextureOptions,
};
use uuid::Uuid;

use crate::egui_app::controller::EguiController;
use crate::scan::ScanImage;

/// Smallest usable window size.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(720.0, 560.0);

/// Widest the main column grows before it is centered.
const CONTENT_MAX_WIDTH: f32 = 1100.0;

/// Repaint interval while a worker is still running.
const PENDING_REPAINT: Duration = Duration::from_millis(100);

/// Renders the UI from the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
    scroll_to_top: bool,
    textures: HashMap<Uuid, TextureHandle>,
}

impl EguiApp {
    pub fn new(controller: EguiController) -> Self {
        Self {
            controller,
            visuals_set: false,
            scroll_to_top: false,
            textures: HashMap::new(),
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    /// Texture for an image preview, uploaded on first use.
    fn texture_for(&mut self, ctx: &egui::Context, image: &ScanImage) -> TextureHandle {
        self.textures
            .entry(image.key())
            .or_insert_with(|| {
                let preview = image.preview();
                let pixels = ColorImage::from_rgba_unmultiplied(
                    [preview.width as usize, preview.height as usize],
                    &preview.rgba,
                );
                ctx.load_texture(
                    format!("scan-{}", image.key()),
                    pixels,
                    TextureOptions::LINEAR,
                )
            })
            .clone()
    }

    /// Free textures for images no longer on screen or in history.
    fn prune_textures(&mut self) {
        let session = self.controller.session();
        let live: HashSet<Uuid> = session
            .selected_image()
            .map(ScanImage::key)
            .into_iter()
            .chain(session.history().iter().map(|item| item.image.key()))
            .collect();
        self.textures.retain(|key, _| live.contains(key));
    }

    fn render_main(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::CentralPanel::default()
            .frame(Frame::new().fill(palette.bg_primary).inner_margin(Margin::same(16)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("main_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        if std::mem::take(&mut self.scroll_to_top) {
                            ui.scroll_to_cursor(Some(egui::Align::TOP));
                        }
                        let width = ui.available_width().min(CONTENT_MAX_WIDTH);
                        let side = ((ui.available_width() - width) / 2.0).max(0.0);
                        ui.horizontal(|ui| {
                            ui.add_space(side);
                            ui.vertical(|ui| {
                                ui.set_width(width);
                                if self.controller.session().selected_image().is_none() {
                                    self.render_hero(ui);
                                }
                                self.render_upload(ui);
                                self.render_error_banner(ui);
                                self.render_dashboard(ctx, ui);
                                self.render_history(ctx, ui);
                            });
                        });
                    });
            });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.handle_dropped_files(ctx);
        self.controller.poll_background_jobs();
        self.render_header(ctx);
        self.render_status(ctx);
        self.render_footer(ctx);
        self.render_main(ctx);
        self.render_drop_overlay(ctx);
        self.prune_textures();
        if self.controller.has_pending_jobs() {
            ctx.request_repaint_after(PENDING_REPAINT);
        }
    }
}

fn section_frame() -> Frame {
    let palette = style::palette();
    Frame::new()
        .fill(palette.bg_secondary)
        .stroke(style::card_stroke())
        .corner_radius(CornerRadius::same(12))
        .inner_margin(Margin::same(16))
}

fn muted(text: impl Into<String>) -> egui::RichText {
    egui::RichText::new(text).color(style::palette().text_muted)
}

fn heading(text: impl Into<String>) -> egui::RichText {
    egui::RichText::new(text).strong().size(18.0).color(Color32::WHITE)
}
