use super::style;
use super::*;
use eframe::egui::{RichText, Stroke};

const API_DOCS_URL: &str = "https://ai.google.dev/gemini-api/docs";
const EARTH_ENGINE_DOCS_URL: &str = "https://developers.google.com/earth-engine";

const DISCLAIMER: &str = "Powered by Gemini Vision Intelligence. For decision support only. \
Always consult local emergency agencies during active events.";

impl EguiApp {
    pub(super) fn render_header(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("header")
            .frame(
                Frame::new()
                    .fill(palette.bg_secondary)
                    .inner_margin(Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let (rect, _) = ui.allocate_exact_size(egui::vec2(36.0, 36.0), egui::Sense::hover());
                    ui.painter()
                        .rect_filled(rect, CornerRadius::same(8), palette.accent_blue);
                    ui.painter().circle_stroke(
                        rect.center(),
                        10.0,
                        Stroke::new(2.0, Color32::WHITE),
                    );
                    ui.add_space(6.0);
                    ui.vertical(|ui| {
                        ui.label(RichText::new("OrbitalEye").strong().size(20.0).color(Color32::WHITE));
                        ui.label(
                            RichText::new("GLOBAL WATCH SYSTEM")
                                .size(10.0)
                                .color(palette.accent_blue),
                        );
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let (label, color) = if self.controller.session().is_busy() {
                            ("System Status: Scanning", palette.accent_blue)
                        } else {
                            ("System Status: Active", palette.text_primary)
                        };
                        ui.label(RichText::new(label).color(color));
                    });
                });
            });
    }

    pub(super) fn render_hero(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Planetary Shield").size(40.0).strong().color(Color32::WHITE));
            ui.label(
                RichText::new("Early Warning AI")
                    .size(40.0)
                    .strong()
                    .color(palette.accent_blue),
            );
            ui.add_space(12.0);
            ui.label(
                RichText::new(
                    "Advanced satellite imagery analysis for real-time disaster monitoring. \
                     Identify forest fires and tsunamis with state-of-the-art vision models.",
                )
                .size(16.0)
                .color(palette.text_muted),
            );
            ui.add_space(16.0);
            ui.horizontal_wrapped(|ui| {
                for (label, category) in [
                    ("Wildfire Monitoring", crate::scan::DisasterCategory::ForestFire),
                    ("Ocean Inundation", crate::scan::DisasterCategory::Tsunami),
                    ("Environmental Baseline", crate::scan::DisasterCategory::Normal),
                ] {
                    hero_pill(ui, label, style::category_color(category));
                }
            });
        });
        ui.add_space(16.0);
    }

    pub(super) fn render_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(error) = self.controller.session().error() else {
            return;
        };
        let palette = style::palette();
        ui.add_space(12.0);
        Frame::new()
            .fill(palette.danger.gamma_multiply(0.12))
            .stroke(Stroke::new(1.0, palette.danger.gamma_multiply(0.6)))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(Margin::symmetric(14, 10))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new("⚠").color(palette.danger));
                    ui.label(RichText::new(error).color(palette.danger));
                });
            });
    }

    pub(super) fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(Color32::BLACK)
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(rect.center(), 6.0, status.badge_color);
                    ui.label(RichText::new(&status.badge_label).color(Color32::WHITE));
                    ui.separator();
                    let response = ui.label(RichText::new(&status.text).color(Color32::WHITE));
                    if !status.log.is_empty() {
                        response.on_hover_text(status.log_text());
                    }
                });
            });
    }

    pub(super) fn render_footer(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("footer")
            .frame(
                Frame::new()
                    .fill(palette.bg_secondary)
                    .inner_margin(Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(DISCLAIMER).size(12.0).color(palette.text_muted));
                    ui.horizontal(|ui| {
                        footer_link(ui, "API Access", API_DOCS_URL);
                        ui.add_space(16.0);
                        footer_link(ui, "Earth Engine Docs", EARTH_ENGINE_DOCS_URL);
                        ui.add_space(16.0);
                        ui.label(
                            RichText::new(format!(
                                "OrbitalEye Systems v{}",
                                env!("CARGO_PKG_VERSION")
                            ))
                            .monospace()
                            .size(10.0)
                            .color(palette.panel_outline),
                        );
                    });
                });
            });
    }
}

fn hero_pill(ui: &mut egui::Ui, label: &str, dot: Color32) {
    let palette = style::palette();
    Frame::new()
        .fill(palette.bg_secondary)
        .stroke(style::card_stroke())
        .corner_radius(CornerRadius::same(16))
        .inner_margin(Margin::symmetric(12, 6))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 4.0, dot);
                ui.label(RichText::new(label).color(palette.text_primary));
            });
        });
}

fn footer_link(ui: &mut egui::Ui, label: &str, url: &str) {
    let response = ui.link(RichText::new(label).size(11.0));
    if response.clicked()
        && let Err(err) = open::that(url)
    {
        tracing::warn!("Failed to open {url}: {err}");
    }
}
