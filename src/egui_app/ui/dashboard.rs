use std::f32::consts::TAU;

use super::style;
use super::*;
use crate::egui_app::view_model;
use crate::scan::AnalysisResult;
use eframe::egui::{Pos2, RichText, Sense, Shape, Stroke, load::SizedTexture};

const PREVIEW_MAX_HEIGHT: f32 = 360.0;
const RING_RADIUS: f32 = 70.0;
const RING_THICKNESS: f32 = 20.0;
/// Gap between ring slices, in radians.
const RING_PADDING: f32 = 0.09;
const RING_SEGMENTS: usize = 96;

impl EguiApp {
    pub(super) fn render_dashboard(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let Some((image, result)) = self.controller.session().dashboard() else {
            return;
        };
        let (image, result) = (image.clone(), result.clone());
        let texture = self.texture_for(ctx, &image);
        ui.add_space(20.0);
        ui.columns(2, |columns| {
            render_feed(&mut columns[0], &texture, image.preview().aspect_ratio());
            columns[0].add_space(12.0);
            render_detection_logic(&mut columns[0], &result);
            render_indicators(&mut columns[1], &result);
            columns[1].add_space(12.0);
            render_protocol(&mut columns[1], &result);
            columns[1].add_space(12.0);
            render_certainty(&mut columns[1], &result);
        });
    }
}

fn render_feed(ui: &mut egui::Ui, texture: &TextureHandle, aspect: f32) {
    section_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(muted("SOURCE SATELLITE FEED").strong());
        });
        ui.add_space(8.0);
        let width = ui.available_width();
        let height = (width / aspect.max(0.01)).min(PREVIEW_MAX_HEIGHT);
        let size = egui::vec2(height * aspect, height);
        ui.vertical_centered(|ui| {
            let response = ui.add(
                egui::Image::from_texture(SizedTexture::from_handle(texture))
                    .fit_to_exact_size(size)
                    .corner_radius(CornerRadius::same(8)),
            );
            draw_reticle(ui, response.rect);
        });
    });
}

fn draw_reticle(ui: &egui::Ui, rect: egui::Rect) {
    let accent = style::palette().accent_blue;
    let radius = rect.width().min(rect.height()) * 0.25;
    let painter = ui.painter_at(rect);
    painter.circle_stroke(rect.center(), radius, Stroke::new(1.0, accent.gamma_multiply(0.3)));
    painter.circle_stroke(rect.center(), 6.0, Stroke::new(1.0, accent));
}

fn render_detection_logic(ui: &mut egui::Ui, result: &AnalysisResult) {
    let palette = style::palette();
    section_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(heading("Detection Logic"));
        ui.add_space(6.0);
        ui.label(RichText::new(result.reasoning()).color(palette.text_muted));
        ui.add_space(12.0);
        ui.columns(2, |cols| {
            cols[0].label(muted("STATUS").size(10.0).strong());
            category_badge(&mut cols[0], result);
            cols[1].label(muted("AI CERTAINTY").size(10.0).strong());
            cols[1].label(
                RichText::new(view_model::confidence_percent(result.confidence()))
                    .size(24.0)
                    .strong()
                    .color(Color32::WHITE),
            );
        });
    });
}

fn category_badge(ui: &mut egui::Ui, result: &AnalysisResult) {
    let color = style::category_color(result.category());
    Frame::new()
        .fill(color.gamma_multiply(0.15))
        .stroke(Stroke::new(1.0, color.gamma_multiply(0.6)))
        .corner_radius(CornerRadius::same(12))
        .inner_margin(Margin::symmetric(10, 4))
        .show(ui, |ui| {
            ui.label(
                RichText::new(view_model::category_badge(result.category()))
                    .strong()
                    .color(color),
            );
        });
}

fn render_indicators(ui: &mut egui::Ui, result: &AnalysisResult) {
    let palette = style::palette();
    section_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(heading("Key Indicators"));
        ui.add_space(6.0);
        if result.detected_features().is_empty() {
            ui.label(muted("No indicators reported"));
        }
        for feature in result.detected_features() {
            ui.horizontal_wrapped(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(8.0, 8.0), Sense::hover());
                ui.painter().circle_filled(rect.center(), 4.0, palette.accent_blue);
                ui.label(RichText::new(feature).color(palette.text_primary));
            });
        }
    });
}

fn render_protocol(ui: &mut egui::Ui, result: &AnalysisResult) {
    let palette = style::palette();
    section_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(heading("Incident Protocol").color(palette.danger));
        ui.add_space(6.0);
        Frame::new()
            .fill(palette.danger.gamma_multiply(0.1))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(Margin::same(12))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new(format!("\" {} \"", result.recommended_action()))
                        .italics()
                        .color(palette.danger),
                );
            });
    });
}

fn render_certainty(ui: &mut egui::Ui, result: &AnalysisResult) {
    section_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(heading("Certainty Distribution"));
        let side = RING_RADIUS * 2.0 + RING_THICKNESS + 8.0;
        ui.vertical_centered(|ui| {
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(side, side), Sense::hover());
            let slices = view_model::confidence_slices(result.confidence());
            paint_ring(ui, rect.center(), slices);
            response.on_hover_text(format!(
                "Confidence: {}\nVariance: {}",
                view_model::confidence_percent(f64::from(slices.confidence)),
                view_model::confidence_percent(f64::from(slices.variance)),
            ));
        });
    });
}

fn paint_ring(ui: &egui::Ui, center: Pos2, slices: view_model::ConfidenceSlices) {
    let (confidence_color, variance_color) = style::chart_colors();
    let painter = ui.painter();
    let start = -TAU / 4.0;
    let split = start + slices.confidence * TAU;
    let parts = [
        (start, split, confidence_color),
        (split, start + TAU, variance_color),
    ];
    for (from, to, color) in parts {
        let sweep = to - from;
        if sweep <= 0.0 {
            continue;
        }
        // A single full slice needs no gap.
        let padding = if sweep >= TAU { 0.0 } else { RING_PADDING / 2.0 };
        let points = arc_points(center, RING_RADIUS, from + padding, to - padding);
        if points.len() >= 2 {
            painter.add(Shape::line(points, Stroke::new(RING_THICKNESS, color)));
        }
    }
}

fn arc_points(center: Pos2, radius: f32, from: f32, to: f32) -> Vec<Pos2> {
    if to <= from {
        return Vec::new();
    }
    let steps = (((to - from) / TAU) * RING_SEGMENTS as f32).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|step| {
            let angle = from + (to - from) * step as f32 / steps as f32;
            center + radius * egui::vec2(angle.cos(), angle.sin())
        })
        .collect()
}
