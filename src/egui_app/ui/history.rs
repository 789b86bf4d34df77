use super::style;
use super::*;
use crate::egui_app::view_model;
use crate::scan::ScanId;
use eframe::egui::{RichText, Sense, Stroke, load::SizedTexture};

const CARD_MIN_WIDTH: f32 = 200.0;
const CARD_SPACING: f32 = 16.0;
const THUMB_ASPECT: f32 = 4.0 / 3.0;

struct HistoryCard {
    id: ScanId,
    texture: TextureHandle,
    tag: String,
    tag_color: Color32,
    timestamp: String,
    confidence: String,
}

impl EguiApp {
    /// "Mission Log" grid of past scans; hidden while empty.
    pub(super) fn render_history(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        if self.controller.session().history().is_empty() {
            return;
        }
        let offset = view_model::local_offset();
        let items: Vec<_> = self.controller.session().history().iter().cloned().collect();
        let cards: Vec<HistoryCard> = items
            .iter()
            .map(|item| HistoryCard {
                id: item.id,
                texture: self.texture_for(ctx, &item.image),
                tag: view_model::history_tag(item.result.category()),
                tag_color: style::category_color(item.result.category()),
                timestamp: view_model::format_timestamp(item.timestamp_ms, offset),
                confidence: format!(
                    "Confidence: {}",
                    view_model::confidence_percent(item.result.confidence())
                ),
            })
            .collect();

        ui.add_space(32.0);
        let mut clicked = None;
        let mut clear = false;
        ui.horizontal(|ui| {
            ui.label(heading("Mission Log"));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                clear = ui
                    .button(muted("CLEAR HISTORY").size(11.0))
                    .on_hover_text("Clear History")
                    .clicked();
            });
        });
        ui.add_space(12.0);

        let available = ui.available_width();
        let columns = (((available + CARD_SPACING) / (CARD_MIN_WIDTH + CARD_SPACING)).floor()
            as usize)
            .clamp(1, 4);
        let card_width =
            (available - CARD_SPACING * (columns as f32 - 1.0)) / columns as f32;
        for row in cards.chunks(columns) {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = CARD_SPACING;
                for card in row {
                    if render_card(ui, card, card_width) {
                        clicked = Some(card.id);
                    }
                }
            });
            ui.add_space(CARD_SPACING);
        }

        if let Some(id) = clicked {
            self.controller.select_history_item(id);
            self.scroll_to_top = true;
        }
        if clear {
            self.controller.clear_history();
        }
    }
}

/// Returns true when the card was clicked.
fn render_card(ui: &mut egui::Ui, card: &HistoryCard, width: f32) -> bool {
    let palette = style::palette();
    let inner_width = width - 2.0;
    let response = Frame::new()
        .fill(palette.bg_secondary)
        .stroke(style::card_stroke())
        .corner_radius(CornerRadius::same(12))
        .show(ui, |ui| {
            ui.set_width(inner_width);
            let thumb = egui::vec2(inner_width, inner_width / THUMB_ASPECT);
            let image = ui.add(
                egui::Image::from_texture(SizedTexture::from_handle(&card.texture))
                    .fit_to_exact_size(thumb)
                    .maintain_aspect_ratio(false),
            );
            paint_tag(ui, image.rect, &card.tag, card.tag_color);
            Frame::new().inner_margin(Margin::same(10)).show(ui, |ui| {
                ui.label(RichText::new(&card.timestamp).monospace().size(10.0).color(palette.text_muted));
                ui.label(RichText::new(&card.confidence).strong().color(palette.text_primary));
            });
        })
        .response
        .interact(Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    if response.hovered() {
        ui.painter().rect_stroke(
            response.rect,
            CornerRadius::same(12),
            Stroke::new(1.0, palette.text_muted),
            egui::StrokeKind::Inside,
        );
    }
    response.clicked()
}

fn paint_tag(ui: &egui::Ui, image_rect: egui::Rect, tag: &str, color: Color32) {
    let painter = ui.painter();
    let galley = painter.layout_no_wrap(
        tag.to_string(),
        egui::FontId::proportional(10.0),
        Color32::WHITE,
    );
    let padding = egui::vec2(6.0, 2.0);
    let size = galley.size() + padding * 2.0;
    let min = egui::pos2(image_rect.right() - size.x - 8.0, image_rect.top() + 8.0);
    let rect = egui::Rect::from_min_size(min, size);
    painter.rect_filled(rect, CornerRadius::same(4), color);
    painter.galley(rect.min + padding, galley, Color32::WHITE);
}
