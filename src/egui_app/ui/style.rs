use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

use crate::scan::DisasterCategory;

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent_blue: Color32,
    pub danger: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(2, 6, 23),
        bg_secondary: Color32::from_rgb(15, 23, 42),
        bg_tertiary: Color32::from_rgb(30, 41, 59),
        panel_outline: Color32::from_rgb(51, 65, 85),
        text_primary: Color32::from_rgb(226, 232, 240),
        text_muted: Color32::from_rgb(148, 163, 184),
        accent_blue: Color32::from_rgb(59, 130, 246),
        danger: Color32::from_rgb(239, 68, 68),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_primary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent_blue;
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = palette.danger;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_blue);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_rounded(&mut visuals.widgets.inactive, palette);
    set_rounded(&mut visuals.widgets.hovered, palette);
    set_rounded(&mut visuals.widgets.active, palette);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, palette.accent_blue);
    visuals.window_corner_radius = CornerRadius::same(12);
    visuals.popup_shadow = Shadow::NONE;
}

fn set_rounded(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::same(8);
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.bg_tertiary;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

/// Accent color for each classification.
pub fn category_color(category: DisasterCategory) -> Color32 {
    match category {
        DisasterCategory::ForestFire => Color32::from_rgb(239, 68, 68),
        DisasterCategory::Tsunami => Color32::from_rgb(59, 130, 246),
        DisasterCategory::Normal => Color32::from_rgb(16, 185, 129),
        DisasterCategory::Unknown => Color32::from_rgb(100, 116, 139),
    }
}

/// Ring chart colors: confidence, then remainder.
pub fn chart_colors() -> (Color32, Color32) {
    (Color32::from_rgb(59, 130, 246), Color32::from_rgb(30, 41, 59))
}

pub fn card_stroke() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}
