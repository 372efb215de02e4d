//! dark theme with the faucet's cyan accent

use eframe::egui::{self, Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Vec2};

pub struct Palette {
    pub bg: Color32,
    pub surface: Color32,
    pub border: Color32,
    pub text: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub accent_pressed: Color32,
    pub success: Color32,
    pub error: Color32,
}

pub const PALETTE: Palette = Palette {
    bg: Color32::from_rgb(18, 20, 26),
    surface: Color32::from_rgb(30, 33, 42),
    border: Color32::from_rgb(52, 56, 68),
    text: Color32::from_rgb(232, 236, 242),
    text_muted: Color32::from_rgb(150, 156, 170),
    accent: Color32::from_rgb(0, 210, 255),
    accent_pressed: Color32::from_rgb(0, 153, 204),
    success: Color32::from_rgb(120, 200, 140),
    error: Color32::from_rgb(220, 100, 100),
};

const TEXT_SIZES: [(TextStyle, f32, FontFamily); 5] = [
    (TextStyle::Heading, 30.0, FontFamily::Proportional),
    (TextStyle::Body, 14.0, FontFamily::Proportional),
    (TextStyle::Monospace, 13.0, FontFamily::Monospace),
    (TextStyle::Button, 15.0, FontFamily::Proportional),
    (TextStyle::Small, 11.0, FontFamily::Proportional),
];

/// install fonts and visuals on a fresh context
pub fn apply(ctx: &egui::Context) {
    let p = &PALETTE;
    let mut style = (*ctx.style()).clone();

    // roomy form, wide amount slider
    let spacing = &mut style.spacing;
    spacing.item_spacing = Vec2::new(10.0, 10.0);
    spacing.window_margin = egui::Margin::same(24.0);
    spacing.button_padding = Vec2::new(18.0, 8.0);
    spacing.slider_width = 420.0;
    spacing.interact_size = Vec2::new(40.0, 28.0);

    let visuals = &mut style.visuals;
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_fill = p.surface;
    visuals.panel_fill = p.bg;
    visuals.extreme_bg_color = Color32::from_rgb(12, 14, 18);
    visuals.override_text_color = Some(p.text);
    visuals.selection.bg_fill = p.accent.linear_multiply(0.4);

    // (state, fill, stroke width, stroke color)
    let widgets = &mut visuals.widgets;
    for (state, fill, width, stroke) in [
        (&mut widgets.noninteractive, p.surface, 1.0, p.border),
        (&mut widgets.inactive, p.surface, 1.0, p.border),
        (&mut widgets.hovered, p.accent_pressed.linear_multiply(0.4), 1.5, p.accent),
        (&mut widgets.active, p.accent_pressed, 1.5, p.accent_pressed),
    ] {
        state.rounding = Rounding::same(6.0);
        state.bg_fill = fill;
        state.bg_stroke = Stroke::new(width, stroke);
    }
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, p.text_muted);

    style.text_styles = TEXT_SIZES
        .into_iter()
        .map(|(text_style, size, family)| (text_style, FontId::new(size, family)))
        .collect();

    // phosphor glyphs as fallback for icons
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Bold);

    ctx.set_fonts(fonts);
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_installs_palette() {
        let ctx = egui::Context::default();
        apply(&ctx);

        let style = ctx.style();
        assert_eq!(style.visuals.panel_fill, PALETTE.bg);
        assert_eq!(style.visuals.widgets.hovered.bg_stroke.color, PALETTE.accent);
        assert_eq!(style.spacing.slider_width, 420.0);
        assert_eq!(
            style.text_styles.get(&TextStyle::Heading).map(|f| f.size),
            Some(30.0)
        );
    }
}
