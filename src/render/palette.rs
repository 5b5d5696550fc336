//! Light and dark color sets.
//!
//! Palettes are immutable values picked per frame from the shared theme
//! flag; nothing is ever recolored in place.

use egui::Color32;

use crate::scene::color::Rgb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub page_bg: Color32,
    pub card_bg: Color32,
    pub heading: Color32,
    pub text: Color32,
    pub muted: Color32,
    pub link: Color32,
    pub accent: Color32,
    pub border: Color32,
    /// Backdrop behind 3D scenes.
    pub stage_bg: Color32,
    /// Dimming layer behind the deep-dive modal.
    pub scrim: Color32,
}

impl Palette {
    pub const LIGHT: Self = Self {
        page_bg: Color32::from_rgb(0xF5, 0xF5, 0xF7),
        card_bg: Color32::WHITE,
        heading: Color32::from_rgb(0x0A, 0x84, 0xFF),
        text: Color32::from_rgb(0x1C, 0x1C, 0x1E),
        muted: Color32::from_rgb(0x8E, 0x8E, 0x93),
        link: Color32::from_rgb(0x00, 0x71, 0xE3),
        accent: Color32::from_rgb(0xFF, 0x95, 0x00),
        border: Color32::from_rgb(0xE5, 0xE5, 0xEA),
        stage_bg: Color32::from_rgb(0xF5, 0xF2, 0xED),
        scrim: Color32::from_rgba_premultiplied(0, 0, 0, 110),
    };

    pub const DARK: Self = Self {
        page_bg: Color32::from_rgb(0x00, 0x00, 0x00),
        card_bg: Color32::from_rgb(0x1C, 0x1C, 0x1E),
        heading: Color32::from_rgb(0x40, 0x9C, 0xFF),
        text: Color32::from_rgb(0xF5, 0xF5, 0xF7),
        muted: Color32::from_rgb(0x8E, 0x8E, 0x93),
        link: Color32::from_rgb(0x64, 0xB5, 0xFF),
        accent: Color32::from_rgb(0xFF, 0x9F, 0x0A),
        border: Color32::from_rgb(0x2C, 0x2C, 0x2E),
        stage_bg: Color32::from_rgb(0x12, 0x12, 0x16),
        scrim: Color32::from_rgba_premultiplied(0, 0, 0, 160),
    };

    pub fn for_theme(dark: bool) -> &'static Self {
        if dark {
            &Self::DARK
        } else {
            &Self::LIGHT
        }
    }

    pub fn egui_visuals(&self, dark: bool) -> egui::Visuals {
        let mut visuals = if dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        visuals.panel_fill = self.page_bg;
        visuals.window_fill = self.card_bg;
        visuals.extreme_bg_color = self.card_bg;
        visuals.hyperlink_color = self.link;
        visuals.override_text_color = Some(self.text);
        visuals
    }
}

pub fn rgb(c: Rgb) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

/// Chapter color at `alpha` (0.0..=1.0) over whatever is beneath.
pub fn tint(c: Rgb, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

pub fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let m = |a: u8, b: u8| ((a as f32) * (1.0 - t) + (b as f32) * t) as u8;
    Color32::from_rgba_unmultiplied(m(a.r(), b.r()), m(a.g(), b.g()), m(a.b(), b.b()), m(a.a(), b.a()))
}
