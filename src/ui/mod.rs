//! Generic egui UI helper functions shared across pages.
//!
//! Stateless widgets (chapter cards, badges, bullets, section headings) plus
//! small text utilities used throughout the explorer UI.

use eframe::egui;

use human_nature_explorer::render::palette::{self, Palette};
use human_nature_explorer::scene::color::Rgb;
use human_nature_explorer::view::pages::ChapterCard;

/// Characters of a teaser shown on a card.
const CARD_TEASER_CHARS: usize = 140;

// ─── Widgets ──────────────────────────────────────────────────────────────────

/// Render a clickable chapter card. Returns `true` when it was clicked.
pub fn chapter_card(
    ui: &mut egui::Ui,
    card: &ChapterCard<'_>,
    palette: &Palette,
    highlight: Option<&str>,
) -> bool {
    let chapter = card.chapter;
    let accent = palette::rgb(chapter.rgb());
    let frame = egui::Frame::group(ui.style())
        .fill(palette.card_bg)
        .stroke(egui::Stroke::new(1.0, palette.border))
        .inner_margin(egui::Margin::same(12.0));

    let response = frame
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                let (dot, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                ui.painter().circle_filled(dot.center(), 5.0, accent);
                ui.label(
                    egui::RichText::new(format!("{:02}", chapter.order))
                        .monospace()
                        .color(palette.muted),
                );
                let title = maybe_highlight(
                    egui::RichText::new(&chapter.title).size(18.0).strong().color(palette.heading),
                    &chapter.title,
                    highlight,
                );
                ui.label(title);
                if card.visited {
                    ui.label(egui::RichText::new("\u{2713} visited").small().color(palette.muted));
                }
            });
            category_badge(ui, &chapter.category, chapter.rgb());
            let teaser = truncate_str(&chapter.teaser, CARD_TEASER_CHARS);
            ui.label(maybe_highlight(
                egui::RichText::new(&teaser).color(palette.text),
                &chapter.teaser,
                highlight,
            ));
        })
        .response;

    let response = ui
        .interact(response.rect, response.id.with("card"), egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    response.clicked()
}

/// Small pill with the chapter category in its theme color.
pub fn category_badge(ui: &mut egui::Ui, category: &str, color: Rgb) {
    egui::Frame::none()
        .fill(palette::tint(color, 0.15))
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(category).small().color(palette::rgb(color)));
        });
}

/// Section title inside a page.
pub fn section_heading(ui: &mut egui::Ui, text: &str, palette: &Palette) -> egui::Response {
    ui.add_space(16.0);
    let response = ui.label(egui::RichText::new(text).size(22.0).strong().color(palette.heading));
    ui.add_space(6.0);
    response
}

pub fn bullet(ui: &mut egui::Ui, text: &str, highlight: Option<&str>) {
    ui.horizontal_wrapped(|ui| {
        ui.label("  \u{2022}");
        ui.label(maybe_highlight(egui::RichText::new(text), text, highlight));
    });
}

// ─── Text utilities ───────────────────────────────────────────────────────────

/// Truncate `s` to at most `max_chars` Unicode scalar values, appending `"..."` if truncated.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let t: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", t)
    }
}

/// Check if `text` contains the highlight query (case-insensitive).
pub fn text_matches(text: &str, highlight: Option<&str>) -> bool {
    match highlight.map(str::trim) {
        Some(q) if !q.is_empty() => text.to_lowercase().contains(&q.to_lowercase()),
        _ => false,
    }
}

/// Apply a yellow highlight background to `rt` if it matches the search query.
pub fn maybe_highlight(rt: egui::RichText, text: &str, highlight: Option<&str>) -> egui::RichText {
    if text_matches(text, highlight) {
        rt.background_color(egui::Color32::from_rgb(255, 255, 100))
            .color(egui::Color32::BLACK)
    } else {
        rt
    }
}
