//! Flat replacement for chapter scenes when 3D is unavailable.

use egui::{epaint::Mesh, Align2, Color32, FontId, Painter, Pos2, Rect, Shape};

use super::palette::{lerp_color, Palette};
use crate::scene::color::Rgb;

/// Diagonal (top-left to bottom-right) strength of the chapter tint.
const TINT_START: f32 = 0x40 as f32 / 255.0;
const TINT_END: f32 = 0x20 as f32 / 255.0;

/// Corner colors of the gradient: top-left, top-right, bottom-right,
/// bottom-left.
fn corners(color: Rgb, bg: Color32) -> [Color32; 4] {
    let tint = Color32::from_rgb(color.r, color.g, color.b);
    let start = lerp_color(bg, tint, TINT_START);
    let end = lerp_color(bg, tint, TINT_END);
    let mid = lerp_color(start, end, 0.5);
    [start, mid, end, mid]
}

/// Paint the gradient panel with the chapter title on it.
pub fn paint_fallback(painter: &Painter, rect: Rect, color: Rgb, title: &str, palette: &Palette) {
    let [tl, tr, br, bl] = corners(color, palette.page_bg);
    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), tl);
    mesh.colored_vertex(rect.right_top(), tr);
    mesh.colored_vertex(rect.right_bottom(), br);
    mesh.colored_vertex(rect.left_bottom(), bl);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(Shape::mesh(mesh));

    let center = rect.center();
    painter.text(
        center,
        Align2::CENTER_CENTER,
        title,
        FontId::proportional(28.0),
        palette.heading,
    );
    painter.text(
        Pos2::new(center.x, center.y + 30.0),
        Align2::CENTER_CENTER,
        "2D view: 3D graphics are unavailable here. The content is the same.",
        FontId::proportional(13.0),
        palette.muted,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_fades_along_diagonal() {
        let [tl, tr, br, bl] = corners(Rgb::new(0, 0, 0), Color32::WHITE);
        // Black tint over white: the strong end is darker.
        assert!(tl.r() < br.r());
        assert_eq!(tr, bl);
        assert!(tr.r() > tl.r() && tr.r() < br.r());
    }
}
