//! Perspective painter for chapter scenes.
//!
//! Primitives are tessellated, transformed by the group rotation from the
//! reactor, shaded with one ambient and one directional term, projected
//! through a fixed camera and painted back to front with egui's `Painter`.
//! Solid faces are batched into meshes; wireframe edges are strokes.

use egui::{epaint::Mesh, Color32, Painter, Pos2, Rect, Shape, Stroke};

use super::mesh::TriMesh;
use super::palette::{lerp_color, Palette};
use crate::scene::color::Rgb;
use crate::scene::{MaterialMode, PrimitiveDescriptor};

const CAMERA_DISTANCE: f32 = 5.0;
const FOV_Y_DEG: f32 = 50.0;
const NEAR: f32 = 0.1;
const FOG_NEAR: f32 = 5.0;
const FOG_FAR: f32 = 25.0;
const AMBIENT: f32 = 0.6;
const DIFFUSE: f32 = 0.4;
const WIRE_WIDTH: f32 = 1.0;

/// Per-frame pose of the scene group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScenePose {
    /// Group rotation `[x, y]` in radians.
    pub rotation: [f32; 2],
    /// Camera orbit around the vertical axis, in radians.
    pub orbit: f32,
}

/// Rotate about y, then x (the group's XYZ Euler order).
fn rotate(p: [f32; 3], rotation: [f32; 2]) -> [f32; 3] {
    let (sx, cx) = rotation[0].sin_cos();
    let (sy, cy) = rotation[1].sin_cos();
    let x = p[0] * cy + p[2] * sy;
    let z = -p[0] * sy + p[2] * cy;
    let y = p[1] * cx - z * sx;
    let z = p[1] * sx + z * cx;
    [x, y, z]
}

fn orbit(p: [f32; 3], angle: f32) -> [f32; 3] {
    let (s, c) = (-angle).sin_cos();
    [p[0] * c + p[2] * s, p[1], -p[0] * s + p[2] * c]
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > f32::EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [0.0, 0.0, 1.0]
    }
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Fixed camera on +z looking at the origin.
#[derive(Debug, Clone, Copy)]
struct Camera {
    center: Pos2,
    focal: f32,
}

impl Camera {
    fn for_rect(rect: Rect) -> Self {
        let half_fov = FOV_Y_DEG.to_radians() * 0.5;
        Self {
            center: rect.center(),
            focal: rect.height() * 0.5 / half_fov.tan(),
        }
    }

    /// Screen position and view distance, `None` behind the near plane.
    fn project(&self, p: [f32; 3]) -> Option<(Pos2, f32)> {
        let dist = CAMERA_DISTANCE - p[2];
        if dist < NEAR {
            return None;
        }
        let k = self.focal / dist;
        Some((
            Pos2::new(self.center.x + p[0] * k, self.center.y - p[1] * k),
            dist,
        ))
    }
}

enum DrawItem {
    Face([Pos2; 3], Color32),
    Edge([Pos2; 2], Color32),
}

/// Blend toward the stage color with distance. Works on opaque channels so
/// the material's opacity is applied once, afterwards.
fn fogged(c: Rgb, dist: f32, fog: Color32) -> Rgb {
    let t = ((dist - FOG_NEAR) / (FOG_FAR - FOG_NEAR)).clamp(0.0, 1.0);
    if t <= 0.0 {
        return c;
    }
    let mixed = lerp_color(Color32::from_rgb(c.r, c.g, c.b), fog, t);
    Rgb::new(mixed.r(), mixed.g(), mixed.b())
}

fn with_opacity(c: Rgb, opacity: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, (opacity.clamp(0.0, 1.0) * 255.0) as u8)
}

/// Paint `primitives` into `rect`.
pub fn paint_scene(
    painter: &Painter,
    rect: Rect,
    primitives: &[PrimitiveDescriptor],
    pose: ScenePose,
    palette: &Palette,
) {
    painter.rect_filled(rect, 0.0, palette.stage_bg);

    let camera = Camera::for_rect(rect);
    let light = normalize([1.0, 1.0, 1.0]);
    let mut items: Vec<(f32, DrawItem)> = Vec::new();

    for prim in primitives {
        let mesh = TriMesh::for_shape(&prim.shape);
        // World space: offset inside the group, then the group rotation.
        let world: Vec<[f32; 3]> = mesh
            .vertices
            .iter()
            .map(|v| {
                let local = [
                    v[0] + prim.position[0],
                    v[1] + prim.position[1],
                    v[2] + prim.position[2],
                ];
                rotate(local, pose.rotation)
            })
            .collect();
        let projected: Vec<Option<(Pos2, f32)>> = world
            .iter()
            .map(|&p| camera.project(orbit(p, pose.orbit)))
            .collect();
        let opacity = prim.material.effective_opacity();

        match prim.material.mode {
            MaterialMode::Solid => {
                let emissive = prim.color.scaled(prim.material.emissive.unwrap_or(0.0));
                for &[a, b, c] in &mesh.triangles {
                    let (Some(pa), Some(pb), Some(pc)) = (
                        projected[a as usize],
                        projected[b as usize],
                        projected[c as usize],
                    ) else {
                        continue;
                    };
                    let [wa, wb, wc] = [world[a as usize], world[b as usize], world[c as usize]];
                    let n = normalize(cross(sub(wb, wa), sub(wc, wa)));
                    let shade = AMBIENT + DIFFUSE * dot(n, light).abs();
                    let lit = prim.color.scaled(shade).saturating_add(emissive);
                    let depth = (pa.1 + pb.1 + pc.1) / 3.0;
                    let color = with_opacity(fogged(lit, depth, palette.stage_bg), opacity);
                    items.push((depth, DrawItem::Face([pa.0, pb.0, pc.0], color)));
                }
            }
            MaterialMode::Wireframe => {
                let base = prim.lit_color();
                for [a, b] in mesh.edges() {
                    let (Some(pa), Some(pb)) = (projected[a as usize], projected[b as usize]) else {
                        continue;
                    };
                    let depth = (pa.1 + pb.1) * 0.5;
                    let color = with_opacity(fogged(base, depth, palette.stage_bg), opacity);
                    items.push((depth, DrawItem::Edge([pa.0, pb.0], color)));
                }
            }
        }
    }

    // Far to near.
    items.sort_by(|a, b| b.0.total_cmp(&a.0));

    let clipped = painter.with_clip_rect(rect);
    let mut batch = Mesh::default();
    for (_, item) in items {
        match item {
            DrawItem::Face(points, color) => {
                let base = batch.vertices.len() as u32;
                for p in points {
                    batch.colored_vertex(p, color);
                }
                batch.add_triangle(base, base + 1, base + 2);
            }
            DrawItem::Edge(points, color) => {
                if !batch.is_empty() {
                    clipped.add(Shape::mesh(std::mem::take(&mut batch)));
                }
                clipped.line_segment(points, Stroke::new(WIRE_WIDTH, color));
            }
        }
    }
    if !batch.is_empty() {
        clipped.add(Shape::mesh(batch));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn zero_rotation_is_identity() {
        let p = [1.0, 2.0, 3.0];
        assert!(close(rotate(p, [0.0, 0.0]), p));
        assert!(close(orbit(p, 0.0), p));
    }

    #[test]
    fn quarter_turns() {
        let half_pi = std::f32::consts::FRAC_PI_2;
        // About y: +x goes to -z
        assert!(close(rotate([1.0, 0.0, 0.0], [0.0, half_pi]), [0.0, 0.0, -1.0]));
        // About x: +y goes to +z
        assert!(close(rotate([0.0, 1.0, 0.0], [half_pi, 0.0]), [0.0, 0.0, 1.0]));
    }

    #[test]
    fn origin_projects_to_center() {
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(400.0, 300.0));
        let cam = Camera::for_rect(rect);
        let (pos, dist) = cam.project([0.0, 0.0, 0.0]).unwrap();
        assert_eq!(pos, rect.center());
        assert!((dist - CAMERA_DISTANCE).abs() < 1e-6);
        // Up in the scene is up on screen.
        assert!(cam.project([0.0, 1.0, 0.0]).unwrap().0.y < pos.y);
        // Behind the camera is culled.
        assert!(cam.project([0.0, 0.0, 6.0]).is_none());
    }

    #[test]
    fn fog_fades_with_distance() {
        let c = Rgb::new(200, 0, 0);
        assert_eq!(fogged(c, 1.0, Color32::WHITE), c);
        assert_eq!(fogged(c, FOG_FAR, Color32::WHITE), Rgb::new(255, 255, 255));
        let mid = fogged(c, (FOG_NEAR + FOG_FAR) * 0.5, Color32::WHITE);
        assert!(mid.g > 100 && mid.g < 150);
    }
}
