//! Per-chapter 3D scene selection.
//!
//! Each chapter is a visual metaphor authored as a handful of primitives:
//! a pulsing core with orbiting satellites for emotions, nested translucent
//! shells for biases, ascending steps for motivation, and so on. The table
//! is declarative; `ChapterKind` makes the lookup total, with `Unknown`
//! carrying the default composition.

pub mod color;

use std::f32::consts::TAU;

use crate::content::Catalog;
use color::Rgb;

/// Geometry of one primitive. Dimensions are in scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Cube { edge: f32 },
    Icosahedron { radius: f32, detail: u8 },
    Torus { radius: f32, tube: f32 },
    Cylinder { radius: f32, height: f32 },
    Octahedron { radius: f32, detail: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Sphere,
    Cube,
    Icosahedron,
    Torus,
    Cylinder,
    Octahedron,
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Sphere { .. } => ShapeKind::Sphere,
            Shape::Cube { .. } => ShapeKind::Cube,
            Shape::Icosahedron { .. } => ShapeKind::Icosahedron,
            Shape::Torus { .. } => ShapeKind::Torus,
            Shape::Cylinder { .. } => ShapeKind::Cylinder,
            Shape::Octahedron { .. } => ShapeKind::Octahedron,
        }
    }

    /// Radius of a sphere enclosing the shape.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Shape::Sphere { radius } => radius,
            Shape::Cube { edge } => edge * 0.5 * 3f32.sqrt(),
            Shape::Icosahedron { radius, .. } | Shape::Octahedron { radius, .. } => radius,
            Shape::Torus { radius, tube } => radius + tube,
            Shape::Cylinder { radius, height } => (radius * radius + height * height * 0.25).sqrt(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialMode {
    Solid,
    Wireframe,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub mode: MaterialMode,
    /// Emissive glow as a fraction of the base color.
    pub emissive: Option<f32>,
    /// Translucency; `None` is fully opaque.
    pub opacity: Option<f32>,
}

impl Material {
    pub const SOLID: Self = Self {
        mode: MaterialMode::Solid,
        emissive: None,
        opacity: None,
    };
    pub const WIREFRAME: Self = Self {
        mode: MaterialMode::Wireframe,
        emissive: None,
        opacity: None,
    };

    pub fn glowing(self, emissive: f32) -> Self {
        Self {
            emissive: (emissive > 0.0).then_some(emissive),
            ..self
        }
    }

    pub fn translucent(self, opacity: f32) -> Self {
        Self {
            opacity: (opacity < 1.0).then_some(opacity.clamp(0.0, 1.0)),
            ..self
        }
    }

    pub fn effective_opacity(&self) -> f32 {
        self.opacity.unwrap_or(1.0)
    }
}

/// Declarative description of one 3D shape in a chapter scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveDescriptor {
    pub shape: Shape,
    pub position: [f32; 3],
    pub material: Material,
    pub color: Rgb,
}

impl PrimitiveDescriptor {
    fn new(shape: Shape, position: [f32; 3], material: Material, color: Rgb) -> Self {
        Self {
            shape,
            position,
            material,
            color,
        }
    }

    /// Base color plus the emissive contribution.
    pub fn lit_color(&self) -> Rgb {
        match self.material.emissive {
            Some(e) => self.color.saturating_add(self.color.scaled(e)),
            None => self.color,
        }
    }
}

/// Chapters with an authored scene, plus the fallback composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChapterKind {
    Emotions,
    Biases,
    SocialRoles,
    Attachment,
    Motivation,
    Memory,
    Fear,
    Empathy,
    Unknown,
}

impl ChapterKind {
    pub fn from_id(id: &str) -> Self {
        match id {
            "emotions" => ChapterKind::Emotions,
            "biases" => ChapterKind::Biases,
            "social-roles" => ChapterKind::SocialRoles,
            "attachment" => ChapterKind::Attachment,
            "motivation" => ChapterKind::Motivation,
            "memory" => ChapterKind::Memory,
            "fear" => ChapterKind::Fear,
            "empathy" => ChapterKind::Empathy,
            _ => ChapterKind::Unknown,
        }
    }

    /// The authored primitive set, tinted with `c`.
    pub fn primitives(self, c: Rgb) -> Vec<PrimitiveDescriptor> {
        use Shape::*;
        let solid = Material::SOLID;
        let wire = Material::WIREFRAME;
        let p = PrimitiveDescriptor::new;

        match self {
            // Pulsing core with orbiting satellites
            ChapterKind::Emotions => {
                let mut v = vec![p(
                    Icosahedron { radius: 1.5, detail: 4 },
                    [0.0, 0.0, 0.0],
                    solid.glowing(0.5),
                    c,
                )];
                v.extend((0..4).map(|i| {
                    let a = i as f32 / 4.0 * TAU;
                    p(Sphere { radius: 0.4 }, [a.cos() * 3.0, a.sin() * 3.0, 0.0], wire, c)
                }));
                v
            }
            // Nested translucent shells around a solid core
            ChapterKind::Biases => {
                let mut v: Vec<_> = [0.8, 1.5, 2.2]
                    .iter()
                    .enumerate()
                    .map(|(i, &edge)| {
                        p(
                            Cube { edge },
                            [0.0, 0.0, 0.0],
                            wire.translucent(1.0 - i as f32 * 0.2),
                            c,
                        )
                    })
                    .collect();
                v.push(p(Cube { edge: 0.5 }, [0.0, 0.0, 0.0], solid, c));
                v
            }
            // A ring of roles
            ChapterKind::SocialRoles => (0..6)
                .map(|i| {
                    let a = i as f32 / 6.0 * TAU;
                    p(
                        Sphere { radius: 0.6 },
                        [a.cos() * 2.0, a.sin() * 2.0, 0.0],
                        solid.glowing(0.3),
                        c,
                    )
                })
                .collect(),
            // Two bodies and the bond between them
            ChapterKind::Attachment => vec![
                p(Sphere { radius: 0.8 }, [-1.5, 0.0, 0.0], solid, c),
                p(Sphere { radius: 0.8 }, [1.5, 0.0, 0.0], solid, c),
                p(Cylinder { radius: 0.1, height: 3.0 }, [0.0, 0.0, 0.0], wire, c),
            ],
            // Ascending, increasingly bright steps
            ChapterKind::Motivation => (0..4)
                .map(|i| {
                    let i = i as f32;
                    p(
                        Cube { edge: 0.8 },
                        [-1.5 + i, -1.5 + i * 0.8, 0.0],
                        solid.glowing(i * 0.2),
                        c,
                    )
                })
                .collect(),
            // Interwoven lattices
            ChapterKind::Memory => vec![
                p(Icosahedron { radius: 1.2, detail: 3 }, [0.0, 0.0, 0.0], wire, c),
                p(
                    Octahedron { radius: 2.0, detail: 1 },
                    [0.0, 0.0, 0.0],
                    wire.translucent(0.5),
                    c,
                ),
            ],
            // Radiating, fading alarm shells
            ChapterKind::Fear => (0..5)
                .map(|i| {
                    let i = i as f32;
                    p(
                        Sphere { radius: 0.5 + i * 0.4 },
                        [0.0, 0.0, 0.0],
                        wire.translucent(1.0 - i * 0.15),
                        c,
                    )
                })
                .collect(),
            // Interlocking rings around a shared centre
            ChapterKind::Empathy => vec![
                p(Torus { radius: 1.0, tube: 0.3 }, [-0.8, 0.0, 0.0], solid, c),
                p(Torus { radius: 1.0, tube: 0.3 }, [0.8, 0.0, 0.0], solid, c),
                p(Sphere { radius: 0.5 }, [0.0, 0.0, 0.0], solid, c),
            ],
            ChapterKind::Unknown => vec![
                p(Cube { edge: 2.0 }, [0.0, 0.0, 0.0], solid, c),
                p(Sphere { radius: 1.0 }, [3.0, 0.0, 0.0], solid, c),
            ],
        }
    }
}

/// Primitive set for a chapter id, tinted with the chapter's theme color.
///
/// Unknown ids get the default composition in the fallback color; the result
/// is never empty.
pub fn select_scene(catalog: &Catalog, chapter_id: &str) -> Vec<PrimitiveDescriptor> {
    let color = catalog
        .get(chapter_id)
        .map(|c| c.rgb())
        .unwrap_or(Rgb::FALLBACK);
    let kind = ChapterKind::from_id(chapter_id);
    if kind == ChapterKind::Unknown {
        log::debug!("no authored scene for `{}`, using default", chapter_id);
    }
    kind.primitives(color)
}
