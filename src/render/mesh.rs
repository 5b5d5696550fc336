//! Triangle meshes for scene primitives, in object space.
//!
//! Tessellation is coarse on purpose: a chapter scene has at most a handful
//! of shapes and they are painted on the CPU every frame.

use std::f32::consts::{PI, TAU};

use crate::scene::Shape;

const SPHERE_SEGMENTS: u32 = 16;
const SPHERE_RINGS: u32 = 12;
const TORUS_RADIAL: u32 = 10;
const TORUS_TUBULAR: u32 = 28;
const CYLINDER_SEGMENTS: u32 = 16;
/// Subdivision levels beyond this add nothing visible at panel size.
const MAX_DETAIL: u8 = 2;

#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriMesh {
    pub fn for_shape(shape: &Shape) -> Self {
        match *shape {
            Shape::Sphere { radius } => uv_sphere(radius),
            Shape::Cube { edge } => cube(edge),
            Shape::Icosahedron { radius, detail } => {
                subdivided(icosahedron(), radius, detail.min(MAX_DETAIL))
            }
            Shape::Octahedron { radius, detail } => {
                subdivided(octahedron(), radius, detail.min(MAX_DETAIL))
            }
            Shape::Torus { radius, tube } => torus(radius, tube),
            Shape::Cylinder { radius, height } => cylinder(radius, height),
        }
    }

    /// Unique undirected edges, for wireframe drawing.
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let mut edges: Vec<[u32; 2]> = self
            .triangles
            .iter()
            .flat_map(|&[a, b, c]| [[a, b], [b, c], [c, a]])
            .map(|[a, b]| if a < b { [a, b] } else { [b, a] })
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }
}

fn uv_sphere(radius: f32) -> TriMesh {
    let mut mesh = TriMesh::default();
    for ring in 0..=SPHERE_RINGS {
        let theta = ring as f32 / SPHERE_RINGS as f32 * PI;
        for seg in 0..=SPHERE_SEGMENTS {
            let phi = seg as f32 / SPHERE_SEGMENTS as f32 * TAU;
            mesh.vertices.push([
                radius * theta.sin() * phi.cos(),
                radius * theta.cos(),
                radius * theta.sin() * phi.sin(),
            ]);
        }
    }
    let row = SPHERE_SEGMENTS + 1;
    for ring in 0..SPHERE_RINGS {
        for seg in 0..SPHERE_SEGMENTS {
            let a = ring * row + seg;
            let b = a + row;
            if ring != 0 {
                mesh.triangles.push([a, b, a + 1]);
            }
            if ring != SPHERE_RINGS - 1 {
                mesh.triangles.push([a + 1, b, b + 1]);
            }
        }
    }
    mesh
}

fn cube(edge: f32) -> TriMesh {
    let h = edge * 0.5;
    let vertices = (0..8)
        .map(|i| {
            let s = |bit: u32| if i & bit != 0 { h } else { -h };
            [s(1), s(2), s(4)]
        })
        .collect();
    // Two triangles per face; vertex index bits are x=1, y=2, z=4.
    let triangles = vec![
        [0, 2, 3], [0, 3, 1], // z-
        [4, 5, 7], [4, 7, 6], // z+
        [0, 1, 5], [0, 5, 4], // y-
        [2, 6, 7], [2, 7, 3], // y+
        [0, 4, 6], [0, 6, 2], // x-
        [1, 3, 7], [1, 7, 5], // x+
    ];
    TriMesh { vertices, triangles }
}

fn icosahedron() -> TriMesh {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let vertices = vec![
        [-1.0, t, 0.0], [1.0, t, 0.0], [-1.0, -t, 0.0], [1.0, -t, 0.0],
        [0.0, -1.0, t], [0.0, 1.0, t], [0.0, -1.0, -t], [0.0, 1.0, -t],
        [t, 0.0, -1.0], [t, 0.0, 1.0], [-t, 0.0, -1.0], [-t, 0.0, 1.0],
    ];
    let triangles = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];
    TriMesh { vertices, triangles }
}

fn octahedron() -> TriMesh {
    let vertices = vec![
        [1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, -1.0],
    ];
    let triangles = vec![
        [0, 2, 4], [0, 4, 3], [0, 3, 5], [0, 5, 2],
        [1, 2, 5], [1, 5, 3], [1, 3, 4], [1, 4, 2],
    ];
    TriMesh { vertices, triangles }
}

/// Split every triangle into four `detail` times, then push all vertices
/// onto the sphere of `radius`.
fn subdivided(mut mesh: TriMesh, radius: f32, detail: u8) -> TriMesh {
    for _ in 0..detail {
        let mut triangles = Vec::with_capacity(mesh.triangles.len() * 4);
        let mut midpoints = std::collections::HashMap::new();
        let mut midpoint = |a: u32, b: u32, vertices: &mut Vec<[f32; 3]>| -> u32 {
            let key = if a < b { (a, b) } else { (b, a) };
            *midpoints.entry(key).or_insert_with(|| {
                let (va, vb) = (vertices[a as usize], vertices[b as usize]);
                vertices.push([
                    (va[0] + vb[0]) * 0.5,
                    (va[1] + vb[1]) * 0.5,
                    (va[2] + vb[2]) * 0.5,
                ]);
                (vertices.len() - 1) as u32
            })
        };
        for &[a, b, c] in &mesh.triangles {
            let ab = midpoint(a, b, &mut mesh.vertices);
            let bc = midpoint(b, c, &mut mesh.vertices);
            let ca = midpoint(c, a, &mut mesh.vertices);
            triangles.extend([[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        mesh.triangles = triangles;
    }
    for v in &mut mesh.vertices {
        let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if len > 0.0 {
            let k = radius / len;
            *v = [v[0] * k, v[1] * k, v[2] * k];
        }
    }
    mesh
}

fn torus(radius: f32, tube: f32) -> TriMesh {
    let mut mesh = TriMesh::default();
    for j in 0..TORUS_RADIAL {
        let v = j as f32 / TORUS_RADIAL as f32 * TAU;
        for i in 0..TORUS_TUBULAR {
            let u = i as f32 / TORUS_TUBULAR as f32 * TAU;
            let r = radius + tube * v.cos();
            mesh.vertices.push([r * u.cos(), r * u.sin(), tube * v.sin()]);
        }
    }
    for j in 0..TORUS_RADIAL {
        let jn = (j + 1) % TORUS_RADIAL;
        for i in 0..TORUS_TUBULAR {
            let inext = (i + 1) % TORUS_TUBULAR;
            let a = j * TORUS_TUBULAR + i;
            let b = jn * TORUS_TUBULAR + i;
            let c = jn * TORUS_TUBULAR + inext;
            let d = j * TORUS_TUBULAR + inext;
            mesh.triangles.push([a, b, d]);
            mesh.triangles.push([b, c, d]);
        }
    }
    mesh
}

/// Closed cylinder along y, centred on the origin.
fn cylinder(radius: f32, height: f32) -> TriMesh {
    let mut mesh = TriMesh::default();
    let h = height * 0.5;
    for y in [-h, h] {
        for s in 0..CYLINDER_SEGMENTS {
            let a = s as f32 / CYLINDER_SEGMENTS as f32 * TAU;
            mesh.vertices.push([radius * a.cos(), y, radius * a.sin()]);
        }
    }
    let bottom_center = mesh.vertices.len() as u32;
    mesh.vertices.push([0.0, -h, 0.0]);
    let top_center = bottom_center + 1;
    mesh.vertices.push([0.0, h, 0.0]);

    let n = CYLINDER_SEGMENTS;
    for s in 0..n {
        let next = (s + 1) % n;
        mesh.triangles.push([s, n + s, next]);
        mesh.triangles.push([next, n + s, n + next]);
        mesh.triangles.push([bottom_center, s, next]);
        mesh.triangles.push([top_center, n + next, n + s]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_extent(mesh: &TriMesh) -> f32 {
        mesh.vertices
            .iter()
            .map(|v| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt())
            .fold(0.0, f32::max)
    }

    fn indices_in_range(mesh: &TriMesh) -> bool {
        let n = mesh.vertices.len() as u32;
        mesh.triangles.iter().flatten().all(|&i| i < n)
    }

    #[test]
    fn cube_has_twelve_triangles_and_eighteen_edges() {
        let mesh = TriMesh::for_shape(&Shape::Cube { edge: 2.0 });
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangles.len(), 12);
        // 12 cube edges plus one diagonal per face
        assert_eq!(mesh.edges().len(), 18);
        assert!((max_extent(&mesh) - 3f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn base_polyhedra() {
        let ico = TriMesh::for_shape(&Shape::Icosahedron { radius: 1.0, detail: 0 });
        assert_eq!((ico.vertices.len(), ico.triangles.len(), ico.edges().len()), (12, 20, 30));
        let octa = TriMesh::for_shape(&Shape::Octahedron { radius: 2.0, detail: 0 });
        assert_eq!((octa.vertices.len(), octa.triangles.len(), octa.edges().len()), (6, 8, 12));
        assert!((max_extent(&octa) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn subdivision_stays_on_sphere() {
        let mesh = TriMesh::for_shape(&Shape::Icosahedron { radius: 1.5, detail: 4 });
        // Capped at two levels: 20 * 4^2
        assert_eq!(mesh.triangles.len(), 320);
        // Shared midpoints: V - E + F = 2
        assert_eq!(mesh.vertices.len() as i64 - mesh.edges().len() as i64 + 320, 2);
        for v in &mesh.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((r - 1.5).abs() < 1e-4);
        }
    }

    #[test]
    fn all_shapes_are_well_formed() {
        let shapes = [
            Shape::Sphere { radius: 0.4 },
            Shape::Torus { radius: 1.0, tube: 0.3 },
            Shape::Cylinder { radius: 0.1, height: 3.0 },
            Shape::Octahedron { radius: 2.0, detail: 1 },
        ];
        for shape in &shapes {
            let mesh = TriMesh::for_shape(shape);
            assert!(!mesh.triangles.is_empty(), "{:?}", shape);
            assert!(indices_in_range(&mesh), "{:?}", shape);
            assert!(max_extent(&mesh) <= shape.bounding_radius() + 1e-4, "{:?}", shape);
        }
    }
}
