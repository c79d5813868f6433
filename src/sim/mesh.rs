//! Polygon mesh: local outline, world-space copy, triangles and bounds

use glam::Vec2;

use super::aabb::Aabb;
use super::collision::SatPolygon;
use super::triangulate::{Triangle, triangulate};
use crate::math::{Affine2D, edge_normals_into, signed_area_x2};

/// Default fill colour (RGBA)
pub const DEFAULT_COLOR: [f32; 4] = [0.85, 0.85, 0.9, 1.0];

/// A simple polygon with cached world-space geometry.
///
/// Topology (the triangle list) is fixed at construction; transforms only move
/// vertices. The world buffer and AABB are rewritten by every
/// [`apply_transform`](Self::apply_transform).
#[derive(Debug, Clone)]
pub struct Polygon2DMesh {
    local: Vec<Vec2>,
    world: Vec<Vec2>,
    /// Outward edge normals of the world outline (kept only for convex outlines)
    world_normals: Vec<Vec2>,
    triangles: Vec<Triangle>,
    aabb: Aabb,
    convex: bool,
    pub color: [f32; 4],
}

impl Polygon2DMesh {
    pub fn new(outline: Vec<Vec2>) -> Self {
        let triangles = triangulate(&outline);
        if triangles.is_empty() {
            log::warn!(
                "mesh with {} vertices has no triangles; it will not be drawn",
                outline.len()
            );
        }
        let convex = is_convex_outline(&outline);
        let world_normals = if convex {
            vec![Vec2::ZERO; outline.len()]
        } else {
            Vec::new()
        };

        let mut mesh = Self {
            world: outline.clone(),
            local: outline,
            world_normals,
            triangles,
            aabb: Aabb::EMPTY,
            convex,
            color: DEFAULT_COLOR,
        };
        mesh.apply_transform(&Affine2D::IDENTITY);
        mesh
    }

    /// Build from a flat `[x0, y0, x1, y1, ...]` sequence
    pub fn from_flat(coords: &[f32]) -> Self {
        Self::new(
            coords
                .chunks_exact(2)
                .map(|c| Vec2::new(c[0], c[1]))
                .collect(),
        )
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Transform every local vertex into the world buffer and recompute a tight AABB
    pub fn apply_transform(&mut self, transform: &Affine2D) {
        self.aabb.reset();
        for (dst, &src) in self.world.iter_mut().zip(&self.local) {
            *dst = transform.transform_point(src);
            self.aabb.include(*dst);
        }
        if self.convex {
            edge_normals_into(&self.world, &mut self.world_normals);
        }
    }

    #[inline]
    pub fn local_vertices(&self) -> &[Vec2] {
        &self.local
    }

    #[inline]
    pub fn world_vertices(&self) -> &[Vec2] {
        &self.world
    }

    /// Outward world-space edge normals; empty for concave outlines
    #[inline]
    pub fn world_normals(&self) -> &[Vec2] {
        &self.world_normals
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    #[inline]
    pub fn is_convex(&self) -> bool {
        self.convex
    }

    /// Has at least one triangle to draw
    #[inline]
    pub fn is_renderable(&self) -> bool {
        !self.triangles.is_empty()
    }

    /// World-space vertices of one triangle
    pub fn world_triangle(&self, triangle: &Triangle) -> [Vec2; 3] {
        triangle.map(|i| self.world[i as usize])
    }

    /// Convex world-space pieces for SAT: the outline itself when convex,
    /// otherwise one piece per triangle
    pub fn convex_pieces(&self) -> impl Iterator<Item = ConvexPiece<'_>> + '_ {
        let outline = self.convex.then(|| ConvexPiece::Outline {
            points: &self.world,
            normals: &self.world_normals,
        });
        let triangles = if self.convex {
            &self.triangles[..0]
        } else {
            &self.triangles[..]
        };
        outline.into_iter().chain(
            triangles
                .iter()
                .map(|t| ConvexPiece::triangle(self.world_triangle(t))),
        )
    }

    /// Point-in-mesh test against the world-space triangles
    pub fn contains(&self, p: Vec2) -> bool {
        if !self.aabb.contains(p) {
            return false;
        }
        self.triangles.iter().any(|t| {
            let [a, b, c] = self.world_triangle(t);
            let d1 = (b - a).perp_dot(p - a);
            let d2 = (c - b).perp_dot(p - b);
            let d3 = (a - c).perp_dot(p - c);
            let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
            let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
            !(has_neg && has_pos)
        })
    }
}

/// A convex part of a mesh in world space
#[derive(Debug, Clone, Copy)]
pub enum ConvexPiece<'a> {
    Outline {
        points: &'a [Vec2],
        normals: &'a [Vec2],
    },
    Triangle {
        points: [Vec2; 3],
        normals: [Vec2; 3],
    },
}

impl ConvexPiece<'_> {
    fn triangle(points: [Vec2; 3]) -> Self {
        let mut normals = [Vec2::ZERO; 3];
        edge_normals_into(&points, &mut normals);
        ConvexPiece::Triangle { points, normals }
    }

    pub fn as_sat(&self) -> SatPolygon<'_> {
        match self {
            ConvexPiece::Outline { points, normals } => SatPolygon::world(points, normals),
            ConvexPiece::Triangle { points, normals } => SatPolygon::world(points, normals),
        }
    }
}

/// Every corner turns the same way as the outline's overall winding
fn is_convex_outline(points: &[Vec2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let winding = signed_area_x2(points);
    if winding == 0.0 {
        return false;
    }
    (0..n).all(|i| {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        (b - a).perp_dot(c - b) * winding >= 0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Pose2D;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ]
    }

    #[test]
    fn test_construction_triangulates_once() {
        let mut mesh = Polygon2DMesh::new(square());
        let before = mesh.triangles().to_vec();
        assert_eq!(before.len(), 2);
        let t = Affine2D::IDENTITY.translate(Vec2::new(5.0, 5.0)).rotate(0.5);
        mesh.apply_transform(&t);
        assert_eq!(mesh.triangles(), &before[..]);
        assert!(mesh.is_convex());
    }

    #[test]
    fn test_aabb_contains_every_vertex() {
        let mut mesh = Polygon2DMesh::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 3.0),
            Vec2::new(0.0, 3.0),
        ]);
        assert!(!mesh.is_convex());

        let mut pose = Pose2D::new(Vec2::new(-20.0, 7.0));
        for step in 0..12 {
            pose.rotation = step as f32 * 0.6;
            pose.scale = Vec2::new(1.0 + step as f32 * 0.1, 0.5);
            mesh.apply_transform(pose.recompute());
            let aabb = mesh.aabb();
            assert!(aabb.min.cmple(aabb.max).all());
            for &v in mesh.world_vertices() {
                assert!(aabb.contains(v));
            }
        }
    }

    #[test]
    fn test_aabb_is_tight_per_call() {
        let mut mesh = Polygon2DMesh::new(square());
        mesh.apply_transform(&Affine2D::IDENTITY.translate(Vec2::new(100.0, 0.0)));
        mesh.apply_transform(&Affine2D::IDENTITY);
        assert_eq!(mesh.aabb().min, Vec2::splat(-1.0));
        assert_eq!(mesh.aabb().max, Vec2::splat(1.0));
    }

    #[test]
    fn test_degenerate_mesh_is_not_renderable() {
        let mesh = Polygon2DMesh::from_flat(&[0.0, 0.0, 1.0, 1.0]);
        assert!(!mesh.is_renderable());
        assert!(mesh.world_normals().is_empty());
    }

    #[test]
    fn test_convex_pieces() {
        let square = Polygon2DMesh::new(square());
        assert_eq!(square.convex_pieces().count(), 1);

        let star = Polygon2DMesh::new(crate::sim::shapes::star(5, 1.0, 3.0));
        assert!(!star.is_convex());
        assert_eq!(star.convex_pieces().count(), star.triangles().len());
        for piece in star.convex_pieces() {
            assert_eq!(piece.as_sat().normals.len(), 3);
        }
    }

    #[test]
    fn test_contains_uses_world_space() {
        let mut mesh = Polygon2DMesh::new(square());
        assert!(mesh.contains(Vec2::ZERO));
        mesh.apply_transform(&Affine2D::IDENTITY.translate(Vec2::new(10.0, 0.0)));
        assert!(!mesh.contains(Vec2::ZERO));
        assert!(mesh.contains(Vec2::new(10.5, 0.5)));
    }
}
