//! Ear-clipping triangulation for simple polygons
//!
//! Winding is not known up front. The first pass assumes counter-clockwise
//! (Y up); if it stalls, the pass restarts once with the opposite assumption.
//! O(n²) worst case, intended for outlines of tens of vertices.

use glam::Vec2;

use crate::error::GeometryError;

/// A triangle as three indices into the source outline
pub type Triangle = [u32; 3];

/// Triangulate, returning an empty list when the outline can't be clipped
pub fn triangulate(points: &[Vec2]) -> Vec<Triangle> {
    try_triangulate(points).unwrap_or_else(|err| {
        log::debug!("triangulation failed: {err}");
        Vec::new()
    })
}

/// Triangulate a flat `[x0, y0, x1, y1, ...]` sequence; a trailing odd value is ignored
pub fn triangulate_flat(coords: &[f32]) -> Vec<Triangle> {
    let points: Vec<Vec2> = coords
        .chunks_exact(2)
        .map(|c| Vec2::new(c[0], c[1]))
        .collect();
    triangulate(&points)
}

pub fn try_triangulate(points: &[Vec2]) -> Result<Vec<Triangle>, GeometryError> {
    let n = points.len();
    if n < 3 {
        return Err(GeometryError::Degenerate { vertices: n });
    }

    let mut forward = true;
    let mut triangles: Vec<Triangle> = Vec::with_capacity(n - 2);
    let mut available: Vec<usize> = (0..n).collect();
    let mut i = 0usize;

    while available.len() > 3 {
        let count = available.len();
        let i0 = available[i % count];
        let i1 = available[(i + 1) % count];
        let i2 = available[(i + 2) % count];
        let (a, b, c) = (points[i0], points[i1], points[i2]);

        let is_ear = is_convex(a, b, c, forward)
            && !available
                .iter()
                .filter(|&&vi| vi != i0 && vi != i1 && vi != i2)
                .any(|&vi| point_in_triangle(points[vi], a, b, c));

        if is_ear {
            triangles.push([i0 as u32, i1 as u32, i2 as u32]);
            available.remove((i + 1) % count);
            i = 0;
            continue;
        }

        let stalled = i > 3 * count;
        i += 1;
        if stalled {
            if !forward {
                return Err(GeometryError::TooComplex);
            }
            // Probably wound the other way: start over with the flipped assumption
            forward = false;
            triangles.clear();
            available = (0..n).collect();
            i = 0;
        }
    }

    triangles.push([
        available[0] as u32,
        available[1] as u32,
        available[2] as u32,
    ]);
    Ok(triangles)
}

/// Convex under the current winding assumption (colinear counts as convex for `forward`)
#[inline]
fn is_convex(a: Vec2, b: Vec2, c: Vec2, forward: bool) -> bool {
    ((a.y - b.y) * (c.x - b.x) + (b.x - a.x) * (c.y - b.y) >= 0.0) == forward
}

/// Barycentric inside test; a zero-area triangle contains nothing
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(v0);
    let dot01 = v0.dot(v1);
    let dot02 = v0.dot(v2);
    let dot11 = v1.dot(v1);
    let dot12 = v1.dot(v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom == 0.0 {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;

    u >= 0.0 && v >= 0.0 && u + v < 1.0
}

/// Sum of absolute triangle areas
pub fn triangles_area(points: &[Vec2], triangles: &[Triangle]) -> f32 {
    triangles
        .iter()
        .map(|t| {
            let (a, b, c) = (
                points[t[0] as usize],
                points[t[1] as usize],
                points[t[2] as usize],
            );
            ((b - a).perp_dot(c - a) * 0.5).abs()
        })
        .sum()
}
