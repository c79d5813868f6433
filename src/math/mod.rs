//! 2D math substrate
//!
//! Vectors are plain `glam::Vec2` values; the homogeneous 3×3 matrix is
//! wrapped in [`Affine2D`] so composition order and the projective-row policy
//! live in one place.

pub mod affine;

pub use affine::Affine2D;

use glam::Vec2;

/// Normalize `v`, returning it unchanged when its length is zero
#[inline]
pub fn normalize_or_keep(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > 0.0 { v / len } else { v }
}

/// Right-hand perpendicular: (x, y) -> (y, -x)
#[inline]
pub fn perp_right(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Twice the signed area of a closed outline (positive = counter-clockwise, Y up)
pub fn signed_area_x2(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum()
}

/// Fill `out` with the outward unit normal of each edge `points[i] -> points[i + 1]`
///
/// Outward is decided from the outline's winding, so mirrored transforms
/// (negative scale) still yield outward normals.
pub fn edge_normals_into(points: &[Vec2], out: &mut [Vec2]) {
    debug_assert_eq!(points.len(), out.len());
    let n = points.len();
    let flip = signed_area_x2(points) < 0.0;
    for i in 0..n {
        let edge = points[(i + 1) % n] - points[i];
        let normal = normalize_or_keep(perp_right(edge));
        out[i] = if flip { -normal } else { normal };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_is_noop() {
        assert_eq!(normalize_or_keep(Vec2::ZERO), Vec2::ZERO);
        let v = normalize_or_keep(Vec2::new(3.0, 4.0));
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_signed_area_winding() {
        let ccw = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        assert!((signed_area_x2(&ccw) - 2.0).abs() < 1e-6);
        let mut cw = ccw;
        cw.reverse();
        assert!((signed_area_x2(&cw) + 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_edge_normals_point_outward_for_both_windings() {
        let ccw = [
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ];
        let mut cw = ccw;
        cw.reverse();

        for outline in [ccw, cw] {
            let mut normals = [Vec2::ZERO; 4];
            edge_normals_into(&outline, &mut normals);
            for i in 0..4 {
                let mid = (outline[i] + outline[(i + 1) % 4]) * 0.5;
                // Square is centered on origin, so outward means same side as the edge midpoint
                assert!(normals[i].dot(mid) > 0.0);
                assert!((normals[i].length() - 1.0).abs() < 1e-6);
            }
        }
    }
}
