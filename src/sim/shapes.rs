//! Outline generators for common polygons
//!
//! All outlines are counter-clockwise (Y up) and centered on the origin.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Axis-aligned rectangle
pub fn rectangle(width: f32, height: f32) -> Vec<Vec2> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    vec![
        Vec2::new(-hw, -hh),
        Vec2::new(hw, -hh),
        Vec2::new(hw, hh),
        Vec2::new(-hw, hh),
    ]
}

/// Regular polygon with the first vertex on +X
pub fn regular_polygon(sides: usize, radius: f32) -> Vec<Vec2> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| Vec2::from_angle(i as f32 * TAU / sides as f32) * radius)
        .collect()
}

/// Star alternating between outer and inner radius (concave for inner < outer)
pub fn star(points: usize, inner_radius: f32, outer_radius: f32) -> Vec<Vec2> {
    let points = points.max(3);
    let n = points * 2;
    (0..n)
        .map(|i| {
            let r = if i % 2 == 0 { outer_radius } else { inner_radius };
            Vec2::from_angle(i as f32 * TAU / n as f32) * r
        })
        .collect()
}

/// Ship-like arrow pointing along +X (concave at the tail notch)
pub fn arrow(length: f32, width: f32) -> Vec<Vec2> {
    let (hl, hw) = (length / 2.0, width / 2.0);
    vec![
        Vec2::new(hl, 0.0),
        Vec2::new(-hl, hw),
        Vec2::new(-hl * 0.5, 0.0),
        Vec2::new(-hl, -hw),
    ]
}

/// Random star-shaped blob: one vertex per angular slice, jittered in angle and radius
pub fn random_blob<R: Rng>(
    rng: &mut R,
    sides: usize,
    min_radius: f32,
    max_radius: f32,
) -> Vec<Vec2> {
    let sides = sides.max(3);
    let slice = TAU / sides as f32;
    (0..sides)
        .map(|i| {
            let angle = (i as f32 + rng.random_range(0.0..0.5)) * slice;
            let radius = rng.random_range(min_radius..=max_radius);
            Vec2::from_angle(angle) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::signed_area_x2;
    use crate::sim::triangulate;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_outlines_are_counter_clockwise() {
        let mut rng = Pcg32::seed_from_u64(7);
        for outline in [
            rectangle(4.0, 2.0),
            regular_polygon(7, 3.0),
            star(5, 1.0, 3.0),
            arrow(4.0, 2.0),
            random_blob(&mut rng, 9, 1.0, 4.0),
        ] {
            assert!(signed_area_x2(&outline) > 0.0);
        }
    }

    #[test]
    fn test_star_triangulates_fully() {
        let outline = star(5, 1.0, 3.0);
        assert_eq!(triangulate(&outline).len(), outline.len() - 2);
    }

    #[test]
    fn test_blob_is_deterministic_per_seed() {
        let a = random_blob(&mut Pcg32::seed_from_u64(42), 8, 1.0, 2.0);
        let b = random_blob(&mut Pcg32::seed_from_u64(42), 8, 1.0, 2.0);
        assert_eq!(a, b);
    }
}
