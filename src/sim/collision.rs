//! Separating-axis narrow phase for convex polygons
//!
//! Candidate axes are the edge normals of A, then of B. The first separating
//! axis ends the test. Otherwise the axis with the smallest overlap becomes the
//! minimum translation vector, oriented from A towards B.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::BodyId;

/// A convex polygon as seen by the SAT test.
///
/// `points` are relative to `position`. For points already in world space use
/// [`SatPolygon::world`], which puts the reference at the origin.
#[derive(Debug, Clone, Copy)]
pub struct SatPolygon<'a> {
    pub position: Vec2,
    pub points: &'a [Vec2],
    /// One unit normal per edge `points[i] -> points[i + 1]`
    pub normals: &'a [Vec2],
}

impl<'a> SatPolygon<'a> {
    pub fn new(position: Vec2, points: &'a [Vec2], normals: &'a [Vec2]) -> Self {
        debug_assert_eq!(points.len(), normals.len());
        Self {
            position,
            points,
            normals,
        }
    }

    pub fn world(points: &'a [Vec2], normals: &'a [Vec2]) -> Self {
        Self::new(Vec2::ZERO, points, normals)
    }
}

/// Overlap report for two bodies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact2D {
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// Unit axis of least overlap, pointing from A towards B
    pub axis: Vec2,
    /// Overlap along `axis` (starts at `f32::MAX` until an axis is scanned)
    pub depth: f32,
    pub a_in_b: bool,
    pub b_in_a: bool,
}

impl Contact2D {
    pub fn new(body_a: BodyId, body_b: BodyId) -> Self {
        Self {
            body_a,
            body_b,
            axis: Vec2::ZERO,
            depth: f32::MAX,
            a_in_b: true,
            b_in_a: true,
        }
    }

    /// Clear accumulated results, keeping the body references
    pub fn reset(&mut self) {
        *self = Self::new(self.body_a, self.body_b);
    }

    /// Resolution vector: `axis * depth`. Move A by `-mtv()` (or B by `mtv()`) to separate.
    #[inline]
    pub fn mtv(&self) -> Vec2 {
        self.axis * self.depth
    }
}

/// Scalar extent of a point set projected on an axis
#[derive(Debug, Clone, Copy)]
struct Projection {
    min: f32,
    max: f32,
}

fn project(points: &[Vec2], axis: Vec2) -> Projection {
    #[cfg(test)]
    tests::PROJECTIONS.with(|c| c.set(c.get() + 1));

    points.iter().fold(
        Projection {
            min: f32::MAX,
            max: f32::MIN,
        },
        |range, p| {
            let d = p.dot(axis);
            Projection {
                min: range.min.min(d),
                max: range.max.max(d),
            }
        },
    )
}

/// Test one axis. Returns `true` when it separates the polygons; otherwise folds
/// the overlap into `contact`.
fn is_separating_axis(
    a: &SatPolygon<'_>,
    b: &SatPolygon<'_>,
    axis: Vec2,
    contact: Option<&mut Contact2D>,
) -> bool {
    let offset = (b.position - a.position).dot(axis);
    let ra = project(a.points, axis);
    let mut rb = project(b.points, axis);
    rb.min += offset;
    rb.max += offset;

    if ra.min > rb.max || rb.min > ra.max {
        return true;
    }

    let Some(contact) = contact else {
        return false;
    };

    // Signed overlap: negative means B sits on the low side of A along this axis
    let overlap = if ra.min < rb.min {
        contact.a_in_b = false;
        if ra.max < rb.max {
            contact.b_in_a = false;
            ra.max - rb.min
        } else {
            shortest_exit(ra, rb)
        }
    } else {
        contact.b_in_a = false;
        if ra.max > rb.max {
            contact.a_in_b = false;
            ra.min - rb.max
        } else {
            shortest_exit(ra, rb)
        }
    };

    let depth = overlap.abs();
    if depth < contact.depth {
        contact.depth = depth;
        contact.axis = if overlap < 0.0 { -axis } else { axis };
    }
    false
}

/// One range encloses the other: pick the cheaper way out
#[inline]
fn shortest_exit(ra: Projection, rb: Projection) -> f32 {
    let forward = ra.max - rb.min;
    let backward = rb.max - ra.min;
    if forward < backward { forward } else { -backward }
}

/// Polygon/polygon SAT. Returns `true` when the polygons overlap.
///
/// With a `contact`, it must be freshly created or [`reset`](Contact2D::reset).
/// Overlap is accumulated in a per-call copy and written back only when no
/// axis separates, so a separated pair leaves `contact` untouched.
pub fn test_polygon_polygon(
    a: &SatPolygon<'_>,
    b: &SatPolygon<'_>,
    contact: Option<&mut Contact2D>,
) -> bool {
    let mut scratch = contact.as_deref().copied();
    for &axis in a.normals.iter().chain(b.normals) {
        // Zero-length edges (repeated vertices) have no direction to test
        if axis == Vec2::ZERO {
            continue;
        }
        if is_separating_axis(a, b, axis, scratch.as_mut()) {
            return false;
        }
    }
    if let (Some(contact), Some(scratch)) = (contact, scratch) {
        *contact = scratch;
    }
    true
}

/// Convenience wrapper producing a contact on overlap
pub fn collide(
    body_a: BodyId,
    a: &SatPolygon<'_>,
    body_b: BodyId,
    b: &SatPolygon<'_>,
) -> Option<Contact2D> {
    let mut contact = Contact2D::new(body_a, body_b);
    test_polygon_polygon(a, b, Some(&mut contact)).then_some(contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::edge_normals_into;
    use proptest::prelude::*;
    use std::cell::Cell;

    thread_local! {
        pub(super) static PROJECTIONS: Cell<usize> = const { Cell::new(0) };
    }

    fn projections() -> usize {
        PROJECTIONS.with(Cell::get)
    }

    /// Axis-aligned box outline centered on `center`
    fn square(center: Vec2, half: f32) -> (Vec<Vec2>, Vec<Vec2>) {
        let points = vec![
            center + Vec2::new(-half, -half),
            center + Vec2::new(half, -half),
            center + Vec2::new(half, half),
            center + Vec2::new(-half, half),
        ];
        let mut normals = vec![Vec2::ZERO; 4];
        edge_normals_into(&points, &mut normals);
        (points, normals)
    }

    fn regular(center: Vec2, radius: f32, sides: usize, spin: f32) -> (Vec<Vec2>, Vec<Vec2>) {
        let points: Vec<Vec2> = (0..sides)
            .map(|i| {
                center
                    + Vec2::from_angle(spin + i as f32 * std::f32::consts::TAU / sides as f32)
                        * radius
            })
            .collect();
        let mut normals = vec![Vec2::ZERO; sides];
        edge_normals_into(&points, &mut normals);
        (points, normals)
    }

    #[test]
    fn test_overlapping_unit_squares() {
        let (pa, na) = square(Vec2::ZERO, 0.5);
        let (pb, nb) = square(Vec2::new(0.5, 0.0), 0.5);
        let a = SatPolygon::world(&pa, &na);
        let b = SatPolygon::world(&pb, &nb);

        let contact = collide(1, &a, 2, &b).expect("squares overlap");
        assert!((contact.depth - 0.5).abs() < 1e-6);
        assert!((contact.axis - Vec2::X).length() < 1e-6);
        assert!((contact.mtv() - Vec2::new(0.5, 0.0)).length() < 1e-6);
        assert!(!contact.a_in_b);
        assert!(!contact.b_in_a);
    }

    #[test]
    fn test_relative_points_with_reference_positions() {
        let (local, normals) = square(Vec2::ZERO, 0.5);
        let a = SatPolygon::new(Vec2::ZERO, &local, &normals);
        let b = SatPolygon::new(Vec2::new(0.5, 0.0), &local, &normals);
        let contact = collide(1, &a, 2, &b).unwrap();
        assert!((contact.depth - 0.5).abs() < 1e-6);
        assert!((contact.axis - Vec2::X).length() < 1e-6);
    }

    #[test]
    fn test_separated_squares_exit_early() {
        let (pa, na) = square(Vec2::ZERO, 0.5);
        let (pb, nb) = square(Vec2::new(10.0, 0.0), 0.5);
        let a = SatPolygon::world(&pa, &na);
        let b = SatPolygon::world(&pb, &nb);

        let mut contact = Contact2D::new(1, 2);
        let before = projections();
        assert!(!test_polygon_polygon(&a, &b, Some(&mut contact)));
        // A's bottom-edge normal overlaps, its right-edge normal separates:
        // two axes scanned, two projections each
        assert_eq!(projections() - before, 4);
        assert_eq!(contact.depth, f32::MAX);
        assert_eq!(contact.axis, Vec2::ZERO);
    }

    #[test]
    fn test_containment_flags() {
        let (pa, na) = square(Vec2::ZERO, 0.25);
        let (pb, nb) = square(Vec2::ZERO, 2.0);
        let a = SatPolygon::world(&pa, &na);
        let b = SatPolygon::world(&pb, &nb);

        let contact = collide(1, &a, 2, &b).unwrap();
        assert!(contact.a_in_b);
        assert!(!contact.b_in_a);

        let reversed = collide(2, &b, 1, &a).unwrap();
        assert!(!reversed.a_in_b);
        assert!(reversed.b_in_a);
    }

    #[test]
    fn test_without_contact_still_answers() {
        let (pa, na) = square(Vec2::ZERO, 1.0);
        let (pb, nb) = square(Vec2::new(1.5, 1.5), 1.0);
        let a = SatPolygon::world(&pa, &na);
        let b = SatPolygon::world(&pb, &nb);
        assert!(test_polygon_polygon(&a, &b, None));
    }

    #[test]
    fn test_repeated_vertex_does_not_zero_the_contact() {
        let mut pa = vec![Vec2::new(-0.5, -0.5)];
        pa.extend(square(Vec2::ZERO, 0.5).0);
        let mut na = vec![Vec2::ZERO; pa.len()];
        edge_normals_into(&pa, &mut na);
        assert_eq!(na[0], Vec2::ZERO);

        let (pb, nb) = square(Vec2::new(0.5, 0.0), 0.5);
        let a = SatPolygon::world(&pa, &na);
        let b = SatPolygon::world(&pb, &nb);
        let contact = collide(1, &a, 2, &b).unwrap();
        assert!((contact.depth - 0.5).abs() < 1e-6);
        assert!((contact.axis - Vec2::X).length() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_symmetry(
            ax in -5.0f32..5.0, ay in -5.0f32..5.0,
            bx in -5.0f32..5.0, by in -5.0f32..5.0,
            ra in 0.5f32..3.0, rb in 0.5f32..3.0,
            sides_a in 3usize..8, sides_b in 3usize..8,
            spin_a in 0.0f32..6.0, spin_b in 0.0f32..6.0,
        ) {
            let (pa, na) = regular(Vec2::new(ax, ay), ra, sides_a, spin_a);
            let (pb, nb) = regular(Vec2::new(bx, by), rb, sides_b, spin_b);
            let a = SatPolygon::world(&pa, &na);
            let b = SatPolygon::world(&pb, &nb);

            let ab = collide(1, &a, 2, &b);
            let ba = collide(2, &b, 1, &a);
            prop_assert_eq!(ab.is_some(), ba.is_some());
            if let (Some(ab), Some(ba)) = (ab, ba) {
                prop_assert!((ab.depth - ba.depth).abs() < 1e-4);
                prop_assert!((ab.mtv() + ba.mtv()).length() < 1e-3);
            }
        }
    }

    #[test]
    fn test_symmetry_reverses_axis() {
        let (pa, na) = square(Vec2::ZERO, 0.5);
        let (pb, nb) = square(Vec2::new(0.5, 0.2), 0.5);
        let a = SatPolygon::world(&pa, &na);
        let b = SatPolygon::world(&pb, &nb);
        let ab = collide(1, &a, 2, &b).unwrap();
        let ba = collide(2, &b, 1, &a).unwrap();
        assert!((ab.depth - ba.depth).abs() < 1e-6);
        assert!((ab.axis + ba.axis).length() < 1e-6);
    }
}
