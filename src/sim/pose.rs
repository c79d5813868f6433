//! Object pose: position, scale, rotation and local pivot
//!
//! The matrix is a derived cache. The four fields are the source of truth.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::lerp_angle;
use crate::math::Affine2D;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PoseFields")]
pub struct Pose2D {
    pub position: Vec2,
    pub scale: Vec2,
    /// Radians, counter-clockwise
    pub rotation: f32,
    /// Local pivot the object rotates and scales around
    pub origin: Vec2,
    #[serde(skip)]
    transform: Affine2D,
}

/// Serialized form: the fields without the cache
#[derive(Deserialize)]
struct PoseFields {
    position: Vec2,
    scale: Vec2,
    rotation: f32,
    origin: Vec2,
}

impl From<PoseFields> for Pose2D {
    fn from(fields: PoseFields) -> Self {
        let mut pose = Self {
            position: fields.position,
            scale: fields.scale,
            rotation: fields.rotation,
            origin: fields.origin,
            transform: Affine2D::IDENTITY,
        };
        pose.recompute();
        pose
    }
}

impl Default for Pose2D {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl Pose2D {
    pub fn new(position: Vec2) -> Self {
        let mut pose = Self {
            position,
            scale: Vec2::ONE,
            rotation: 0.0,
            origin: Vec2::ZERO,
            transform: Affine2D::IDENTITY,
        };
        pose.recompute();
        pose
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self.recompute();
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self.recompute();
        self
    }

    /// Rebuild the cached transform:
    /// translate(position) → scale → rotate → translate(−origin)
    pub fn recompute(&mut self) -> &Affine2D {
        self.transform = compose(self.position, self.scale, self.rotation, self.origin);
        &self.transform
    }

    /// The transform as of the last `recompute`
    #[inline]
    pub fn transform(&self) -> &Affine2D {
        &self.transform
    }

    /// Transform blended between `self` (alpha = 0) and `next` (alpha = 1)
    pub fn lerp_transform(&self, next: &Pose2D, alpha: f32) -> Affine2D {
        compose(
            self.position.lerp(next.position, alpha),
            self.scale.lerp(next.scale, alpha),
            lerp_angle(self.rotation, next.rotation, alpha),
            next.origin,
        )
    }

    /// Unit vector the pose is facing (local +X rotated)
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }
}

fn compose(position: Vec2, scale: Vec2, rotation: f32, origin: Vec2) -> Affine2D {
    Affine2D::IDENTITY
        .translate(position)
        .scale(scale)
        .rotate(rotation)
        .translate(-origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialized_pose_has_fresh_transform() {
        let mut pose = Pose2D::new(Vec2::new(4.0, -2.0)).with_rotation(0.9);
        pose.scale = Vec2::new(2.0, 0.5);
        pose.recompute();

        let json = serde_json::to_string(&pose).unwrap();
        let loaded: Pose2D = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.transform(), pose.transform());
        assert_eq!(loaded, pose);
    }

    #[test]
    fn test_recompute_is_bit_identical() {
        let mut pose = Pose2D::new(Vec2::new(12.5, -3.25));
        pose.scale = Vec2::new(1.5, 0.75);
        pose.rotation = 0.7;
        pose.origin = Vec2::new(2.0, 1.0);

        let first = pose.recompute().to_cols_array();
        let second = pose.recompute().to_cols_array();
        assert_eq!(
            first.map(f32::to_bits),
            second.map(f32::to_bits)
        );
    }

    #[test]
    fn test_origin_is_pivot() {
        let mut pose = Pose2D::new(Vec2::new(100.0, 50.0)).with_origin(Vec2::new(5.0, 5.0));
        pose.rotation = 1.3;
        pose.scale = Vec2::splat(3.0);
        pose.recompute();
        // The pivot always lands on the position, whatever the rotation/scale
        let pivot = pose.transform().transform_point(Vec2::new(5.0, 5.0));
        assert!((pivot - Vec2::new(100.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn test_transform_is_stale_until_recompute() {
        let mut pose = Pose2D::new(Vec2::ZERO);
        pose.position = Vec2::new(10.0, 0.0);
        assert_eq!(pose.transform().translation(), Vec2::ZERO);
        pose.recompute();
        assert_eq!(pose.transform().translation(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_lerp_transform_midpoint() {
        let a = Pose2D::new(Vec2::ZERO);
        let b = Pose2D::new(Vec2::new(10.0, 20.0));
        let mid = a.lerp_transform(&b, 0.5);
        assert!((mid.translation() - Vec2::new(5.0, 10.0)).length() < 1e-5);
    }
}
