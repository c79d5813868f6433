//! 2D camera: view and orthographic projection
//!
//! The view matrix undoes the camera's own rotation (note the negated angle
//! relative to [`Pose2D`](super::Pose2D)) so the world stays upright on screen.

use glam::{Mat3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::math::Affine2D;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: Vec2,
    pub rotation: f32,
    /// Half the viewport size, fixed at construction
    viewport_center: Vec2,
    view: Affine2D,
    projection: Affine2D,
}

impl Camera2D {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        let mut camera = Self {
            position: Vec2::ZERO,
            zoom: Vec2::ONE,
            rotation: 0.0,
            viewport_center: Vec2::new(viewport_width, viewport_height) * 0.5,
            view: Affine2D::IDENTITY,
            projection: orthographic(viewport_width, viewport_height),
        };
        camera.recompute();
        camera
    }

    /// Rebuild the view:
    /// translate(center) → scale(zoom) → rotate(−rotation) → translate(−position)
    pub fn recompute(&mut self) -> &Affine2D {
        self.view = Affine2D::IDENTITY
            .translate(self.viewport_center)
            .scale(self.zoom)
            .rotate(-self.rotation)
            .translate(-self.position);
        &self.view
    }

    #[inline]
    pub fn view(&self) -> &Affine2D {
        &self.view
    }

    #[inline]
    pub fn projection(&self) -> &Affine2D {
        &self.projection
    }

    #[inline]
    pub fn viewport_center(&self) -> Vec2 {
        self.viewport_center
    }

    /// Map a viewport pixel back into world space
    pub fn screen_to_world(&self, screen: Vec2) -> Result<Vec2, TransformError> {
        Ok(self.view.try_inverse()?.transform_point(screen))
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.view.transform_point(world)
    }
}

/// Maps [0, width] × [0, height] (origin top-left, Y down) to [-1, 1] clip space
fn orthographic(width: f32, height: f32) -> Affine2D {
    Affine2D::from_mat3(Mat3::from_cols(
        Vec3::new(2.0 / width, 0.0, 0.0),
        Vec3::new(0.0, -2.0 / height, 0.0),
        Vec3::new(-1.0, 1.0, 1.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_camera_position_maps_to_viewport_center() {
        let mut camera = Camera2D::new(960.0, 600.0);
        camera.position = Vec2::new(300.0, -40.0);
        camera.zoom = Vec2::splat(2.0);
        camera.rotation = 0.4;
        camera.recompute();
        assert!(approx(camera.world_to_screen(camera.position), Vec2::new(480.0, 300.0)));
    }

    #[test]
    fn test_rotation_is_undone() {
        let mut camera = Camera2D::new(200.0, 200.0);
        camera.rotation = FRAC_PI_2;
        camera.recompute();
        // A point ahead of a camera rotated 90° appears to its right
        let screen = camera.world_to_screen(Vec2::new(0.0, 10.0));
        assert!(approx(screen, Vec2::new(110.0, 100.0)));
    }

    #[test]
    fn test_projection_corners() {
        let camera = Camera2D::new(960.0, 600.0);
        let p = camera.projection();
        assert!(approx(p.transform_point(Vec2::ZERO), Vec2::new(-1.0, 1.0)));
        assert!(approx(p.transform_point(Vec2::new(960.0, 600.0)), Vec2::new(1.0, -1.0)));
        assert!(approx(p.transform_point(Vec2::new(480.0, 300.0)), Vec2::ZERO));
    }

    #[test]
    fn test_screen_to_world_round_trip() {
        let mut camera = Camera2D::new(960.0, 600.0);
        camera.position = Vec2::new(-50.0, 25.0);
        camera.zoom = Vec2::new(1.5, 1.5);
        camera.rotation = -0.8;
        camera.recompute();
        let world = Vec2::new(17.0, 42.0);
        let back = camera.screen_to_world(camera.world_to_screen(world)).unwrap();
        assert!(approx(back, world));
    }

    #[test]
    fn test_zero_zoom_cannot_unproject() {
        let mut camera = Camera2D::new(960.0, 600.0);
        camera.zoom = Vec2::ZERO;
        camera.recompute();
        assert!(camera.screen_to_world(Vec2::new(1.0, 1.0)).is_err());
    }
}
