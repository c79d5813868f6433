//! Bodies: one pose driving a group of meshes

use glam::Vec2;

use super::aabb::Aabb;
use super::mesh::Polygon2DMesh;
use super::pose::Pose2D;
use crate::math::Affine2D;

/// Stable body identifier (allocated by the world, never reused)
pub type BodyId = u32;

#[derive(Debug, Clone)]
pub struct Body2D {
    pub id: BodyId,
    /// Mutated by simulation logic; committed to the meshes by [`Body2D::update`]
    pub pose: Pose2D,
    meshes: Vec<Polygon2DMesh>,
    /// Pose as of the last commit, and the one before it (render interpolation)
    committed: Pose2D,
    previous: Pose2D,
    aabb: Aabb,
}

impl Body2D {
    pub fn new(id: BodyId, pose: Pose2D) -> Self {
        let mut body = Self {
            id,
            committed: pose.clone(),
            previous: pose.clone(),
            pose,
            meshes: Vec::new(),
            aabb: Aabb::EMPTY,
        };
        body.commit();
        body.previous.clone_from(&body.committed);
        body
    }

    pub fn with_mesh(mut self, mesh: Polygon2DMesh) -> Self {
        self.add_mesh(mesh);
        self
    }

    pub fn add_mesh(&mut self, mut mesh: Polygon2DMesh) {
        mesh.apply_transform(self.committed.transform());
        self.aabb = self.aabb.union(mesh.aabb());
        self.meshes.push(mesh);
    }

    /// Advance one step: remember the last committed pose, then recompose and
    /// push the new transform into every mesh
    pub fn update(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.committed);
        self.commit();
    }

    fn commit(&mut self) {
        let transform = *self.pose.recompute();
        self.committed.clone_from(&self.pose);
        self.aabb.reset();
        for mesh in &mut self.meshes {
            mesh.apply_transform(&transform);
            self.aabb = self.aabb.union(mesh.aabb());
        }
    }

    #[inline]
    pub fn meshes(&self) -> &[Polygon2DMesh] {
        &self.meshes
    }

    /// Union of the mesh bounds; empty for a body without meshes
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Transform as of the last commit
    #[inline]
    pub fn transform(&self) -> &Affine2D {
        self.committed.transform()
    }

    /// Model transform between the previous step (alpha = 0) and the current one (alpha = 1)
    pub fn interpolated_transform(&self, alpha: f32) -> Affine2D {
        self.previous.lerp_transform(&self.committed, alpha)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.aabb.contains(p) && self.meshes.iter().any(|m| m.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon2DMesh {
        Polygon2DMesh::new(vec![
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(-0.5, 0.5),
        ])
    }

    #[test]
    fn test_update_moves_every_mesh() {
        let mut body = Body2D::new(1, Pose2D::new(Vec2::ZERO))
            .with_mesh(unit_square())
            .with_mesh(unit_square());
        body.pose.position = Vec2::new(10.0, -4.0);
        body.update();
        for mesh in body.meshes() {
            assert!((mesh.aabb().center() - Vec2::new(10.0, -4.0)).length() < 1e-5);
        }
        assert!(body.contains(Vec2::new(10.2, -4.2)));
        assert!(!body.contains(Vec2::ZERO));
    }

    #[test]
    fn test_pose_edits_wait_for_update() {
        let mut body = Body2D::new(1, Pose2D::new(Vec2::ZERO)).with_mesh(unit_square());
        body.pose.position = Vec2::new(3.0, 0.0);
        assert_eq!(body.transform().translation(), Vec2::ZERO);
        assert!(body.aabb().contains(Vec2::ZERO));
    }

    #[test]
    fn test_interpolation_between_steps() {
        let mut body = Body2D::new(7, Pose2D::new(Vec2::ZERO)).with_mesh(unit_square());
        body.pose.position = Vec2::new(2.0, 0.0);
        body.update();
        body.pose.position = Vec2::new(4.0, 0.0);
        body.update();

        let at = |alpha: f32| body.interpolated_transform(alpha).translation();
        assert!((at(0.0) - Vec2::new(2.0, 0.0)).length() < 1e-5);
        assert!((at(0.5) - Vec2::new(3.0, 0.0)).length() < 1e-5);
        assert!((at(1.0) - Vec2::new(4.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_empty_body_has_empty_bounds() {
        let mut body = Body2D::new(3, Pose2D::new(Vec2::ONE));
        body.update();
        assert!(body.aabb().is_empty());
    }
}
