//! Simulation world and the fixed step
//!
//! One `step` commits every body's pose to its meshes, refreshes the camera and
//! rebuilds the contact list from scratch.

use glam::Vec2;

use super::body::{Body2D, BodyId};
use super::camera::Camera2D;
use super::collision::{Contact2D, collide};
use super::mesh::Polygon2DMesh;
use super::pose::Pose2D;

#[derive(Debug, Clone)]
pub struct World {
    /// Sorted by id
    bodies: Vec<Body2D>,
    pub camera: Camera2D,
    /// Run pairwise SAT during `step`
    pub collisions_enabled: bool,
    contacts: Vec<Contact2D>,
    steps: u64,
    next_id: BodyId,
}

impl World {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            bodies: Vec::new(),
            camera: Camera2D::new(viewport_width, viewport_height),
            collisions_enabled: true,
            contacts: Vec::new(),
            steps: 0,
            next_id: 1,
        }
    }

    /// Add a body with the given meshes and return its id
    pub fn spawn(
        &mut self,
        pose: Pose2D,
        meshes: impl IntoIterator<Item = Polygon2DMesh>,
    ) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        let mut body = Body2D::new(id, pose);
        for mesh in meshes {
            body.add_mesh(mesh);
        }
        self.bodies.push(body);
        id
    }

    pub fn despawn(&mut self, id: BodyId) -> Option<Body2D> {
        let index = self.index_of(id)?;
        Some(self.bodies.remove(index))
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }

    pub fn body(&self, id: BodyId) -> Option<&Body2D> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body2D> {
        self.index_of(id).map(move |i| &mut self.bodies[i])
    }

    #[inline]
    pub fn bodies(&self) -> &[Body2D] {
        &self.bodies
    }

    /// Contacts found by the last step (one per overlapping body pair, `body_a < body_b`)
    #[inline]
    pub fn contacts(&self) -> &[Contact2D] {
        &self.contacts
    }

    /// Contacts involving `id`
    pub fn contacts_of(&self, id: BodyId) -> impl Iterator<Item = &Contact2D> + '_ {
        self.contacts
            .iter()
            .filter(move |c| c.body_a == id || c.body_b == id)
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance one fixed step
    pub fn step(&mut self) {
        for body in &mut self.bodies {
            body.update();
        }
        self.camera.recompute();

        self.contacts.clear();
        if self.collisions_enabled {
            detect_contacts(&self.bodies, &mut self.contacts);
        }

        self.steps += 1;
        log::trace!(
            "step {}: {} bodies, {} contacts",
            self.steps,
            self.bodies.len(),
            self.contacts.len()
        );
    }

    /// First body whose meshes contain a world-space point
    pub fn pick(&self, point: Vec2) -> Option<BodyId> {
        self.bodies.iter().find(|b| b.contains(point)).map(|b| b.id)
    }

    /// Pick from a viewport pixel; nothing can be picked through a singular view
    pub fn pick_screen(&self, screen: Vec2) -> Option<BodyId> {
        match self.camera.screen_to_world(screen) {
            Ok(point) => self.pick(point),
            Err(err) => {
                log::debug!("cannot pick at {screen}: {err}");
                None
            }
        }
    }
}

/// Pairwise SAT for every body pair whose bounds overlap, keeping the deepest contact per pair
fn detect_contacts(bodies: &[Body2D], out: &mut Vec<Contact2D>) {
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            if !a.aabb().overlaps(b.aabb()) {
                continue;
            }
            if let Some(contact) = body_contact(a, b) {
                out.push(contact);
            }
        }
    }
}

fn body_contact(a: &Body2D, b: &Body2D) -> Option<Contact2D> {
    let mut deepest: Option<Contact2D> = None;
    for mesh_a in a.meshes() {
        for mesh_b in b.meshes() {
            if !mesh_a.aabb().overlaps(mesh_b.aabb()) {
                continue;
            }
            for piece_a in mesh_a.convex_pieces() {
                for piece_b in mesh_b.convex_pieces() {
                    let Some(contact) = collide(a.id, &piece_a.as_sat(), b.id, &piece_b.as_sat())
                    else {
                        continue;
                    };
                    if deepest.is_none_or(|d| contact.depth > d.depth) {
                        deepest = Some(contact);
                    }
                }
            }
        }
    }
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shapes;

    fn world_with_squares(offset: f32) -> (World, BodyId, BodyId) {
        let mut world = World::new(960.0, 600.0);
        let a = world.spawn(
            Pose2D::new(Vec2::ZERO),
            [Polygon2DMesh::new(shapes::rectangle(1.0, 1.0))],
        );
        let b = world.spawn(
            Pose2D::new(Vec2::new(offset, 0.0)),
            [Polygon2DMesh::new(shapes::rectangle(1.0, 1.0))],
        );
        (world, a, b)
    }

    #[test]
    fn test_step_finds_overlap() {
        let (mut world, a, b) = world_with_squares(0.5);
        world.step();
        assert_eq!(world.steps(), 1);
        let contacts = world.contacts();
        assert_eq!(contacts.len(), 1);
        assert_eq!((contacts[0].body_a, contacts[0].body_b), (a, b));
        assert!((contacts[0].depth - 0.5).abs() < 1e-5);
        assert!((contacts[0].axis - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_step_applies_pose_changes() {
        let (mut world, _, b) = world_with_squares(0.5);
        world.step();
        assert_eq!(world.contacts().len(), 1);

        world.body_mut(b).unwrap().pose.position = Vec2::new(10.0, 0.0);
        world.step();
        assert!(world.contacts().is_empty());
        assert_eq!(world.body(b).unwrap().aabb().center(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_repeated_vertex_mesh_still_resolves() {
        let mut world = World::new(960.0, 600.0);
        let doubled = Polygon2DMesh::from_flat(&[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
        world.spawn(Pose2D::new(Vec2::ZERO), [doubled]);
        world.spawn(
            Pose2D::new(Vec2::new(0.5, 0.0)),
            [Polygon2DMesh::from_flat(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0])],
        );
        world.step();
        let contact = world.contacts()[0];
        assert!((contact.depth - 0.5).abs() < 1e-5);
        assert!((contact.axis - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_collisions_can_be_disabled() {
        let (mut world, _, _) = world_with_squares(0.25);
        world.collisions_enabled = false;
        world.step();
        assert!(world.contacts().is_empty());
    }

    #[test]
    fn test_concave_bodies_collide_per_triangle() {
        let mut world = World::new(960.0, 600.0);
        let star = world.spawn(
            Pose2D::new(Vec2::ZERO),
            [Polygon2DMesh::new(shapes::star(5, 1.0, 3.0))],
        );
        // Sits in the notch between two star points: inside the AABB, outside the polygon
        let notch = Vec2::from_angle(std::f32::consts::TAU / 10.0) * 1.8;
        let small = world.spawn(
            Pose2D::new(notch),
            [Polygon2DMesh::new(shapes::regular_polygon(6, 0.1))],
        );
        world.step();
        assert!(world.contacts_of(small).next().is_none());

        world.body_mut(small).unwrap().pose.position = Vec2::new(0.5, 0.0);
        world.step();
        let contact = world.contacts_of(small).next().copied().unwrap();
        assert_eq!(contact.body_a, star);
        assert!(contact.depth > 0.0);
    }

    #[test]
    fn test_despawn_keeps_order() {
        let mut world = World::new(100.0, 100.0);
        let ids: Vec<BodyId> = (0..4)
            .map(|i| {
                world.spawn(
                    Pose2D::new(Vec2::splat(i as f32 * 10.0)),
                    [Polygon2DMesh::new(shapes::rectangle(1.0, 1.0))],
                )
            })
            .collect();
        assert!(world.despawn(ids[1]).is_some());
        assert!(world.despawn(ids[1]).is_none());
        let remaining: Vec<BodyId> = world.bodies().iter().map(|b| b.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
        assert_eq!(world.pick(Vec2::new(30.2, 29.8)), Some(ids[3]));
    }

    #[test]
    fn test_pick_screen_through_camera() {
        let (mut world, a, _) = world_with_squares(5.0);
        world.camera.position = Vec2::ZERO;
        world.step();
        // Camera centered on the origin: viewport center is world origin
        assert_eq!(world.pick_screen(Vec2::new(480.0, 300.0)), Some(a));
        world.camera.zoom = Vec2::ZERO;
        world.step();
        assert_eq!(world.pick_screen(Vec2::new(480.0, 300.0)), None);
    }
}
