//! "Duel" demo scenario
//!
//! Two arrow ships in an arena of seeded obstacles. Player one flies with WASD,
//! player two with the arrow keys; Q/E zoom. Contacts push a ship out along the
//! minimum translation vector; there is no momentum exchange.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::input::{InputQuery, InputSnapshot, KeyCode, MouseButton, keys};
use crate::renderer::vertex::colors;
use crate::renderer::{RenderFrame, Renderer};
use crate::settings::Settings;
use crate::sim::{BodyId, Polygon2DMesh, Pose2D, World, shapes};
use crate::state::Scenario;

pub const NAME: &str = "duel";

/// Half extents of the playable area (world units)
pub const ARENA_HALF: Vec2 = Vec2::new(600.0, 400.0);

const SHIP_LENGTH: f32 = 40.0;
const SHIP_WIDTH: f32 = 28.0;
const TURN_SPEED: f32 = 3.0;
const THRUST: f32 = 420.0;
const MAX_SPEED: f32 = 360.0;
/// Fraction of velocity lost per second
const DRAG: f32 = 1.5;

const ZOOM_RATE: f32 = 1.2;
const MIN_ZOOM: f32 = 0.25;
const MAX_ZOOM: f32 = 4.0;

/// No obstacle spawns closer than this to a ship's start
const SPAWN_CLEARANCE: f32 = 140.0;
const SPAWN_ATTEMPTS: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct Controls {
    pub left: KeyCode,
    pub right: KeyCode,
    pub thrust: KeyCode,
    pub brake: KeyCode,
}

impl Controls {
    pub const WASD: Self = Self {
        left: keys::A,
        right: keys::D,
        thrust: keys::W,
        brake: keys::S,
    };

    pub const ARROWS: Self = Self {
        left: keys::LEFT,
        right: keys::RIGHT,
        thrust: keys::UP,
        brake: keys::DOWN,
    };
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub body: BodyId,
    pub controls: Controls,
    pub velocity: Vec2,
    start: Pose2D,
}

#[derive(Debug)]
pub struct DuelScenario {
    world: World,
    ships: Vec<Ship>,
    obstacles: Vec<BodyId>,
    seed: u64,
    obstacle_count: usize,
    selected: Option<BodyId>,
    mouse_was_down: bool,
}

impl DuelScenario {
    pub fn new(settings: &Settings) -> Self {
        let mut world = World::new(settings.viewport_width, settings.viewport_height);
        world.collisions_enabled = settings.collisions;
        let mut scenario = Self {
            world,
            ships: Vec::new(),
            obstacles: Vec::new(),
            seed: settings.seed,
            obstacle_count: settings.obstacle_count,
            selected: None,
            mouse_was_down: false,
        };
        scenario.reset();
        scenario
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    #[inline]
    pub fn obstacles(&self) -> &[BodyId] {
        &self.obstacles
    }

    /// Body last clicked with the left mouse button
    #[inline]
    pub fn selected(&self) -> Option<BodyId> {
        self.selected
    }

    /// Rebuild the arena from the seed
    pub fn reset(&mut self) {
        for id in self.ships.drain(..).map(|s| s.body).chain(self.obstacles.drain(..)) {
            self.world.despawn(id);
        }
        self.selected = None;

        let starts = [
            (Pose2D::new(Vec2::new(-200.0, 0.0)), colors::PLAYER_ONE, Controls::WASD),
            (
                Pose2D::new(Vec2::new(200.0, 0.0)).with_rotation(std::f32::consts::PI),
                colors::PLAYER_TWO,
                Controls::ARROWS,
            ),
        ];
        for (pose, color, controls) in starts {
            let mesh = Polygon2DMesh::new(shapes::arrow(SHIP_LENGTH, SHIP_WIDTH)).with_color(color);
            let body = self.world.spawn(pose.clone(), [mesh]);
            self.ships.push(Ship {
                body,
                controls,
                velocity: Vec2::ZERO,
                start: pose,
            });
        }

        let mut rng = Pcg32::seed_from_u64(self.seed);
        for i in 0..self.obstacle_count {
            let Some(position) = self.obstacle_position(&mut rng) else {
                log::debug!("no room for obstacle {i}");
                continue;
            };
            let (outline, color) = if i % 3 == 2 {
                let outer = rng.random_range(30.0..60.0);
                (shapes::star(5, outer * 0.45, outer), colors::OBSTACLE_STAR)
            } else {
                let sides = rng.random_range(5..9);
                (shapes::random_blob(&mut rng, sides, 25.0, 55.0), colors::OBSTACLE)
            };
            let rotation = rng.random_range(0.0..std::f32::consts::TAU);
            let pose = Pose2D::new(position).with_rotation(rotation);
            let id = self
                .world
                .spawn(pose, [Polygon2DMesh::new(outline).with_color(color)]);
            self.obstacles.push(id);
        }
        log::debug!(
            "duel arena: {} ships, {} obstacles (seed {:#x})",
            self.ships.len(),
            self.obstacles.len(),
            self.seed
        );
    }

    fn obstacle_position(&self, rng: &mut Pcg32) -> Option<Vec2> {
        let limit = ARENA_HALF - Vec2::splat(60.0);
        (0..SPAWN_ATTEMPTS)
            .map(|_| {
                Vec2::new(
                    rng.random_range(-limit.x..limit.x),
                    rng.random_range(-limit.y..limit.y),
                )
            })
            .find(|p| {
                self.ships
                    .iter()
                    .all(|s| s.start.position.distance(*p) > SPAWN_CLEARANCE)
            })
    }

    fn fly(&mut self, input: &InputSnapshot, dt: f32) {
        for ship in &mut self.ships {
            let Some(body) = self.world.body_mut(ship.body) else {
                continue;
            };
            let c = ship.controls;
            let pose = &mut body.pose;
            let turn = input.axis(c.right, c.left) * TURN_SPEED * dt;
            pose.rotation = crate::normalize_angle(pose.rotation + turn);

            let thrust = input.axis(c.brake, c.thrust);
            ship.velocity += pose.forward() * thrust * THRUST * dt;
            ship.velocity *= (1.0 - DRAG * dt).max(0.0);
            ship.velocity = ship.velocity.clamp_length_max(MAX_SPEED);

            pose.position = (pose.position + ship.velocity * dt).clamp(-ARENA_HALF, ARENA_HALF);
        }
    }

    fn follow_camera(&mut self, input: &InputSnapshot, dt: f32) {
        let positions: Vec<Vec2> = self
            .ships
            .iter()
            .filter_map(|s| self.world.body(s.body))
            .map(|b| b.pose.position)
            .collect();
        if !positions.is_empty() {
            self.world.camera.position =
                positions.iter().copied().sum::<Vec2>() / positions.len() as f32;
        }

        let zoom = input.axis(keys::Q, keys::E);
        if zoom != 0.0 {
            let factor = (1.0 + zoom * ZOOM_RATE * dt).max(0.01);
            self.world.camera.zoom = (self.world.camera.zoom * factor)
                .clamp(Vec2::splat(MIN_ZOOM), Vec2::splat(MAX_ZOOM));
        }
    }

    /// Move ships out of whatever they touched during the last step
    fn resolve_contacts(&mut self) {
        let is_ship = |id: BodyId| self.ships.iter().any(|s| s.body == id);
        let mut pushes: Vec<(BodyId, Vec2)> = Vec::new();
        for contact in self.world.contacts() {
            let (a_ship, b_ship) = (is_ship(contact.body_a), is_ship(contact.body_b));
            let mtv = contact.mtv();
            match (a_ship, b_ship) {
                (true, true) => {
                    pushes.push((contact.body_a, -mtv * 0.5));
                    pushes.push((contact.body_b, mtv * 0.5));
                }
                (true, false) => pushes.push((contact.body_a, -mtv)),
                (false, true) => pushes.push((contact.body_b, mtv)),
                (false, false) => {}
            }
        }
        for (id, push) in pushes {
            if let Some(body) = self.world.body_mut(id) {
                body.pose.position += push;
            }
        }
    }

    fn pick(&mut self, input: &InputSnapshot) {
        let down = input.is_mouse_button_pressed(MouseButton::Left);
        if down && !self.mouse_was_down {
            self.selected = self.world.pick_screen(input.mouse_position());
            log::debug!("picked {:?}", self.selected);
        }
        self.mouse_was_down = down;
    }
}

impl Scenario for DuelScenario {
    fn load(&mut self, previous: Option<&str>) {
        log::info!("duel loaded (from {previous:?})");
        self.reset();
    }

    fn unload(&mut self, next: &str) {
        log::info!("duel unloading for `{next}` after {} steps", self.world.steps());
    }

    fn update(&mut self, input: &InputSnapshot, dt: f32) {
        self.fly(input, dt);
        self.follow_camera(input, dt);
        self.world.step();
        self.resolve_contacts();
        self.pick(input);
    }

    fn render(&mut self, alpha: f32, renderer: &mut dyn Renderer) {
        renderer.render(&RenderFrame::from_world(&self.world, alpha));
    }
}
