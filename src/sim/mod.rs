//! Deterministic simulation module
//!
//! All per-step logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by body id)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod body;
pub mod camera;
pub mod collision;
pub mod mesh;
pub mod pose;
pub mod shapes;
pub mod triangulate;
pub mod world;

pub use aabb::Aabb;
pub use body::{Body2D, BodyId};
pub use camera::Camera2D;
pub use collision::{Contact2D, SatPolygon, collide, test_polygon_polygon};
pub use mesh::Polygon2DMesh;
pub use pose::Pose2D;
pub use triangulate::{Triangle, triangulate, triangulate_flat, try_triangulate};
pub use world::World;
