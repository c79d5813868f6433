//! Render boundary
//!
//! The core never touches a graphics device. Once per tick it hands a
//! [`RenderFrame`] (world-space mesh buffers, camera matrices and the
//! interpolation alpha) to whatever implements [`Renderer`].

pub mod batch;
pub mod vertex;

pub use batch::MeshBatch;
pub use vertex::{CameraUniform, Vertex};

use glam::Vec2;

use crate::math::Affine2D;
use crate::sim::{BodyId, Triangle, World};

/// One mesh ready to draw
#[derive(Debug, Clone, Copy)]
pub struct MeshDraw<'a> {
    pub body: BodyId,
    /// World-space vertices as of the last step
    pub vertices: &'a [Vec2],
    pub local_vertices: &'a [Vec2],
    pub triangles: &'a [Triangle],
    pub color: [f32; 4],
    /// Body transform blended by alpha, for drawing `local_vertices` smoothly
    pub interpolated_model: Affine2D,
}

/// Everything a renderer gets for one tick
#[derive(Debug, Clone)]
pub struct RenderFrame<'a> {
    pub view: Affine2D,
    pub projection: Affine2D,
    /// Fraction of a step elapsed since the last simulation step, in [0, 1)
    pub alpha: f32,
    pub meshes: Vec<MeshDraw<'a>>,
}

impl<'a> RenderFrame<'a> {
    /// Describe a world; meshes without triangles are skipped
    pub fn from_world(world: &'a World, alpha: f32) -> Self {
        let meshes = world
            .bodies()
            .iter()
            .flat_map(|body| {
                let model = body.interpolated_transform(alpha);
                body.meshes()
                    .iter()
                    .filter(|m| m.is_renderable())
                    .map(move |mesh| MeshDraw {
                        body: body.id,
                        vertices: mesh.world_vertices(),
                        local_vertices: mesh.local_vertices(),
                        triangles: mesh.triangles(),
                        color: mesh.color,
                        interpolated_model: model,
                    })
            })
            .collect();

        Self {
            view: *world.camera.view(),
            projection: *world.camera.projection(),
            alpha,
            meshes,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangles.len()).sum()
    }
}

/// Render collaborator: issues draw calls for a frame
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame<'_>);
}

/// Headless renderer: packs the frame and logs its size
#[derive(Debug, Default)]
pub struct LogRenderer {
    batch: MeshBatch,
    pub frames: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_batch(&self) -> &MeshBatch {
        &self.batch
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) {
        self.batch.rebuild(frame);
        self.frames += 1;
        log::debug!(
            "frame {}: {} meshes, {} triangles, {} vertex + {} camera bytes, alpha {:.3}",
            self.frames,
            frame.meshes.len(),
            frame.triangle_count(),
            self.batch.vertex_bytes().len(),
            self.batch.camera_bytes().len(),
            frame.alpha
        );
    }
}
