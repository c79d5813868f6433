//! Packs a frame's meshes into one vertex/index buffer pair

use super::RenderFrame;
use super::vertex::{CameraUniform, Vertex};

/// Reusable CPU-side staging buffers for a frame
#[derive(Debug, Default, Clone)]
pub struct MeshBatch {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    camera: Option<CameraUniform>,
}

impl MeshBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear and refill from `frame`, offsetting each mesh's indices
    pub fn rebuild(&mut self, frame: &RenderFrame<'_>) {
        self.vertices.clear();
        self.indices.clear();
        self.camera = Some(CameraUniform::new(&frame.view, &frame.projection));
        for mesh in &frame.meshes {
            let base = self.vertices.len() as u32;
            self.vertices.extend(
                mesh.vertices
                    .iter()
                    .map(|v| Vertex::new(v.x, v.y, mesh.color)),
            );
            self.indices.extend(
                mesh.triangles
                    .iter()
                    .flat_map(|t| t.iter().map(move |&i| base + i)),
            );
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertex buffer layout matching [`vertex_bytes`](Self::vertex_bytes)
    pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        Vertex::desc()
    }

    /// Camera uniform of the last rebuilt frame; empty before the first one
    pub fn camera_bytes(&self) -> &[u8] {
        self.camera
            .as_ref()
            .map(bytemuck::bytes_of)
            .unwrap_or_default()
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
