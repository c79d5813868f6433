//! GPU-facing vertex and uniform layouts
//!
//! This is the contract with a GPU renderer: [`MeshBatch`](super::MeshBatch)
//! vertex bytes match [`Vertex::desc`] at shader locations 0 (position) and 1
//! (colour), and [`CameraUniform`] bytes match a WGSL uniform holding
//! `view: mat3x3<f32>, projection: mat3x3<f32>`.

use bytemuck::{Pod, Zeroable};

use crate::math::Affine2D;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// View and projection as WGSL `mat3x3<f32>` (each column padded to 16 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 3],
    pub projection: [[f32; 4]; 3],
}

impl CameraUniform {
    pub fn new(view: &Affine2D, projection: &Affine2D) -> Self {
        Self {
            view: padded_columns(view),
            projection: padded_columns(projection),
        }
    }
}

fn padded_columns(m: &Affine2D) -> [[f32; 4]; 3] {
    let c = m.to_cols_array();
    [
        [c[0], c[1], c[2], 0.0],
        [c[3], c[4], c[5], 0.0],
        [c[6], c[7], c[8], 0.0],
    ]
}

/// Colors for scene elements
pub mod colors {
    pub const PLAYER_ONE: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const PLAYER_TWO: [f32; 4] = [0.9, 0.35, 0.3, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.4, 0.7, 1.0, 1.0];
    pub const OBSTACLE_STAR: [f32; 4] = [0.9, 0.85, 0.3, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}
