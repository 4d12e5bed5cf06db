//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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

/// Same color with a different alpha
pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Colors for game elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.35, 0.65, 0.95, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.75, 0.9, 1.0, 1.0];
    pub const HILL_FAR: [f32; 4] = [0.45, 0.7, 0.55, 1.0];
    pub const HILL_NEAR: [f32; 4] = [0.3, 0.6, 0.3, 1.0];
    pub const BRICK: [f32; 4] = [0.7, 0.35, 0.25, 1.0];
    pub const MORTAR: [f32; 4] = [0.5, 0.25, 0.18, 1.0];
    pub const PLATFORM: [f32; 4] = [0.55, 0.4, 0.25, 1.0];
    pub const PLATFORM_TOP: [f32; 4] = [0.35, 0.7, 0.3, 1.0];
    pub const BLOCK: [f32; 4] = [0.95, 0.7, 0.2, 1.0];
    pub const BLOCK_EDGE: [f32; 4] = [0.6, 0.4, 0.1, 1.0];
    pub const BLOCK_SOLVED: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const BLOCK_SMASHED: [f32; 4] = [0.45, 0.4, 0.35, 1.0];
    pub const CRACK: [f32; 4] = [0.15, 0.12, 0.1, 1.0];
    pub const COIN: [f32; 4] = [0.25, 0.25, 0.28, 1.0];
    pub const COIN_RIM: [f32; 4] = [0.95, 0.8, 0.2, 1.0];
    pub const ENEMY: [f32; 4] = [0.55, 0.3, 0.65, 1.0];
    pub const PLAYER: [f32; 4] = [0.2, 0.45, 0.9, 1.0];
    pub const PLAYER_HURT: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const SKIN: [f32; 4] = [1.0, 0.85, 0.7, 1.0];
    pub const EYE: [f32; 4] = [0.05, 0.05, 0.1, 1.0];
    pub const DEBRIS: [f32; 4] = [0.6, 0.45, 0.2, 1.0];
    pub const BUTTON: [f32; 4] = [1.0, 1.0, 1.0, 0.3];
    pub const BUTTON_PRESSED: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    pub const BUTTON_ICON: [f32; 4] = [0.1, 0.1, 0.15, 0.8];
}
