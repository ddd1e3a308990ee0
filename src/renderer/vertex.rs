//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

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

/// `0xRRGGBB` to an opaque color
pub const fn hex(rgb: u32) -> [f32; 4] {
    hexa(rgb, 1.0)
}

/// `0xRRGGBB` plus alpha
pub const fn hexa(rgb: u32, alpha: f32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Colors for game elements (authored in sRGB, drawn to a non-sRGB canvas)
pub mod colors {
    use super::{hex, hexa};

    pub const SKY_TOP: [f32; 4] = hex(0x3B82F6);
    pub const SKY_BOTTOM: [f32; 4] = hex(0x1E40AF);
    pub const GROUND_LINE: [f32; 4] = hex(0x10B981);
    pub const GROUND_DOT: [f32; 4] = hex(0x059669);
    pub const PLAYER: [f32; 4] = hex(0x10B981);
    pub const PLAYER_DETAIL: [f32; 4] = hex(0x065F46);
    pub const EYE_WHITE: [f32; 4] = hex(0xFFFFFF);
    pub const EYE_PUPIL: [f32; 4] = hex(0x000000);
    pub const OBSTACLE: [f32; 4] = hex(0xDC2626);
    pub const OBSTACLE_DETAIL: [f32; 4] = hex(0xB91C1C);
    pub const OVERLAY_WAITING: [f32; 4] = hexa(0x000000, 0.7);
    pub const OVERLAY_PAUSED: [f32; 4] = hexa(0x000000, 0.4);
    pub const OVERLAY_GAME_OVER: [f32; 4] = hexa(0xDC2626, 0.8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_channels() {
        assert_eq!(hex(0xFF0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hexa(0x0000FF, 0.5), [0.0, 0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::desc().array_stride, 24);
    }
}
