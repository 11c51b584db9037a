#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl FrameVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FrameVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(FrameVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // tex_coords
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(FrameVertex, tex_coords) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }

    /// Two-triangle quad covering a `width` x `height` canvas in pixel space.
    pub fn canvas_quad(width: u32, height: u32) -> ([FrameVertex; 4], [u16; 6]) {
        let (w, h) = (width as f32, height as f32);
        let vertices = [
            FrameVertex {
                position: [0.0, 0.0],
                tex_coords: [0.0, 0.0],
            },
            FrameVertex {
                position: [w, 0.0],
                tex_coords: [1.0, 0.0],
            },
            FrameVertex {
                position: [w, h],
                tex_coords: [1.0, 1.0],
            },
            FrameVertex {
                position: [0.0, h],
                tex_coords: [0.0, 1.0],
            },
        ];
        (vertices, [0, 1, 2, 0, 2, 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_corners_map_to_texture_corners() {
        let (vertices, indices) = FrameVertex::canvas_quad(200, 100);
        assert_eq!(vertices[2].position, [200.0, 100.0]);
        assert_eq!(vertices[2].tex_coords, [1.0, 1.0]);
        assert_eq!(vertices[0].tex_coords, [0.0, 0.0]);
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<FrameVertex>(), 16);
    }
}
