use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Maps canvas pixels (origin top-left, y down) onto the whole surface,
/// whatever the surface's physical size.
pub struct ScreenProjection {
    pub canvas: (u32, u32),
}

impl ScreenProjection {
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            canvas: (canvas_width, canvas_height),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        let w = self.canvas.0.max(1) as f32;
        let h = self.canvas.1.max(1) as f32;
        Mat4::orthographic_rh(0.0, w, h, 0.0, -1.0, 1.0)
    }

    pub fn build_uniform(&self) -> ScreenUniform {
        ScreenUniform {
            view_proj: self.matrix().to_cols_array_2d(),
        }
    }
}
