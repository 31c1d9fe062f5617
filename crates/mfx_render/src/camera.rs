//! Fixed screen-space camera.
//!
//! The game simulates in window pixel coordinates with the origin at the
//! top-left and y growing downward (so gravity is a positive constant in the
//! integrator). The projection maps that space straight onto clip space; no
//! scrolling, no zoom -- none of the titles this engine unifies move the view.

use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

pub struct ScreenCamera {
    pub viewport: (u32, u32),
}

impl ScreenCamera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let (w, h) = self.viewport;
        // Top-left origin, y-down: bottom of clip space is the window height.
        let proj = Mat4::orthographic_rh(0.0, w as f32, h as f32, 0.0, -1.0, 1.0);
        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec4};

    #[test]
    fn top_left_maps_to_upper_left_clip_corner() {
        let camera = ScreenCamera::new(800, 600);
        let m = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);
        let clip = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x - -1.0).abs() < 1e-5);
        assert!((clip.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn bottom_right_maps_to_lower_right_clip_corner() {
        let camera = ScreenCamera::new(800, 600);
        let m = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);
        let clip = m * Vec4::new(800.0, 600.0, 0.0, 1.0);
        assert!((clip.x - 1.0).abs() < 1e-5);
        assert!((clip.y - -1.0).abs() < 1e-5);
    }
}
