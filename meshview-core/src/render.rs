/// Boundary between the core and a concrete rendering backend
use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::geometry::Mesh;
use crate::transform::Transform;

/// Directional lighting uniforms; fixed for the lifetime of the viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub object_color: Vector3<f32>,
    /// Direction the light travels, not the direction toward the light
    pub light_direction: Vector3<f32>,
    pub light_color: Vector3<f32>,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            object_color: Vector3::new(1.0, 0.0, 0.0),
            light_direction: Vector3::new(-0.2, -1.0, -0.3),
            light_color: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Everything a backend needs to draw one frame of the mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// `projection * view * model`
    pub combined: Matrix4<f32>,
    /// Model matrix alone, for transforming normals into world space
    pub model: Matrix4<f32>,
    pub lighting: Lighting,
}

impl FrameUniforms {
    /// World-space normal matrix backends must apply to raw normals
    pub fn normal_matrix(&self) -> Matrix3<f32> {
        Transform::normal_matrix(&self.model)
    }

    /// Transform a raw draw-normal into a unit world-space normal
    pub fn world_normal(&self, normal: &Vector3<f32>) -> Vector3<f32> {
        (self.normal_matrix() * normal)
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::zeros)
    }
}

/// A rendering backend.
///
/// The backend owns every device resource it creates (buffers, programs,
/// terminal state) and releases them when dropped. The core only hands it
/// the immutable `Mesh` and per-frame uniforms.
pub trait RenderPipeline {
    type Error: std::error::Error;

    /// Rasterize one frame of `mesh` with the given transforms and lighting
    fn draw_frame(&mut self, mesh: &Mesh, uniforms: &FrameUniforms) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::OrbitAngles;

    #[test]
    fn test_world_normal_follows_rotation() {
        let model = Transform::orbit_model(&OrbitAngles::new(std::f32::consts::FRAC_PI_2, 0.0));
        let uniforms = FrameUniforms {
            combined: model,
            model,
            lighting: Lighting::default(),
        };
        let n = uniforms.world_normal(&Vector3::new(2.0, 0.0, 0.0));
        assert!((n - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_zero_normal_stays_zero() {
        let uniforms = FrameUniforms {
            combined: Matrix4::identity(),
            model: Matrix4::identity(),
            lighting: Lighting::default(),
        };
        assert_eq!(uniforms.world_normal(&Vector3::zeros()), Vector3::zeros());
    }
}
