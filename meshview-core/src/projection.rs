/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Fixed perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
        }
    }

    /// Create the projection matrix
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(std::f32::consts::PI / 4.0, 800.0 / 600.0, 0.1, 100.0)
    }
}

/// Look-at camera: eye position, target and up vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    /// Camera at `position` looking at the origin with +Y up
    pub fn looking_at_origin(position: Point3<f32>) -> Self {
        Self {
            position,
            target: Point3::origin(),
            up: Vector3::y(),
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }
}

/// Project a model-space point through `mvp` into screen space.
///
/// Returns `(x, y, depth)` with `x`/`y` in pixels (origin top-left) and
/// `depth` in NDC, or `None` when the point lies behind the eye or outside
/// the depth range.
pub fn project_to_screen(
    mvp: &Matrix4<f32>,
    point: &Point3<f32>,
    width: f32,
    height: f32,
) -> Option<(f32, f32, f32)> {
    let clip: Vector4<f32> = mvp * point.to_homogeneous();

    // Prevent division by near-zero or negative w (behind the camera)
    if clip.w < 1e-6 {
        return None;
    }

    let ndc = clip.xyz() / clip.w;
    if !(-1.0..=1.0).contains(&ndc.z) {
        return None;
    }

    // Convert to screen space
    let screen_x = (ndc.x + 1.0) * 0.5 * width;
    let screen_y = (1.0 - ndc.y) * 0.5 * height;
    Some((screen_x, screen_y, ndc.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_maps_target_onto_negative_z() {
        let camera = Camera::looking_at_origin(Point3::new(3.0, 3.0, 3.0));
        let view = camera.view_matrix();
        let target = view.transform_point(&Point3::origin());
        assert!(target.x.abs() < 1e-5);
        assert!(target.y.abs() < 1e-5);
        assert!((target.z + 27.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let camera = Camera::looking_at_origin(Point3::new(0.0, 0.0, 5.0));
        let mvp = Projection::default().matrix() * camera.view_matrix();
        let (x, y, depth) = project_to_screen(&mvp, &Point3::origin(), 80.0, 40.0).unwrap();
        assert!((x - 40.0).abs() < 1e-4);
        assert!((y - 20.0).abs() < 1e-4);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = Camera::looking_at_origin(Point3::new(0.0, 0.0, 5.0));
        let mvp = Projection::default().matrix() * camera.view_matrix();
        assert!(project_to_screen(&mvp, &Point3::new(0.0, 0.0, 10.0), 80.0, 40.0).is_none());
    }

    #[test]
    fn test_default_projection_parameters() {
        let projection = Projection::default();
        assert!((projection.fov - 45.0_f32.to_radians()).abs() < 1e-6);
        assert!((projection.aspect - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(projection.near, 0.1);
        assert_eq!(projection.far, 100.0);
    }
}
