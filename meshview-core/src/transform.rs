/// Model transformation matrices and orbit angles
use nalgebra::{Matrix3, Matrix4, Vector3};

/// Orbit angles in radians, unbounded; trigonometry wraps them
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitAngles {
    /// Rotation about the world vertical (Y) axis
    pub vertical: f32,
    /// Rotation about the world depth (Z) axis
    pub depth: f32,
}

impl OrbitAngles {
    pub fn new(vertical: f32, depth: f32) -> Self {
        Self { vertical, depth }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, d_vertical: f32, d_depth: f32) {
        self.vertical += d_vertical;
        self.depth += d_depth;
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Model matrix for the orbit: identity rotated about Y, then about Z.
    ///
    /// Both rotations post-multiply the accumulating matrix, so the Z
    /// rotation is applied to the model first in object space.
    pub fn orbit_model(angles: &OrbitAngles) -> Matrix4<f32> {
        let mut model = Matrix4::identity();
        model *= Self::rotation_about(&Vector3::y(), angles.vertical);
        model *= Self::rotation_about(&Vector3::z(), angles.depth);
        model
    }

    pub fn rotation_about(axis: &Vector3<f32>, angle: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(axis.normalize() * angle)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }

    /// Inverse-transpose of the linear part of `model`, for transforming normals.
    ///
    /// Falls back to the linear part itself when it is singular.
    pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
        let linear: Matrix3<f32> = model.fixed_view::<3, 3>(0, 0).into_owned();
        linear
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or(linear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_orbit_angles() {
        let mut angles = OrbitAngles::default();
        assert_eq!(angles.vertical, 0.0);
        assert_eq!(angles.depth, 0.0);

        angles.rotate(0.1, -0.2);
        assert!((angles.vertical - 0.1).abs() < 1e-6);
        assert!((angles.depth + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::orbit_model(&OrbitAngles::default());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_vertical_then_depth_order() {
        let angles = OrbitAngles::new(0.7, -0.4);
        let expected = Matrix4::new_rotation(Vector3::new(0.0, 0.7, 0.0))
            * Matrix4::new_rotation(Vector3::new(0.0, 0.0, -0.4));
        assert!((Transform::orbit_model(&angles) - expected).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_order_is_not_commutative() {
        let vertical = Transform::rotation_about(&Vector3::y(), 0.5);
        let depth = Transform::rotation_about(&Vector3::z(), 0.8);
        let forward = Transform::orbit_model(&OrbitAngles::new(0.5, 0.8));
        let reversed = depth * vertical;
        assert!((forward - vertical * depth).norm() < 1e-6);
        assert!((forward - reversed).norm() > 1e-3);
    }

    #[test]
    fn test_quarter_turn_about_vertical() {
        let model = Transform::orbit_model(&OrbitAngles::new(FRAC_PI_2, 0.0));
        let x = model.transform_vector(&Vector3::x());
        assert!((x - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_normal_matrix_of_rotation_is_rotation() {
        let model = Transform::orbit_model(&OrbitAngles::new(0.3, 1.1));
        let linear: Matrix3<f32> = model.fixed_view::<3, 3>(0, 0).into_owned();
        assert!((Transform::normal_matrix(&model) - linear).norm() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_corrects_nonuniform_scale() {
        let model = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));
        // A plane tilted 45 degrees in XY; scaling X stretches it, so its normal leans toward Y
        let normal = Transform::normal_matrix(&model) * Vector3::new(1.0, 1.0, 0.0);
        let normal = normal.normalize();
        let tangent = model.transform_vector(&Vector3::new(1.0, -1.0, 0.0));
        assert!(normal.dot(&tangent).abs() < 1e-6);
    }

    #[test]
    fn test_mvp_composition_order() {
        let model = Matrix4::new_translation(&Vector3::new(1.0, 0.0, 0.0));
        let view = Matrix4::new_scaling(2.0);
        let projection = Matrix4::identity();
        let mvp = Transform::mvp_matrix(&model, &view, &projection);
        assert!((mvp - view * model).norm() < 1e-6);
    }
}
