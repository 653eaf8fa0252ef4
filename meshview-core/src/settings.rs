/// Tunable camera and lighting constants, deserializable from a config file
use nalgebra::Vector3;
use serde::Deserialize;
use thiserror::Error;

use crate::projection::Projection;
use crate::render::Lighting;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("camera.min_distance ({min}) must be positive and not above camera.max_distance ({max})")]
    DistanceRange { min: f32, max: f32 },
    #[error("camera.{0} must be a finite, non-negative speed")]
    Speed(&'static str),
    #[error("camera projection is invalid: {0}")]
    Projection(&'static str),
    #[error("{0} must be a non-zero vector")]
    ZeroVector(&'static str),
    #[error("camera.base_direction must not be parallel to the +Y up axis")]
    DirectionAlongUp,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Radians per second while a rotate/tilt key is held
    pub rotation_speed: f32,
    /// Distance units per second while a zoom key is held
    pub zoom_speed: f32,
    pub initial_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub fov_degrees: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    /// Orbit reference axis; normalized on use
    pub base_direction: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 2.0,
            zoom_speed: 10.0,
            // Length of (3, 3, 3)
            initial_distance: 5.196,
            min_distance: 1.5,
            max_distance: 40.0,
            fov_degrees: 45.0,
            aspect_ratio: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
            base_direction: [1.0, 1.0, 1.0],
        }
    }
}

impl CameraSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.min_distance > 0.0 && self.min_distance <= self.max_distance) {
            return Err(SettingsError::DistanceRange {
                min: self.min_distance,
                max: self.max_distance,
            });
        }
        for (name, speed) in [
            ("rotation_speed", self.rotation_speed),
            ("zoom_speed", self.zoom_speed),
        ] {
            if !(speed.is_finite() && speed >= 0.0) {
                return Err(SettingsError::Speed(name));
            }
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(SettingsError::Projection("fov_degrees must lie in (0, 180)"));
        }
        if !(self.aspect_ratio > 0.0) {
            return Err(SettingsError::Projection("aspect_ratio must be positive"));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(SettingsError::Projection("require 0 < near < far"));
        }
        let direction = Vector3::from(self.base_direction);
        if direction.norm_squared() < 1e-12 {
            return Err(SettingsError::ZeroVector("camera.base_direction"));
        }
        // The camera keeps +Y up; look-at degenerates when the eye sits on that axis
        if direction.normalize().y.abs() > 1.0 - 1e-4 {
            return Err(SettingsError::DirectionAlongUp);
        }
        Ok(())
    }

    pub fn projection(&self) -> Projection {
        Projection::new(
            self.fov_degrees.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    pub fn base_direction(&self) -> Vector3<f32> {
        Vector3::from(self.base_direction).normalize()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    pub object_color: [f32; 3],
    pub light_direction: [f32; 3],
    pub light_color: [f32; 3],
}

impl Default for LightingSettings {
    fn default() -> Self {
        let lighting = Lighting::default();
        Self {
            object_color: lighting.object_color.into(),
            light_direction: lighting.light_direction.into(),
            light_color: lighting.light_color.into(),
        }
    }
}

impl LightingSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if Vector3::from(self.light_direction).norm_squared() < 1e-12 {
            return Err(SettingsError::ZeroVector("lighting.light_direction"));
        }
        Ok(())
    }

    pub fn to_lighting(&self) -> Lighting {
        Lighting {
            object_color: Vector3::from(self.object_color),
            light_direction: Vector3::from(self.light_direction),
            light_color: Vector3::from(self.light_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CameraSettings::default().validate().is_ok());
        assert!(LightingSettings::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_distance_range_rejected() {
        let settings = CameraSettings {
            min_distance: 10.0,
            max_distance: 2.0,
            ..CameraSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::DistanceRange {
                min: 10.0,
                max: 2.0
            })
        );
    }

    #[test]
    fn test_bad_speed_and_projection_rejected() {
        let settings = CameraSettings {
            zoom_speed: f32::NAN,
            ..CameraSettings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::Speed("zoom_speed")));

        let settings = CameraSettings {
            near: 5.0,
            far: 1.0,
            ..CameraSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Projection(_))
        ));
    }

    #[test]
    fn test_base_direction_along_up_rejected() {
        for base_direction in [[0.0, 1.0, 0.0], [0.0, -3.0, 0.0], [1e-5, 1.0, 0.0]] {
            let settings = CameraSettings {
                base_direction,
                ..CameraSettings::default()
            };
            assert_eq!(settings.validate(), Err(SettingsError::DirectionAlongUp));
        }

        let settings = CameraSettings {
            base_direction: [0.0, 1.0, 0.1],
            ..CameraSettings::default()
        };
        assert!(settings.validate().is_ok());
        let view = crate::controller::OrbitController::new(&settings).view_matrix();
        assert!(view.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_base_direction_normalized() {
        let direction = CameraSettings::default().base_direction();
        assert!((direction.norm() - 1.0).abs() < 1e-6);
        assert!((direction.x - direction.z).abs() < 1e-6);
    }

    #[test]
    fn test_lighting_round_trips_defaults() {
        assert_eq!(LightingSettings::default().to_lighting(), Lighting::default());
    }
}
