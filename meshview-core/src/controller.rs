/// Orbit camera controller driven by held control signals
use nalgebra::{Matrix4, Point3, Vector3};
use std::time::Instant;

use crate::projection::{Camera, Projection};
use crate::render::{FrameUniforms, Lighting};
use crate::settings::CameraSettings;
use crate::transform::{OrbitAngles, Transform};

/// Logical controls; key bindings are a front-end concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSignal {
    Exit,
    RotateLeft,
    RotateRight,
    TiltUp,
    TiltDown,
    ZoomIn,
    ZoomOut,
}

impl ControlSignal {
    pub const ALL: [ControlSignal; 7] = [
        ControlSignal::Exit,
        ControlSignal::RotateLeft,
        ControlSignal::RotateRight,
        ControlSignal::TiltUp,
        ControlSignal::TiltDown,
        ControlSignal::ZoomIn,
        ControlSignal::ZoomOut,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of signals held during the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    bits: u8,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, signal: ControlSignal) {
        self.bits |= signal.bit();
    }

    pub fn contains(&self, signal: ControlSignal) -> bool {
        self.bits & signal.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = ControlSignal> + '_ {
        ControlSignal::ALL
            .into_iter()
            .filter(move |signal| self.contains(*signal))
    }

    /// `+1`, `-1` or `0` for a pair of opposing signals
    fn axis(&self, positive: ControlSignal, negative: ControlSignal) -> f32 {
        let mut value = 0.0;
        if self.contains(positive) {
            value += 1.0;
        }
        if self.contains(negative) {
            value -= 1.0;
        }
        value
    }
}

impl FromIterator<ControlSignal> for ControlState {
    fn from_iter<I: IntoIterator<Item = ControlSignal>>(iter: I) -> Self {
        let mut state = Self::new();
        for signal in iter {
            state.insert(signal);
        }
        state
    }
}

/// Elapsed time between successive frames; the first frame reports zero
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick, never negative
    pub fn tick(&mut self, now: Instant) -> f32 {
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        delta
    }
}

/// Orbit state: model rotation angles plus eye distance along a fixed axis
#[derive(Debug, Clone)]
pub struct OrbitController {
    pub angles: OrbitAngles,
    distance: f32,
    base_direction: Vector3<f32>,
    rotation_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
    projection: Projection,
}

impl OrbitController {
    /// Expects settings that passed `CameraSettings::validate`
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            angles: OrbitAngles::default(),
            distance: settings
                .initial_distance
                .clamp(settings.min_distance, settings.max_distance),
            base_direction: settings.base_direction(),
            rotation_speed: settings.rotation_speed,
            zoom_speed: settings.zoom_speed,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
            projection: settings.projection(),
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn distance_range(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    /// Advance the orbit by `delta` seconds of the held `controls`
    pub fn update(&mut self, controls: &ControlState, delta: f32) {
        let delta = delta.max(0.0);
        let step = self.rotation_speed * delta;

        self.angles.rotate(
            controls.axis(ControlSignal::RotateLeft, ControlSignal::RotateRight) * step,
            controls.axis(ControlSignal::TiltUp, ControlSignal::TiltDown) * step,
        );

        self.distance -= controls.axis(ControlSignal::ZoomIn, ControlSignal::ZoomOut)
            * self.zoom_speed
            * delta;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    pub fn eye(&self) -> Point3<f32> {
        Point3::from(self.base_direction * self.distance)
    }

    pub fn camera(&self) -> Camera {
        Camera::looking_at_origin(self.eye())
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Transform::orbit_model(&self.angles)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.camera().view_matrix()
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection.matrix()
    }

    /// Matrices for the current state combined with the fixed lighting
    pub fn frame_uniforms(&self, lighting: Lighting) -> FrameUniforms {
        let model = self.model_matrix();
        FrameUniforms {
            combined: Transform::mvp_matrix(
                &model,
                &self.view_matrix(),
                &self.projection_matrix(),
            ),
            model,
            lighting,
        }
    }
}
