//! Perspective camera orbiting a target point.
//!
//! Mouse drag rotates, the wheel dollies in and out. The polar angle is
//! measured from +Y and clamped so the camera never dips below the horizon
//! or flips over the top.

use crate::config::CameraConfig;
use crate::math3d::Vec3;

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub azimuth: f32,
    pub polar: f32,
    pub fov: f32,
    near: f32,
    min_distance: f32,
    max_distance: f32,
    min_polar: f32,
    max_polar: f32,
    sensitivity: f32,
    zoom_step: f32,
}

/// Screen-space result of a projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    /// Distance along the view direction
    pub depth: f32,
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            target: config.target,
            distance: config.distance.clamp(config.min_distance, config.max_distance),
            azimuth: config.azimuth,
            polar: config.polar.clamp(config.min_polar, config.max_polar),
            fov: config.fov_degrees.to_radians(),
            near: config.near,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            min_polar: config.min_polar,
            max_polar: config.max_polar,
            sensitivity: config.orbit_sensitivity,
            zoom_step: config.zoom_step,
        }
    }

    /// Camera position in world space
    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    /// Rotate by angles in radians
    pub fn orbit(&mut self, d_azimuth: f32, d_polar: f32) {
        self.azimuth = (self.azimuth + d_azimuth).rem_euclid(std::f32::consts::TAU);
        self.polar = (self.polar + d_polar).clamp(self.min_polar, self.max_polar);
    }

    /// Rotate from a mouse drag in pixels
    pub fn drag(&mut self, dx: i32, dy: i32) {
        self.orbit(
            -(dx as f32) * self.sensitivity,
            -(dy as f32) * self.sensitivity,
        );
    }

    /// Dolly by wheel notches; positive moves closer
    pub fn zoom(&mut self, notches: i32) {
        let factor = (1.0 - self.zoom_step).powi(notches);
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    /// Project a world point onto a `width` x `height` screen.
    ///
    /// Returns `None` for points at or behind the near plane.
    pub fn project(&self, point: Vec3, width: u32, height: u32) -> Option<Projected> {
        let eye = self.eye();
        let forward = (self.target - eye).normalize();
        let right = forward.cross(&Vec3::Y).normalize();
        let up = right.cross(&forward);

        let rel = point - eye;
        let depth = rel.dot(&forward);
        if depth <= self.near {
            return None;
        }

        let focal = (height as f32 * 0.5) / (self.fov * 0.5).tan();
        let scale = focal / depth;
        Some(Projected {
            x: width as f32 * 0.5 + rel.dot(&right) * scale,
            y: height as f32 * 0.5 - rel.dot(&up) * scale,
            depth,
        })
    }
}
