//! Orbit controls
//!
//! The camera orbits a target on a sphere. Pointer input accumulates angular
//! deltas; `update` applies them (a fraction per frame when damping is on),
//! clamps the distance and writes the result back into the camera.

use std::f32::consts::PI;
use vitrine_core::Point3f;
use nalgebra::Vector3;
use crate::camera::Camera;
use crate::config::ViewerConfig;

/// Keeps the pole out of reach so `look_at` never degenerates
const POLAR_EPSILON: f32 = 1e-6;

/// Sphere coordinates of an offset from the target
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y
    phi: f32,
    /// Azimuth around +Y, measured from +Z towards +X
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: &Vector3<f32>) -> Self {
        let radius = offset.norm();
        if radius == 0.0 {
            return Self { radius, phi: 0.0, theta: 0.0 };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vector3<f32> {
        let sin_phi = self.phi.sin();
        Vector3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Damped orbit around a target point
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3f,
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
}

impl OrbitControls {
    pub fn new(min_distance: f32, max_distance: f32) -> Self {
        Self {
            target: Point3f::origin(),
            min_distance,
            max_distance,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            ..Self::new(config.min_distance, config.max_distance)
        }
    }

    /// Move the orbit center. Takes effect at the next `update`.
    pub fn set_target(&mut self, target: Point3f) {
        self.target = target;
    }

    /// Queue a rotation from a pointer drag of `dx`, `dy` pixels in a
    /// viewport `viewport_height` pixels tall. A full-height drag is one
    /// revolution.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: u32) {
        let height = viewport_height.max(1) as f32;
        self.theta_delta -= 2.0 * PI * dx / height * self.rotate_speed;
        self.phi_delta -= 2.0 * PI * dy / height * self.rotate_speed;
    }

    /// Queue a dolly. Positive steps move closer.
    pub fn zoom(&mut self, steps: f32) {
        self.scale *= 0.95f32.powf(self.zoom_speed * steps);
    }

    /// True while damped motion is still settling
    pub fn is_moving(&self) -> bool {
        self.theta_delta.abs() > 1e-6 || self.phi_delta.abs() > 1e-6 || (self.scale - 1.0).abs() > 1e-6
    }

    /// Apply queued motion to the camera. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let offset = camera.position - self.target;
        let mut spherical = Spherical::from_offset(&offset);

        let step = if self.enable_damping { self.damping_factor } else { 1.0 };
        spherical.theta += self.theta_delta * step;
        spherical.phi = (spherical.phi + self.phi_delta * step).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        if self.enable_damping {
            self.theta_delta *= 1.0 - self.damping_factor;
            self.phi_delta *= 1.0 - self.damping_factor;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
        }
        self.scale = 1.0;

        let position = self.target + spherical.to_offset();
        let moved = (position - camera.position).norm_squared() > 1e-12 || camera.target != self.target;
        camera.position = position;
        camera.target = self.target;
        moved
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}
