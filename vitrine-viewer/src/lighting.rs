//! Studio light rig

use vitrine_core::{Point3f, Rgb, Vector3f};
use vitrine_gpu::{DirectionalLightRaw, LightingUniform, MAX_DIRECTIONAL_LIGHTS};

/// Uniform light from every direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

/// Parallel light shining from `position` towards the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Point3f,
}

impl DirectionalLight {
    pub fn new(color: Rgb, intensity: f32, position: Point3f) -> Self {
        Self { color, intensity, position }
    }

    /// Unit vector from the origin towards the light
    pub fn direction(&self) -> Vector3f {
        self.position.coords.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::y)
    }

    fn to_raw(self) -> DirectionalLightRaw {
        let d = self.direction();
        DirectionalLightRaw {
            direction: [d.x, d.y, d.z],
            intensity: self.intensity,
            color: self.color.to_linear(),
            _padding: 0.0,
        }
    }
}

/// Ambient fill plus a key, fill and rim light
#[derive(Debug, Clone, PartialEq)]
pub struct StudioRig {
    pub ambient: AmbientLight,
    pub directional: Vec<DirectionalLight>,
    /// Weight of the environment map in shading
    pub environment_intensity: f32,
    pub exposure: f32,
}

impl StudioRig {
    /// The three-point rig used for every project
    pub fn studio() -> Self {
        Self {
            ambient: AmbientLight {
                color: Rgb::WHITE,
                intensity: 0.5,
            },
            directional: vec![
                // key
                DirectionalLight::new(Rgb::WHITE, 1.5, Point3f::new(5.0, 10.0, 7.5)),
                // fill
                DirectionalLight::new(Rgb::WHITE, 0.7, Point3f::new(-5.0, 5.0, 5.0)),
                // rim
                DirectionalLight::new(Rgb::WHITE, 1.0, Point3f::new(0.0, 5.0, -10.0)),
            ],
            environment_intensity: 1.0,
            exposure: 1.0,
        }
    }

    /// Pack the rig into the shader's lighting block
    pub fn to_uniform(&self) -> LightingUniform {
        if self.directional.len() > MAX_DIRECTIONAL_LIGHTS {
            log::warn!(
                "{} directional lights requested, only the first {} are used",
                self.directional.len(),
                MAX_DIRECTIONAL_LIGHTS
            );
        }

        let mut uniform = LightingUniform {
            ambient_color: self.ambient.color.to_linear(),
            ambient_intensity: self.ambient.intensity,
            environment_intensity: self.environment_intensity,
            exposure: self.exposure,
            ..Default::default()
        };
        for (slot, light) in uniform.lights.iter_mut().zip(&self.directional) {
            *slot = light.to_raw();
        }
        uniform.light_count = self.directional.len().min(MAX_DIRECTIONAL_LIGHTS) as u32;
        uniform
    }
}

impl Default for StudioRig {
    fn default() -> Self {
        Self::studio()
    }
}
