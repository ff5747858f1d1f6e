//! Perspective camera

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};
use vitrine_core::{Point3f, Ray};
use crate::config::ViewerConfig;

/// A perspective camera looking at a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Camera placed as configured, looking at the origin
    pub fn from_config(config: &ViewerConfig, width: u32, height: u32) -> Self {
        let mut camera = Self::new(
            config.camera_position(),
            Point3::origin(),
            Vector3::y(),
            config.fov_degrees.to_radians(),
            1.0,
            config.near,
            config.far,
        );
        camera.set_viewport(width, height);
        camera
    }

    /// Match the aspect ratio to a viewport. Zero-sized viewports are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far).into_inner()
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn distance_to_target(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// World-space ray through a point in normalized device coordinates
    pub fn unproject(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inverse = self.view_projection().try_inverse()?;
        let near = inverse.transform_point(&Point3f::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(&Point3f::new(ndc_x, ndc_y, 1.0));
        Some(Ray::through(near, far))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default(), 16, 9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_config() {
        let camera = Camera::from_config(&ViewerConfig::default(), 800, 400);
        assert_relative_eq!(camera.fov, std::f32::consts::FRAC_PI_4);
        assert_relative_eq!(camera.aspect_ratio, 2.0);
        assert_eq!(camera.position, Point3::new(8.0, 5.0, 8.0));
        assert_eq!(camera.target, Point3::origin());
    }

    #[test]
    fn test_zero_viewport_keeps_aspect() {
        let mut camera = Camera::from_config(&ViewerConfig::default(), 300, 200);
        camera.set_viewport(0, 200);
        assert_relative_eq!(camera.aspect_ratio, 1.5);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::default();
        let ray = camera.unproject(0.0, 0.0).unwrap();
        let expected = (camera.target - camera.position).normalize();
        assert_relative_eq!(ray.direction, expected, epsilon = 1e-4);
        // The ray starts on the near plane
        assert_relative_eq!((ray.origin - camera.position).norm(), camera.near, epsilon = 1e-2);
    }
}
