//! Pointer picking

use vitrine_core::{ModelNode, Ray, RayHit};
use crate::camera::Camera;

/// Convert a pointer position in pixels (origin top-left) to normalized
/// device coordinates. `None` for an empty viewport.
pub fn pointer_to_ndc(x: f32, y: f32, width: u32, height: u32) -> Option<(f32, f32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let ndc_x = (x / width as f32) * 2.0 - 1.0;
    let ndc_y = -(y / height as f32) * 2.0 + 1.0;
    Some((ndc_x, ndc_y))
}

/// Ray from the camera through a pointer position
pub fn pointer_ray(camera: &Camera, x: f32, y: f32, width: u32, height: u32) -> Option<Ray> {
    let (ndc_x, ndc_y) = pointer_to_ndc(x, y, width, height)?;
    camera.unproject(ndc_x, ndc_y)
}

/// Nearest point of `model` under the pointer
pub fn pick(camera: &Camera, model: &ModelNode, x: f32, y: f32, width: u32, height: u32) -> Option<RayHit> {
    let ray = pointer_ray(camera, x, y, width, height)?;
    model.raycast(&ray)
}
