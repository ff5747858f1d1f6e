//! Generated room environment
//!
//! A small equirectangular radiance map of a neutral studio room: dim floor,
//! light walls, a bright ceiling panel and a few softboxes, blurred so the
//! highlights read as soft reflections. Row 0 is straight up, and
//! longitude follows `atan2(z, x)`, the same mapping the shader uses.

use std::f32::consts::PI;
use vitrine_core::Vector3f;

/// Default texture size
pub const ENVIRONMENT_WIDTH: u32 = 128;
pub const ENVIRONMENT_HEIGHT: u32 = 64;

/// An area light baked into the room
#[derive(Debug, Clone, Copy)]
struct Softbox {
    direction: [f32; 3],
    /// Angular radius in radians
    radius: f32,
    radiance: f32,
}

const SOFTBOXES: [Softbox; 5] = [
    Softbox { direction: [0.0, 1.0, 0.0], radius: 0.45, radiance: 6.0 },
    Softbox { direction: [-1.0, 0.35, 0.2], radius: 0.3, radiance: 3.0 },
    Softbox { direction: [1.0, 0.35, 0.2], radius: 0.3, radiance: 3.0 },
    Softbox { direction: [0.2, 0.4, 1.0], radius: 0.25, radiance: 2.0 },
    Softbox { direction: [0.0, 0.5, -1.0], radius: 0.3, radiance: 2.5 },
];

/// Linear RGBA radiance in equirectangular layout
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    pub width: u32,
    pub height: u32,
    pub texels: Vec<[f32; 4]>,
}

impl EnvironmentMap {
    /// Generate the studio room at the default size with Gaussian blur of
    /// `sigma` radians
    pub fn room(sigma: f32) -> Self {
        Self::generate(ENVIRONMENT_WIDTH, ENVIRONMENT_HEIGHT, sigma)
    }

    pub fn generate(width: u32, height: u32, sigma: f32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut texels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let radiance = room_radiance(&texel_direction(x, y, width, height));
                texels.push([radiance[0], radiance[1], radiance[2], 1.0]);
            }
        }

        let mut map = Self { width, height, texels };
        map.blur(sigma);
        map
    }

    /// Radiance arriving from `direction`
    pub fn sample(&self, direction: &Vector3f) -> [f32; 3] {
        let d = direction.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::y);
        let u = d.z.atan2(d.x) / (2.0 * PI) + 0.5;
        let v = d.y.clamp(-1.0, 1.0).acos() / PI;
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        let t = self.texels[(y * self.width + x) as usize];
        [t[0], t[1], t[2]]
    }

    /// Separable Gaussian blur, wrapping horizontally
    fn blur(&mut self, sigma: f32) {
        let texels_per_radian = self.width as f32 / (2.0 * PI);
        let sigma_texels = sigma * texels_per_radian;
        if !(sigma_texels > 0.1) {
            return;
        }
        let kernel = gaussian_kernel(sigma_texels);
        let radius = (kernel.len() / 2) as i64;
        let (w, h) = (self.width as i64, self.height as i64);

        let mut horizontal = vec![[0.0f32; 4]; self.texels.len()];
        for y in 0..h {
            for x in 0..w {
                let mut acc = [0.0f32; 4];
                for (k, weight) in kernel.iter().enumerate() {
                    let sx = (x + k as i64 - radius).rem_euclid(w);
                    let t = self.texels[(y * w + sx) as usize];
                    for c in 0..4 {
                        acc[c] += t[c] * weight;
                    }
                }
                horizontal[(y * w + x) as usize] = acc;
            }
        }

        for y in 0..h {
            for x in 0..w {
                let mut acc = [0.0f32; 4];
                for (k, weight) in kernel.iter().enumerate() {
                    let sy = (y + k as i64 - radius).clamp(0, h - 1);
                    let t = horizontal[(sy * w + x) as usize];
                    for c in 0..4 {
                        acc[c] += t[c] * weight;
                    }
                }
                self.texels[(y * w + x) as usize] = acc;
            }
        }
    }
}

impl Default for EnvironmentMap {
    fn default() -> Self {
        Self::room(0.04)
    }
}

/// Unit direction through the center of texel (`x`, `y`)
fn texel_direction(x: u32, y: u32, width: u32, height: u32) -> Vector3f {
    let u = (x as f32 + 0.5) / width as f32;
    let v = (y as f32 + 0.5) / height as f32;
    let phi = (u - 0.5) * 2.0 * PI;
    let theta = v * PI;
    Vector3f::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin())
}

fn room_radiance(direction: &Vector3f) -> [f32; 3] {
    // Floor, walls and ceiling blend on height
    let floor = [0.18, 0.17, 0.16];
    let wall = [0.55, 0.55, 0.56];
    let ceiling = [0.7, 0.7, 0.72];
    let y = direction.y;
    let mut radiance = if y < 0.0 {
        let t = (-y * 4.0).min(1.0);
        lerp(wall, floor, t)
    } else {
        lerp(wall, ceiling, y)
    };

    for softbox in &SOFTBOXES {
        let axis = Vector3f::from(softbox.direction).normalize();
        let angle = axis.dot(direction).clamp(-1.0, 1.0).acos();
        if angle < softbox.radius {
            for channel in &mut radiance {
                *channel += softbox.radiance;
            }
        }
    }
    radiance
}

fn lerp(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t, a[2] + (b[2] - a[2]) * t]
}

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as i32;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-(i * i) as f32 / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}
