//! Point, vector and colour types

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use bytemuck::{Pod, Zeroable};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// An 8-bit sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

unsafe impl Pod for Rgb {}
unsafe impl Zeroable for Rgb {}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Packed `0xRRGGBB` value
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Normalized channels in `[0, 1]`, still in sRGB encoding
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Channels converted to linear light
    pub fn to_linear(self) -> [f32; 3] {
        let decode = |c: f32| {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        let [r, g, b] = self.to_f32();
        [decode(r), decode(g), decode(b)]
    }

    /// Quantize normalized channels, clamping out-of-range input
    pub fn from_f32(rgb: [f32; 3]) -> Self {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(q(rgb[0]), q(rgb[1]), q(rgb[2]))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let c = Rgb::from_hex(0x2563eb);
        assert_eq!(c, Rgb::new(0x25, 0x63, 0xeb));
        assert_eq!(c.to_hex(), 0x2563eb);
        assert_eq!(c.to_string(), "#2563eb");
    }

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(Rgb::new(0, 0, 0).to_linear(), [0.0, 0.0, 0.0]);
        let white = Rgb::WHITE.to_linear();
        for c in white {
            assert!((c - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_from_f32_clamps() {
        assert_eq!(Rgb::from_f32([2.0, -1.0, 0.5]), Rgb::new(255, 0, 128));
    }
}
