//! Rays and ray/triangle intersection

use crate::point::*;

/// A ray in 3D space defined by an origin and a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3f,
    pub direction: Vector3f,
}

/// Result of a ray query against geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the ray
    pub distance: f32,
    /// World-space hit position
    pub point: Point3f,
}

impl Ray {
    /// Create a new ray. The direction is normalized; a zero direction
    /// falls back to `-Z`.
    pub fn new(origin: Point3f, direction: Vector3f) -> Self {
        let direction = direction
            .try_normalize(1e-12)
            .unwrap_or_else(|| -Vector3f::z());
        Self { origin, direction }
    }

    /// Ray from `origin` through `target`
    pub fn through(origin: Point3f, target: Point3f) -> Self {
        Self::new(origin, target - origin)
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Point3f {
        self.origin + self.direction * t
    }

    /// Moller-Trumbore ray/triangle intersection. Both faces count as hits.
    pub fn intersect_triangle(&self, triangle: &[Point3f; 3]) -> Option<f32> {
        const EPSILON: f32 = 1e-7;

        let edge1 = triangle[1] - triangle[0];
        let edge2 = triangle[2] - triangle[0];
        let h = self.direction.cross(&edge2);
        let a = edge1.dot(&h);
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = self.origin - triangle[0];
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * self.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        if t > EPSILON {
            Some(t)
        } else {
            None
        }
    }
}
