//! Axis-aligned bounding boxes

use crate::point::*;
use crate::ray::Ray;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
///
/// An empty box has `min = +inf` and `max = -inf` on every axis, so that
/// expanding it by any point yields that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: Point3f, max: Point3f) -> Self {
        Self { min, max }
    }

    /// Create an empty box that contains nothing
    pub fn empty() -> Self {
        Self {
            min: Point3f::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3f::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Smallest box containing all `points`
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3f>,
    {
        let mut aabb = Self::empty();
        for p in points {
            aabb.expand_point(p);
        }
        aabb
    }

    /// True if no point has been added
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Expand the box to include a point
    pub fn expand_point(&mut self, p: &Point3f) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Aabb::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Edge lengths; zero for an empty box
    pub fn size(&self) -> Vector3f {
        if self.is_empty() {
            return Vector3f::zeros();
        }
        self.max - self.min
    }

    /// Center point; the origin for an empty box
    pub fn center(&self) -> Point3f {
        if self.is_empty() {
            return Point3f::origin();
        }
        nalgebra::center(&self.min, &self.max)
    }

    /// Largest edge length
    pub fn max_dimension(&self) -> f32 {
        self.size().max()
    }

    /// The box after a uniform scale about the origin followed by a translation
    pub fn scaled_translated(&self, scale: f32, translation: &Vector3f) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let a = self.min * scale + translation;
        let b = self.max * scale + translation;
        // A negative scale swaps the corners
        Aabb::new(a.inf(&b), a.sup(&b))
    }

    /// Slab test. Returns the entry and exit ray parameters when the ray
    /// crosses the box in front of its origin.
    pub fn ray_intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for i in 0..3 {
            let origin = ray.origin[i];
            let dir = ray.direction[i];
            if dir.abs() < 1e-12 {
                // Parallel to this slab
                if origin < self.min[i] || origin > self.max[i] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let mut t0 = (self.min[i] - origin) * inv;
            let mut t1 = (self.max[i] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 {
            None
        } else {
            Some((t_near.max(0.0), t_far))
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_box() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert_eq!(aabb.size(), Vector3f::zeros());
        assert_eq!(aabb.center(), Point3f::origin());
        assert_eq!(aabb.max_dimension(), 0.0);
    }

    #[test]
    fn test_from_points() {
        let points = [
            Point3f::new(-1.0, 2.0, 0.5),
            Point3f::new(3.0, -2.0, 1.5),
            Point3f::new(0.0, 0.0, -0.5),
        ];
        let aabb = Aabb::from_points(&points);
        assert_eq!(aabb.min, Point3f::new(-1.0, -2.0, -0.5));
        assert_eq!(aabb.max, Point3f::new(3.0, 2.0, 1.5));
        assert_relative_eq!(aabb.max_dimension(), 4.0);
        assert_eq!(aabb.center(), Point3f::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn test_single_point_has_zero_size() {
        let aabb = Aabb::from_points(&[Point3f::new(1.0, 1.0, 1.0)]);
        assert!(!aabb.is_empty());
        assert_eq!(aabb.max_dimension(), 0.0);
    }

    #[test]
    fn test_union_with_empty() {
        let a = Aabb::new(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0));
        assert_eq!(a.union(&Aabb::empty()), a);
        assert_eq!(Aabb::empty().union(&a), a);
    }

    #[test]
    fn test_scaled_translated() {
        let a = Aabb::new(Point3f::new(-1.0, 0.0, -1.0), Point3f::new(1.0, 2.0, 1.0));
        let b = a.scaled_translated(2.0, &Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(b.min, Point3f::new(-2.0, 1.0, -2.0));
        assert_eq!(b.max, Point3f::new(2.0, 5.0, 2.0));
    }

    #[test]
    fn test_ray_slab() {
        let a = Aabb::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let hit = Ray::new(Point3f::new(0.0, 0.0, 5.0), -Vector3f::z());
        let (t0, t1) = a.ray_intersect(&hit).unwrap();
        assert_relative_eq!(t0, 4.0);
        assert_relative_eq!(t1, 6.0);

        let miss = Ray::new(Point3f::new(3.0, 0.0, 5.0), -Vector3f::z());
        assert!(a.ray_intersect(&miss).is_none());

        let behind = Ray::new(Point3f::new(0.0, 0.0, 5.0), Vector3f::z());
        assert!(a.ray_intersect(&behind).is_none());
    }
}
