//! Core traits for vitrine

use crate::{bounds::Aabb, mesh::*, model::ModelNode, point::*, transform::Transform3D};

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the world-space bounding box of the object
    fn bounding_box(&self) -> Aabb;

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        self.bounding_box().center()
    }
}

/// Trait for objects that can be transformed in place
pub trait Transformable {
    /// Apply a transformation to the object
    fn transform(&mut self, transform: &Transform3D);
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }
}

impl Drawable for ModelNode {
    fn bounding_box(&self) -> Aabb {
        self.world_bounds()
    }
}

impl Transformable for TriangleMesh {
    fn transform(&mut self, transform: &Transform3D) {
        for vertex in &mut self.vertices {
            *vertex = transform.transform_point(vertex);
        }
        if let Some(normals) = &mut self.normals {
            for normal in normals.iter_mut() {
                *normal = transform.transform_normal(normal);
            }
        }
    }
}
