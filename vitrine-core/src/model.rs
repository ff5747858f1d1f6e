//! Loaded models as the viewer sees them

use crate::bounds::Aabb;
use crate::mesh::TriangleMesh;
use crate::point::*;
use crate::ray::{Ray, RayHit};
use crate::transform::NodeTransform;
use serde::{Deserialize, Serialize};

/// A loaded model: a set of meshes already baked into model space, placed
/// in the world by a single root transform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelNode {
    pub name: String,
    pub meshes: Vec<TriangleMesh>,
    pub transform: NodeTransform,
}

impl ModelNode {
    pub fn new(name: impl Into<String>, meshes: Vec<TriangleMesh>) -> Self {
        Self {
            name: name.into(),
            meshes,
            transform: NodeTransform::identity(),
        }
    }

    /// Total vertex count across meshes
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(TriangleMesh::vertex_count).sum()
    }

    /// Total face count across meshes
    pub fn face_count(&self) -> usize {
        self.meshes.iter().map(TriangleMesh::face_count).sum()
    }

    /// True if there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.meshes.iter().all(TriangleMesh::is_empty)
    }

    /// Bounding box in model space, ignoring the root transform
    pub fn local_bounds(&self) -> Aabb {
        self.meshes
            .iter()
            .fold(Aabb::empty(), |acc, mesh| acc.union(&Aabb::from_points(&mesh.vertices)))
    }

    /// Bounding box in world space
    pub fn world_bounds(&self) -> Aabb {
        self.local_bounds()
            .scaled_translated(self.transform.scale, &self.transform.translation)
    }

    /// Nearest intersection of a world-space ray with any triangle
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        self.world_bounds().ray_intersect(ray)?;

        let mut nearest: Option<f32> = None;
        for mesh in &self.meshes {
            for triangle in mesh.triangles() {
                let world = triangle.map(|p| self.transform.apply(&p));
                if let Some(t) = ray.intersect_triangle(&world) {
                    if nearest.map_or(true, |best| t < best) {
                        nearest = Some(t);
                    }
                }
            }
        }

        nearest.map(|distance| RayHit {
            distance,
            point: ray.point_at(distance),
        })
    }
}
