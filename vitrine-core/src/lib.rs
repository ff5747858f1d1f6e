//! Core data structures and traits for vitrine
//!
//! This crate provides the fundamental types shared by the showcase:
//! points and meshes, bounding boxes and rays, the model node that the
//! viewer normalizes, and the static project registry.

pub mod point;
pub mod mesh;
pub mod bounds;
pub mod ray;
pub mod model;
pub mod traits;
pub mod transform;
pub mod project;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use bounds::*;
pub use ray::*;
pub use model::*;
pub use traits::*;
pub use transform::*;
pub use project::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix4};
