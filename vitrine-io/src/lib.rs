//! Model loading for vitrine
//!
//! Models are binary glTF scenes. Parsing is delegated to the `gltf` crate;
//! this crate flattens the scene into a [`ModelNode`] and runs loads on
//! worker threads so the render loop never waits on disk.

pub mod error;
pub mod glb;
pub mod registry;
pub mod loader;

#[cfg(test)]
mod tests;

pub use error::*;
pub use glb::GlbReader;
pub use registry::{ModelReader, ReaderRegistry};
pub use loader::{LoadCompletion, LoadMode, ModelLoader, ModelSource};

use vitrine_core::{ModelNode, Result};

/// Auto-detect format and read a model with the default registry
pub fn read_model<P: AsRef<std::path::Path>>(path: P) -> Result<ModelNode> {
    ReaderRegistry::with_defaults().read_model(path.as_ref())
}
