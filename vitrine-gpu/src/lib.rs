//! # vitrine GPU
//!
//! wgpu backend for the showcase viewer: device setup and a mesh renderer
//! tuned for studio-lit product shots.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use vitrine_gpu::GpuContext;
//!
//! fn main() -> vitrine_core::Result<()> {
//!     let gpu = pollster::block_on(GpuContext::new())?;
//!     println!("adapter: {:?}", gpu.adapter.get_info().name);
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod mesh;

// Re-export commonly used items
pub use device::GpuContext;
pub use mesh::{
    mesh_to_gpu_mesh, DirectionalLightRaw, GpuMesh, LightingUniform, MeshVertex, StudioRenderConfig,
    StudioRenderer, MAX_DIRECTIONAL_LIGHTS,
};
