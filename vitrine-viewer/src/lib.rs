//! Interactive viewing for the showcase
//!
//! This crate turns a loaded model into something a user can look at:
//! - A perspective camera with damped orbit controls
//! - A studio light rig and a generated room environment
//! - Model normalization to a canonical size resting on the floor
//! - Double-click picking to refocus the orbit
//! - Viewer sessions with explicit teardown, and the modal controller that
//!   owns at most one of them

pub mod camera;
pub mod config;
pub mod controls;
pub mod environment;
pub mod host;
pub mod lighting;
pub mod normalize;
pub mod picking;
pub mod scene;
pub mod session;
pub mod showcase;
pub mod surface;

pub use camera::*;
pub use config::*;
pub use controls::*;
pub use environment::*;
pub use host::*;
pub use lighting::*;
pub use normalize::*;
pub use picking::*;
pub use scene::*;
pub use session::*;
pub use showcase::*;
pub use surface::*;
