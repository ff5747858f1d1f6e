//! Test modules for vitrine-io
//!
//! Shared fixtures for the reader and loader tests, plus separate-file
//! glTF loading.

pub mod glb_fixture;
