//! Reader registry for format-agnostic model loading
//!
//! Readers are keyed by lowercase file extension. When the extension is
//! unknown the registry falls back to asking each reader whether it
//! recognises the file header.

use crate::glb::GlbReader;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use vitrine_core::{Error, ModelNode, Result};

/// Trait for reading models from files
pub trait ModelReader: Send + Sync {
    /// Read a model from the given path
    fn read_model(&self, path: &Path) -> Result<ModelNode>;

    /// Check if this reader can handle the given file by examining its header
    fn can_read(&self, path: &Path) -> bool;

    /// Get the format name this reader handles
    fn format_name(&self) -> &'static str;

    /// File extensions this reader claims
    fn extensions(&self) -> &[&'static str];
}

/// Registry that maps file extensions to readers
#[derive(Default, Clone)]
pub struct ReaderRegistry {
    readers: HashMap<String, Arc<dyn ModelReader>>,
}

impl ReaderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
        }
    }

    /// Registry with every built-in reader
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GlbReader));
        registry
    }

    /// Register a reader under all of its extensions
    pub fn register(&mut self, reader: Arc<dyn ModelReader>) {
        for ext in reader.extensions() {
            self.readers.insert(ext.to_lowercase(), reader.clone());
        }
    }

    /// Read a model, picking the reader by extension, then by header
    pub fn read_model(&self, path: &Path) -> Result<ModelNode> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase);

        if let Some(reader) = ext.as_deref().and_then(|e| self.readers.get(e)) {
            return reader.read_model(path);
        }

        if !path.exists() {
            return Err(Error::Load(format!("File not found: {}", path.display())));
        }

        if let Some(reader) = self.readers.values().find(|r| r.can_read(path)) {
            log::debug!("{} detected by header as {}", path.display(), reader.format_name());
            return reader.read_model(path);
        }

        Err(Error::UnsupportedFormat(format!(
            "No model reader for {:?}",
            path.extension().unwrap_or_default()
        )))
    }

    /// Check if an extension is supported
    pub fn supports(&self, extension: &str) -> bool {
        self.readers.contains_key(&extension.to_lowercase())
    }

    /// Supported extensions, sorted
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self.readers.keys().cloned().collect();
        exts.sort();
        exts
    }
}

impl std::fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderRegistry")
            .field("extensions", &self.supported_extensions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::glb_fixture::{triangle_glb, GlbFixture, TempDir};

    #[test]
    fn test_defaults_cover_gltf() {
        let registry = ReaderRegistry::with_defaults();
        assert!(registry.supports("GLB"));
        assert!(registry.supports("gltf"));
        assert!(!registry.supports("obj"));
        assert_eq!(registry.supported_extensions(), vec!["glb", "gltf"]);
    }

    #[test]
    fn test_read_by_extension() {
        let dir = TempDir::new("registry-ext");
        let path = dir.write("tri.glb", &triangle_glb(&GlbFixture::default()));
        let model = ReaderRegistry::with_defaults().read_model(&path).unwrap();
        assert_eq!(model.name, "tri");
        assert_eq!(model.face_count(), 1);
    }

    #[test]
    fn test_read_by_header() {
        let dir = TempDir::new("registry-header");
        let path = dir.write("tri.bin", &triangle_glb(&GlbFixture::default()));
        let model = ReaderRegistry::with_defaults().read_model(&path).unwrap();
        assert_eq!(model.face_count(), 1);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = ReaderRegistry::with_defaults()
            .read_model(Path::new("/definitely/not/here.glb"))
            .unwrap_err();
        assert!(err.is_load());
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_unknown_format() {
        let dir = TempDir::new("registry-unknown");
        let path = dir.write("notes.txt", b"hello");
        let err = ReaderRegistry::with_defaults().read_model(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
