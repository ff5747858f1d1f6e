//! Test doubles shared by the viewer integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use vitrine_core::{Error, ModelNode, Point3f, Result, TriangleMesh};
use vitrine_io::{LoadMode, ModelLoader, ModelSource};
use vitrine_viewer::{
    Camera, Container, Host, RenderSurface, Registration, RegistrationHandle, RegistrationKind, Scene,
    SurfaceFactory,
};

/// Container with a fixed client size
#[derive(Debug, Clone, Copy)]
pub struct FixedContainer {
    pub width: u32,
    pub height: u32,
}

impl FixedContainer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Container for FixedContainer {
    fn client_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Counters shared between a factory and the surfaces it made
#[derive(Debug, Default)]
pub struct SurfaceStats {
    pub created: Cell<u32>,
    pub disposed: Cell<u32>,
    pub frames: Cell<u32>,
    pub last_model_revision: Cell<u64>,
}

#[derive(Debug)]
pub struct MockSurface {
    size: (u32, u32),
    disposed: bool,
    stats: Rc<SurfaceStats>,
}

impl RenderSurface for MockSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn render(&mut self, scene: &Scene, _camera: &Camera) -> Result<()> {
        if self.disposed {
            return Err(Error::Gpu("render after dispose".to_string()));
        }
        self.stats.frames.set(self.stats.frames.get() + 1);
        self.stats.last_model_revision.set(scene.revision());
        Ok(())
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.stats.disposed.set(self.stats.disposed.get() + 1);
        }
    }
}

#[derive(Debug, Default)]
pub struct MockSurfaceFactory {
    pub stats: Rc<SurfaceStats>,
    pub fail: bool,
}

impl MockSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl SurfaceFactory for MockSurfaceFactory {
    type Surface = MockSurface;

    fn create_surface(&mut self, width: u32, height: u32, _scene: &Scene) -> Result<MockSurface> {
        if self.fail {
            return Err(Error::Setup("no adapter available".to_string()));
        }
        self.stats.created.set(self.stats.created.get() + 1);
        Ok(MockSurface {
            size: (width, height),
            disposed: false,
            stats: Rc::clone(&self.stats),
        })
    }
}

/// Host that remembers every registration it issued
#[derive(Debug, Default)]
pub struct CountingHost {
    pub loops: Vec<RegistrationHandle>,
    pub resize_listeners: Vec<RegistrationHandle>,
}

impl CountingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_loops(&self) -> usize {
        self.loops.iter().filter(|h| h.is_active()).count()
    }

    pub fn active_resize_listeners(&self) -> usize {
        self.resize_listeners.iter().filter(|h| h.is_active()).count()
    }
}

impl Host for CountingHost {
    fn request_animation_loop(&mut self) -> Registration {
        let (registration, handle) = Registration::issue(RegistrationKind::AnimationLoop);
        self.loops.push(handle);
        registration
    }

    fn add_resize_listener(&mut self) -> Registration {
        let (registration, handle) = Registration::issue(RegistrationKind::ResizeListener);
        self.resize_listeners.push(handle);
        registration
    }
}

/// Axis-aligned box mesh from `min` to `max`, 12 outward-facing triangles
pub fn box_mesh(min: Point3f, max: Point3f) -> TriangleMesh {
    let vertices = vec![
        Point3f::new(min.x, min.y, min.z),
        Point3f::new(max.x, min.y, min.z),
        Point3f::new(max.x, max.y, min.z),
        Point3f::new(min.x, max.y, min.z),
        Point3f::new(min.x, min.y, max.z),
        Point3f::new(max.x, min.y, max.z),
        Point3f::new(max.x, max.y, max.z),
        Point3f::new(min.x, max.y, max.z),
    ];
    let faces = vec![
        [0, 2, 1], [0, 3, 2], // back
        [4, 5, 6], [4, 6, 7], // front
        [0, 1, 5], [0, 5, 4], // bottom
        [3, 7, 6], [3, 6, 2], // top
        [0, 4, 7], [0, 7, 3], // left
        [1, 2, 6], [1, 6, 5], // right
    ];
    TriangleMesh::from_vertices_and_faces(vertices, faces)
}

/// A crate-sized box in centimetres, off to one side
pub fn crate_model() -> ModelNode {
    ModelNode::new(
        "crate",
        vec![box_mesh(Point3f::new(100.0, 20.0, -40.0), Point3f::new(300.0, 120.0, 60.0))],
    )
}

/// Model source keyed on the file name
#[derive(Debug, Default)]
pub struct StubSource;

impl ModelSource for StubSource {
    fn read_model(&self, path: &Path) -> Result<ModelNode> {
        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        match name {
            "broken" => Err(Error::Load("unexpected end of GLB chunk".to_string())),
            "empty" => Ok(ModelNode::new("empty", vec![])),
            _ => {
                let mut model = crate_model();
                model.name = name.to_string();
                Ok(model)
            }
        }
    }
}

/// Loader whose completions are ready at the next poll
pub fn inline_loader() -> ModelLoader {
    ModelLoader::new(Arc::new(StubSource), LoadMode::Inline)
}
