//! Viewer sessions
//!
//! A session is everything one open modal needs: scene, camera, controls,
//! surface and the host registrations that drive it. It is built in one go
//! by [`ViewerSession::open`] and released by [`ViewerSession::close`] or
//! on drop.

use std::path::{Path, PathBuf};
use vitrine_core::{Error, ModelNode, Result};
use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::controls::OrbitControls;
use crate::host::{Host, Registration};
use crate::normalize::normalize_model;
use crate::picking::pick;
use crate::scene::Scene;
use crate::surface::{Container, RenderSurface, SurfaceFactory};

/// Identifies a session; increases with every open
pub type SessionId = u64;

/// What the loader overlay shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderStatus {
    Hidden,
    Loading,
    Error(String),
}

impl LoaderStatus {
    /// Text for the status element, if it is visible
    pub fn text(&self) -> Option<String> {
        match self {
            LoaderStatus::Hidden => None,
            LoaderStatus::Loading => Some("Loading...".to_string()),
            LoaderStatus::Error(message) => Some(format!("Error: {}", message)),
        }
    }
}

/// One live viewer
pub struct ViewerSession<S: RenderSurface> {
    id: SessionId,
    model_path: PathBuf,
    target_size: f32,
    scene: Scene,
    camera: Camera,
    controls: OrbitControls,
    surface: Option<S>,
    resize_listener: Option<Registration>,
    render_loop: Option<Registration>,
    status: LoaderStatus,
}

impl<S: RenderSurface> ViewerSession<S> {
    /// Build the viewer for `model_path` inside `container`. Fails before
    /// anything is registered with the host if the container is empty or the
    /// surface cannot be created.
    pub fn open<F, C, H>(
        id: SessionId,
        model_path: impl Into<PathBuf>,
        container: &C,
        factory: &mut F,
        host: &mut H,
        config: &ViewerConfig,
    ) -> Result<Self>
    where
        F: SurfaceFactory<Surface = S>,
        C: Container + ?Sized,
        H: Host + ?Sized,
    {
        let model_path = model_path.into();
        let (width, height) = container.client_size();
        if width == 0 || height == 0 {
            return Err(Error::Setup(format!(
                "viewer container has no area ({}x{})",
                width, height
            )));
        }

        let scene = Scene::studio(config);
        let camera = Camera::from_config(config, width, height);
        let controls = OrbitControls::from_config(config);
        let surface = factory.create_surface(width, height, &scene)?;

        let resize_listener = host.add_resize_listener();
        // Last, so nothing above can leave a loop behind
        let render_loop = host.request_animation_loop();

        log::info!("session #{} opened for {} at {}x{}", id, model_path.display(), width, height);

        Ok(Self {
            id,
            model_path,
            target_size: config.target_size,
            scene,
            camera,
            controls,
            surface: Some(surface),
            resize_listener: Some(resize_listener),
            render_loop: Some(render_loop),
            status: LoaderStatus::Loading,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn status(&self) -> &LoaderStatus {
        &self.status
    }

    /// True while the render loop registration is live
    pub fn is_running(&self) -> bool {
        self.render_loop.as_ref().is_some_and(Registration::is_active)
    }

    pub fn is_closed(&self) -> bool {
        self.surface.is_none()
    }

    /// Deliver the outcome of the model load
    pub fn on_model_loaded(&mut self, result: Result<ModelNode>) {
        if self.is_closed() {
            log::debug!("session #{} already closed, dropping model", self.id);
            return;
        }
        match result {
            Ok(mut model) => {
                let center = normalize_model(&mut model, self.target_size);
                self.controls.set_target(center);
                log::info!(
                    "session #{} loaded {} ({} vertices, {} faces)",
                    self.id,
                    model.name,
                    model.vertex_count(),
                    model.face_count()
                );
                self.scene.set_model(model);
                self.status = LoaderStatus::Hidden;
            }
            Err(e) => {
                log::error!("session #{} failed to load {}: {}", self.id, self.model_path.display(), e);
                self.status = LoaderStatus::Error(e.to_string());
                if let Some(render_loop) = self.render_loop.take() {
                    render_loop.cancel();
                }
                self.present_still();
            }
        }
    }

    /// Draw a single frame outside the render loop, so a stopped viewer
    /// still shows its background
    fn present_still(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if let Err(e) = surface.render(&self.scene, &self.camera) {
            log::warn!("session #{} could not present still frame: {}", self.id, e);
        }
    }

    /// Advance controls and draw one frame
    pub fn frame(&mut self) -> Result<()> {
        if !self.is_running() {
            return Ok(());
        }
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        self.controls.update(&mut self.camera);
        surface.render(&self.scene, &self.camera)
    }

    /// Follow the container's new size
    pub fn handle_resize<C: Container + ?Sized>(&mut self, container: &C) {
        let (width, height) = container.client_size();
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_viewport(width, height);
        surface.resize(width, height);
        // Nothing else redraws a reconfigured surface once the loop has stopped
        if !self.is_running() {
            self.present_still();
        }
    }

    /// Refocus the orbit on the model point under the pointer. Returns
    /// false, leaving the target alone, when nothing is hit.
    pub fn focus_at(&mut self, x: f32, y: f32) -> bool {
        let (Some(surface), Some(model)) = (self.surface.as_ref(), self.scene.model()) else {
            return false;
        };
        let (width, height) = surface.size();
        match pick(&self.camera, model, x, y, width, height) {
            Some(hit) => {
                log::debug!(
                    "session #{} focus at ({:.3}, {:.3}, {:.3})",
                    self.id,
                    hit.point.x,
                    hit.point.y,
                    hit.point.z
                );
                self.controls.set_target(hit.point);
                true
            }
            None => false,
        }
    }

    /// Orbit by a pointer drag in pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let height = self.surface.as_ref().map_or(1, |s| s.size().1);
        self.controls.rotate(dx, dy, height);
    }

    /// Dolly by wheel steps; positive moves closer
    pub fn zoom(&mut self, steps: f32) {
        self.controls.zoom(steps);
    }

    /// Stop the loop, detach the resize listener and release the surface.
    /// Calling it again does nothing.
    pub fn close(&mut self) {
        let had_surface = self.surface.is_some();
        if let Some(render_loop) = self.render_loop.take() {
            render_loop.cancel();
        }
        if let Some(listener) = self.resize_listener.take() {
            listener.cancel();
        }
        if let Some(mut surface) = self.surface.take() {
            surface.dispose();
        }
        self.scene.take_model();
        if had_surface {
            log::info!("session #{} closed", self.id);
        }
    }
}

impl<S: RenderSurface> Drop for ViewerSession<S> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<S: RenderSurface> std::fmt::Debug for ViewerSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerSession")
            .field("id", &self.id)
            .field("model_path", &self.model_path)
            .field("status", &self.status)
            .field("running", &self.is_running())
            .field("closed", &self.is_closed())
            .finish()
    }
}
