//! Rendering surfaces
//!
//! A session draws through a [`RenderSurface`] made by a [`SurfaceFactory`],
//! sized from a [`Container`]. The wgpu implementation presents to a window;
//! tests substitute their own.

use crate::camera::Camera;
use crate::scene::Scene;
use vitrine_core::{Error, Result};
use vitrine_gpu::{StudioRenderConfig, StudioRenderer};

/// The area a viewer is shown in
pub trait Container {
    /// Client size in physical pixels
    fn client_size(&self) -> (u32, u32);
}

impl Container for (u32, u32) {
    fn client_size(&self) -> (u32, u32) {
        *self
    }
}

/// A drawable attached to a container
pub trait RenderSurface {
    fn size(&self) -> (u32, u32);
    fn resize(&mut self, width: u32, height: u32);
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()>;
    /// Release GPU resources and detach. Must be safe to call more than once.
    fn dispose(&mut self);
}

/// Creates surfaces for new sessions
pub trait SurfaceFactory {
    type Surface: RenderSurface;

    fn create_surface(&mut self, width: u32, height: u32, scene: &Scene) -> Result<Self::Surface>;
}

/// Surface presenting to a window through [`StudioRenderer`]
pub struct WgpuSurface {
    renderer: Option<StudioRenderer<'static>>,
    uploaded_revision: u64,
    size: (u32, u32),
}

impl WgpuSurface {
    fn sync_model(renderer: &mut StudioRenderer<'static>, scene: &Scene) {
        match scene.model() {
            Some(model) => renderer.upload_model(model),
            None if renderer.has_model() => renderer.release_model(),
            None => {}
        }
    }
}

impl RenderSurface for WgpuSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(width, height);
        }
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        let renderer = self
            .renderer
            .as_mut()
            .ok_or_else(|| Error::Gpu("render on a disposed surface".to_string()))?;

        if scene.revision() != self.uploaded_revision {
            Self::sync_model(renderer, scene);
            self.uploaded_revision = scene.revision();
        }
        renderer.update_camera(camera.view_matrix(), camera.projection_matrix(), camera.position);
        renderer.render()
    }

    fn dispose(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            if renderer.has_model() {
                renderer.release_model();
            }
            log::debug!("surface disposed");
        }
    }
}

impl Drop for WgpuSurface {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Makes [`WgpuSurface`]s on one window
pub struct WgpuSurfaceFactory<W> {
    window: W,
    config: StudioRenderConfig,
}

impl<W> WgpuSurfaceFactory<W>
where
    W: wgpu::WindowHandle + Clone + 'static,
{
    pub fn new(window: W, msaa: bool) -> Self {
        Self {
            window,
            config: StudioRenderConfig {
                enable_multisampling: msaa,
                ..Default::default()
            },
        }
    }
}

impl<W> SurfaceFactory for WgpuSurfaceFactory<W>
where
    W: wgpu::WindowHandle + Clone + 'static,
{
    type Surface = WgpuSurface;

    fn create_surface(&mut self, width: u32, height: u32, scene: &Scene) -> Result<WgpuSurface> {
        let [r, g, b] = scene.background.to_linear();
        let config = StudioRenderConfig {
            background_color: [r as f64, g as f64, b as f64],
            ..self.config.clone()
        };
        let mut renderer = pollster::block_on(StudioRenderer::new(self.window.clone(), width, height, config))
            .map_err(|e| Error::Setup(format!("could not create rendering surface: {}", e)))?;

        let environment = &scene.environment;
        renderer.set_environment(environment.width, environment.height, &environment.texels)?;
        renderer.set_lighting(&scene.lights.to_uniform());

        Ok(WgpuSurface {
            renderer: Some(renderer),
            uploaded_revision: 0,
            size: (width, height),
        })
    }
}
