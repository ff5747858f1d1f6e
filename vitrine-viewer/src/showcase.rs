//! The showcase modal
//!
//! Owns the project registry, the model loader and at most one viewer
//! session. Opening a project disposes the current session before the next
//! one is built. Closing hides the modal at once and tears the session down
//! after the close delay, so the fade-out still has something to show.

use std::time::Instant;
use vitrine_core::{ProjectRecord, ProjectRegistry, Result};
use vitrine_io::{LoadCompletion, ModelLoader};
use crate::config::ViewerConfig;
use crate::host::Host;
use crate::session::{LoaderStatus, SessionId, ViewerSession};
use crate::surface::{Container, SurfaceFactory};

/// What the modal shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub visible: bool,
    pub title: String,
    /// Loader text; `None` once the model is shown
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTeardown {
    session: SessionId,
    due: Instant,
}

/// Modal controller for the project gallery
pub struct Showcase<F: SurfaceFactory> {
    registry: ProjectRegistry,
    factory: F,
    loader: ModelLoader,
    config: ViewerConfig,
    modal: ModalState,
    session: Option<ViewerSession<F::Surface>>,
    /// Set between `request_close` and the teardown
    closing: bool,
    pending_teardown: Option<PendingTeardown>,
    next_session: SessionId,
}

impl<F: SurfaceFactory> Showcase<F> {
    pub fn new(registry: ProjectRegistry, factory: F, loader: ModelLoader, config: ViewerConfig) -> Self {
        Self {
            registry,
            factory,
            loader,
            config,
            modal: ModalState::default(),
            session: None,
            closing: false,
            pending_teardown: None,
            next_session: 1,
        }
    }

    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn session(&self) -> Option<&ViewerSession<F::Surface>> {
        self.session.as_ref()
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Open the viewer for project `id`. Returns `Ok(false)` for unknown
    /// projects and projects without a model. A setup failure is shown in
    /// the modal and also returned.
    pub fn open_project<C, H>(&mut self, id: u32, container: &C, host: &mut H) -> Result<bool>
    where
        C: Container + ?Sized,
        H: Host + ?Sized,
    {
        let Some(project) = self.registry.get(id) else {
            log::warn!("no project with id {}", id);
            return Ok(false);
        };
        let Some(model_path) = project.model_path else {
            log::debug!("project {} has no model", project.title);
            return Ok(false);
        };

        self.show_modal(project);
        self.teardown();

        let session_id = self.next_session;
        self.next_session += 1;
        let path = self.config.resolve_asset(model_path);

        match ViewerSession::open(session_id, path.clone(), container, &mut self.factory, host, &self.config) {
            Ok(session) => {
                self.modal.status = session.status().text();
                self.session = Some(session);
                self.loader.request(session_id, path);
                Ok(true)
            }
            Err(e) => {
                log::error!("could not open viewer for {}: {}", project.title, e);
                self.modal.status = Some(format!("Error: {}", e));
                Err(e)
            }
        }
    }

    fn show_modal(&mut self, project: &ProjectRecord) {
        self.modal.visible = true;
        self.modal.title = project.title.to_string();
        self.modal.status = None;
        self.closing = false;
        self.pending_teardown = None;
    }

    /// Hide the modal now and schedule the teardown. A teardown already
    /// scheduled for the current session keeps its deadline.
    pub fn request_close(&mut self, now: Instant) {
        self.modal.visible = false;
        if let Some(session) = &self.session {
            if self.pending_teardown.is_some_and(|p| p.session == session.id()) {
                return;
            }
            self.closing = true;
            self.pending_teardown = Some(PendingTeardown {
                session: session.id(),
                due: now + self.config.close_delay(),
            });
            log::debug!("session #{} closing", session.id());
        }
    }

    /// When the scheduled teardown is due, if one is pending
    pub fn teardown_due(&self) -> Option<Instant> {
        self.pending_teardown.map(|p| p.due)
    }

    /// True while the current session waits for its model
    pub fn is_loading(&self) -> bool {
        !self.closing && self.session.as_ref().is_some_and(|s| *s.status() == LoaderStatus::Loading)
    }

    /// Run a teardown that has come due. Returns true if one ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending_teardown {
            Some(pending) if pending.due <= now => {
                self.pending_teardown = None;
                if self.session.as_ref().map(ViewerSession::id) == Some(pending.session) {
                    self.teardown();
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Dispose the current session right away
    pub fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
        }
        self.closing = false;
    }

    /// Deliver finished loads. Returns how many reached the current session.
    pub fn poll_loads(&mut self) -> usize {
        let mut applied = 0;
        for completion in self.loader.poll() {
            if self.deliver(completion) {
                applied += 1;
            }
        }
        applied
    }

    fn deliver(&mut self, completion: LoadCompletion) -> bool {
        let LoadCompletion { ticket, path, result } = completion;
        match self.session.as_mut() {
            Some(session) if session.id() == ticket && !self.closing => {
                session.on_model_loaded(result);
                self.modal.status = session.status().text();
                true
            }
            _ => {
                log::debug!("discarding stale load #{} of {}", ticket, path.display());
                false
            }
        }
    }

    /// Draw a frame of the current session
    pub fn frame(&mut self) -> Result<()> {
        match self.session.as_mut() {
            Some(session) => session.frame(),
            None => Ok(()),
        }
    }

    pub fn handle_resize<C: Container + ?Sized>(&mut self, container: &C) {
        if let Some(session) = self.session.as_mut() {
            session.handle_resize(container);
        }
    }

    pub fn focus_at(&mut self, x: f32, y: f32) -> bool {
        self.session.as_mut().is_some_and(|s| s.focus_at(x, y))
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if let Some(session) = self.session.as_mut() {
            session.rotate(dx, dy);
        }
    }

    pub fn zoom(&mut self, steps: f32) {
        if let Some(session) = self.session.as_mut() {
            session.zoom(steps);
        }
    }
}

impl<F: SurfaceFactory> std::fmt::Debug for Showcase<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Showcase")
            .field("modal", &self.modal)
            .field("session", &self.session)
            .field("closing", &self.closing)
            .field("loader", &self.loader)
            .finish()
    }
}
