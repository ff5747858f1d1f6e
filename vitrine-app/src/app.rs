//! The showcase window

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

use vitrine_core::ProjectRegistry;
use vitrine_io::ModelLoader;
use vitrine_viewer::{Container, EventHost, Showcase, SurfaceFactory, ViewerConfig, WgpuSurfaceFactory};

use crate::input::{gallery_slot, wheel_steps, DoubleClickDetector, DragTracker};

const WINDOW_TITLE: &str = "vitrine";

/// The window's client area
struct WindowContainer<'a>(&'a Window);

impl Container for WindowContainer<'_> {
    fn client_size(&self) -> (u32, u32) {
        let size = self.0.inner_size();
        (size.width, size.height)
    }
}

/// Open the window and run until it is closed
pub fn run(config: ViewerConfig, initial_project: Option<u32>) -> Result<()> {
    let registry = ProjectRegistry::builtin();
    for (slot, project) in registry.iter().enumerate() {
        log::info!(
            "[{}] {}{}",
            slot + 1,
            project.title,
            if project.is_viewable() { "" } else { " (no model)" }
        );
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 800.0))
            .build(&event_loop)
            .context("failed to create window")?,
    );

    let factory = WgpuSurfaceFactory::new(Arc::clone(&window), config.msaa);
    let mut showcase = Showcase::new(registry, factory, ModelLoader::with_defaults(), config);
    let mut host = EventHost::new();
    let mut drag = DragTracker::default();
    let mut double_click = DoubleClickDetector::default();

    if let Some(id) = initial_project {
        open(&mut showcase, id, &window, &mut host);
    }

    event_loop.run(move |event, target| {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    showcase.teardown();
                    target.exit();
                }
                WindowEvent::Resized(_) => {
                    if host.active_resize_listeners() > 0 {
                        showcase.handle_resize(&WindowContainer(&window));
                    }
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => {
                    let pressed = state == ElementState::Pressed;
                    drag.set_pressed(pressed);
                    if let (true, Some(cursor)) = (pressed, drag.cursor()) {
                        if double_click.click(Instant::now(), cursor) {
                            showcase.focus_at(cursor.0 as f32, cursor.1 as f32);
                        }
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let PhysicalPosition { x, y } = position;
                    if let Some((dx, dy)) = drag.moved((x, y)) {
                        showcase.rotate(dx, dy);
                    }
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    showcase.zoom(wheel_steps(delta));
                }
                WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                    // The title follows the modal even when no loop is running
                    window.request_redraw();
                    match &event.logical_key {
                        Key::Named(NamedKey::Escape) => showcase.request_close(Instant::now()),
                        key => {
                            let project = gallery_slot(key).and_then(|slot| showcase.registry().nth(slot));
                            if let Some(project) = project {
                                open(&mut showcase, project.id, &window, &mut host);
                            }
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    showcase.poll_loads();
                    showcase.tick(Instant::now());
                    if host.has_active_loop() {
                        if let Err(e) = showcase.frame() {
                            log::error!("render error: {}", e);
                        }
                    }
                    window.set_title(&window_title(&showcase));
                }
                _ => {}
            },
            Event::AboutToWait => {
                let busy = host.has_active_loop() || showcase.is_loading();
                let (flow, redraw) = next_wake(busy, showcase.teardown_due(), Instant::now());
                target.set_control_flow(flow);
                if redraw {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}

/// How long the loop may sleep, and whether to draw before it does
fn next_wake(busy: bool, teardown_due: Option<Instant>, now: Instant) -> (ControlFlow, bool) {
    if busy {
        return (ControlFlow::Poll, true);
    }
    match teardown_due {
        Some(due) => (ControlFlow::WaitUntil(due), due <= now),
        None => (ControlFlow::Wait, false),
    }
}

fn open<F: SurfaceFactory>(showcase: &mut Showcase<F>, id: u32, window: &Window, host: &mut EventHost) {
    // Setup errors are already shown in the modal status
    if let Err(e) = showcase.open_project(id, &WindowContainer(window), host) {
        log::warn!("project {} did not open: {}", id, e);
    }
}

fn window_title<F: SurfaceFactory>(showcase: &Showcase<F>) -> String {
    let modal = showcase.modal();
    if !modal.visible {
        return WINDOW_TITLE.to_string();
    }
    match &modal.status {
        Some(status) => format!("{} - {} - {}", WINDOW_TITLE, modal.title, status),
        None => format!("{} - {}", WINDOW_TITLE, modal.title),
    }
}
