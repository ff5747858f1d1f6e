//! Host registrations
//!
//! The event loop that drives the viewer hands out a [`Registration`] for
//! each animation loop and resize listener. The session owns the
//! registration; the host keeps a [`RegistrationHandle`] and only ticks
//! registrations that are still live. Cancelling is explicit through
//! [`Registration::cancel`] and implicit on drop.

use std::cell::Cell;
use std::rc::Rc;

/// What a registration keeps alive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    AnimationLoop,
    ResizeListener,
}

#[derive(Debug)]
struct Token {
    kind: RegistrationKind,
    active: Cell<bool>,
    cancellations: Cell<u32>,
}

/// Owning side of a host registration
#[derive(Debug)]
pub struct Registration {
    token: Rc<Token>,
}

impl Registration {
    /// Issue a live registration and the handle the host keeps for it
    pub fn issue(kind: RegistrationKind) -> (Self, RegistrationHandle) {
        let token = Rc::new(Token {
            kind,
            active: Cell::new(true),
            cancellations: Cell::new(0),
        });
        (
            Self {
                token: Rc::clone(&token),
            },
            RegistrationHandle { token },
        )
    }

    pub fn kind(&self) -> RegistrationKind {
        self.token.kind
    }

    pub fn is_active(&self) -> bool {
        self.token.active.get()
    }

    /// Stop the registration. Returns false if it was already stopped.
    pub fn cancel(&self) -> bool {
        if !self.token.active.replace(false) {
            return false;
        }
        self.token.cancellations.set(self.token.cancellations.get() + 1);
        true
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Host side of a registration: observes it without keeping it alive
#[derive(Debug, Clone)]
pub struct RegistrationHandle {
    token: Rc<Token>,
}

impl RegistrationHandle {
    pub fn kind(&self) -> RegistrationKind {
        self.token.kind
    }

    pub fn is_active(&self) -> bool {
        self.token.active.get()
    }

    /// How many times the registration went from live to cancelled
    pub fn cancellations(&self) -> u32 {
        self.token.cancellations.get()
    }
}

/// Something that can run animation loops and deliver resize events
pub trait Host {
    fn request_animation_loop(&mut self) -> Registration;
    fn add_resize_listener(&mut self) -> Registration;
}

/// Host for a single-threaded event loop
#[derive(Debug, Default)]
pub struct EventHost {
    loops: Vec<RegistrationHandle>,
    resize_listeners: Vec<RegistrationHandle>,
}

impl EventHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of animation loops that still want frames
    pub fn active_loops(&mut self) -> usize {
        self.loops.retain(RegistrationHandle::is_active);
        self.loops.len()
    }

    pub fn has_active_loop(&mut self) -> bool {
        self.active_loops() > 0
    }

    /// Number of resize listeners still attached
    pub fn active_resize_listeners(&mut self) -> usize {
        self.resize_listeners.retain(RegistrationHandle::is_active);
        self.resize_listeners.len()
    }
}

impl Host for EventHost {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_counted_once() {
        let (registration, handle) = Registration::issue(RegistrationKind::AnimationLoop);
        assert!(handle.is_active());
        assert!(registration.cancel());
        assert!(!registration.cancel());
        drop(registration);
        assert!(!handle.is_active());
        assert_eq!(handle.cancellations(), 1);
    }

    #[test]
    fn test_drop_cancels() {
        let (registration, handle) = Registration::issue(RegistrationKind::ResizeListener);
        drop(registration);
        assert!(!handle.is_active());
        assert_eq!(handle.cancellations(), 1);
        assert_eq!(handle.kind(), RegistrationKind::ResizeListener);
    }

    #[test]
    fn test_event_host_prunes_cancelled() {
        let mut host = EventHost::new();
        let first = host.request_animation_loop();
        let _second = host.request_animation_loop();
        let listener = host.add_resize_listener();
        assert_eq!(host.active_loops(), 2);
        assert_eq!(host.active_resize_listeners(), 1);

        first.cancel();
        drop(listener);
        assert_eq!(host.active_loops(), 1);
        assert_eq!(host.active_resize_listeners(), 0);
    }
}
