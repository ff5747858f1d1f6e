//! Integration tests for the showcase modal controller

mod common;

use common::*;
use std::time::{Duration, Instant};
use vitrine_core::{AccentColors, ProjectRecord, ProjectRegistry};
use vitrine_viewer::*;

static TEST_PROJECTS: [ProjectRecord; 4] = [
    ProjectRecord {
        id: 1,
        title: "Crate",
        description: "A wooden crate.",
        model_path: Some("/projects/crate.glb"),
        accent: AccentColors::new(0x2563eb, 0x06b6d4),
        preview_video: None,
    },
    ProjectRecord {
        id: 2,
        title: "Barrel",
        description: "An oak barrel.",
        model_path: Some("/projects/barrel.glb"),
        accent: AccentColors::new(0xdc2626, 0xf97316),
        preview_video: None,
    },
    ProjectRecord {
        id: 3,
        title: "Broken",
        description: "A truncated file.",
        model_path: Some("/projects/broken.glb"),
        accent: AccentColors::new(0x0f172a, 0xdc2626),
        preview_video: None,
    },
    ProjectRecord {
        id: 4,
        title: "Poster",
        description: "Video only.",
        model_path: None,
        accent: AccentColors::new(0xc2410c, 0x991b1b),
        preview_video: Some("/videos/poster.mp4"),
    },
];

fn showcase() -> Showcase<MockSurfaceFactory> {
    Showcase::new(
        ProjectRegistry::from_static(&TEST_PROJECTS),
        MockSurfaceFactory::new(),
        inline_loader(),
        ViewerConfig::default(),
    )
}

const SCREEN: FixedContainer = FixedContainer { width: 1280, height: 720 };

#[test]
fn test_open_shows_modal_and_loads() {
    let mut showcase = showcase();
    let mut host = CountingHost::new();

    assert!(showcase.open_project(1, &SCREEN, &mut host).unwrap());
    assert!(showcase.modal().visible);
    assert_eq!(showcase.modal().title, "Crate");
    assert_eq!(showcase.modal().status.as_deref(), Some("Loading..."));
    assert!(showcase
        .session()
        .unwrap()
        .model_path()
        .ends_with("projects/crate.glb"));

    assert_eq!(showcase.poll_loads(), 1);
    assert_eq!(showcase.modal().status, None);
    assert_eq!(showcase.session().unwrap().scene().model().unwrap().name, "crate");
}

#[test]
fn test_opening_b_cancels_a_exactly_once() {
    let mut showcase = showcase();
    let mut host = CountingHost::new();

    showcase.open_project(1, &SCREEN, &mut host).unwrap();
    assert_eq!(host.active_loops(), 1);
    showcase.open_project(2, &SCREEN, &mut host).unwrap();

    assert_eq!(host.loops.len(), 2);
    assert_eq!(host.loops[0].cancellations(), 1);
    assert!(!host.loops[0].is_active());
    assert!(host.loops[1].is_active());
    assert_eq!(host.active_loops(), 1);
    assert_eq!(host.active_resize_listeners(), 1);
}

#[test]
fn test_stale_completion_is_discarded() {
    let mut showcase = showcase();
    let mut host = CountingHost::new();

    // Both loads complete before anyone polls
    showcase.open_project(1, &SCREEN, &mut host).unwrap();
    showcase.open_project(2, &SCREEN, &mut host).unwrap();

    assert_eq!(showcase.poll_loads(), 1);
    let session = showcase.session().unwrap();
    assert_eq!(session.id(), 2);
    assert_eq!(session.scene().model().unwrap().name, "barrel");
}

#[test]
fn test_close_is_deferred() {
    let mut showcase = showcase();
    let mut host = CountingHost::new();
    showcase.open_project(1, &SCREEN, &mut host).unwrap();
    showcase.poll_loads();

    let now = Instant::now();
    showcase.request_close(now);
    assert!(!showcase.modal().visible);
    assert!(showcase.is_closing());

    // Still alive during the transition
    assert!(!showcase.tick(now + Duration::from_millis(499)));
    assert!(showcase.session().is_some());
    assert_eq!(host.active_loops(), 1);

    assert!(showcase.tick(now + Duration::from_millis(500)));
    assert!(showcase.session().is_none());
    assert!(!showcase.is_closing());
    assert_eq!(host.active_loops(), 0);
    assert_eq!(host.active_resize_listeners(), 0);
    assert_eq!(showcase.session().map(|s| s.id()), None);
}

#[test]
fn test_repeated_close_keeps_first_deadline() {
    let mut showcase = showcase();
    let mut host = CountingHost::new();
    showcase.open_project(1, &SCREEN, &mut host).unwrap();

    let first = Instant::now();
    showcase.request_close(first);
    showcase.request_close(first + Duration::from_millis(300));
    assert_eq!(showcase.teardown_due(), Some(first + Duration::from_millis(500)));

    assert!(showcase.tick(first + Duration::from_millis(500)));
    assert!(showcase.session().is_none());
    assert_eq!(showcase.teardown_due(), None);
    assert_eq!(host.active_loops(), 0);
}

#[test]
fn test_is_loading_tracks_pending_model() {
    let mut showcase = showcase();
    let mut host = CountingHost::new();
    assert!(!showcase.is_loading());

    showcase.open_project(1, &SCREEN, &mut host).unwrap();
    assert!(showcase.is_loading());
    showcase.poll_loads();
    assert!(!showcase.is_loading());

    showcase.open_project(2, &SCREEN, &mut host).unwrap();
    showcase.request_close(Instant::now());
    assert!(!showcase.is_loading());
}

#[test]
fn test_load_during_close_delay_is_discarded() {
    let mut showcase = showcase();
    let mut host = CountingHost::new();
    showcase.open_project(1, &SCREEN, &mut host).unwrap();

    showcase.request_close(Instant::now());
    assert_eq!(showcase.poll_loads(), 0);
    assert!(showcase.session().unwrap().scene().model().is_none());
}

#[test]
fn test_reopen_during_close_delay_cancels_teardown() {
    let mut showcase = showcase();
    let mut host = CountingHost::new();
    showcase.open_project(1, &SCREEN, &mut host).unwrap();

    let now = Instant::now();
    showcase.request_close(now);
    showcase.open_project(2, &SCREEN, &mut host).unwrap();

    assert!(showcase.modal().visible);
    assert!(!showcase.tick(now + Duration::from_secs(1)));
    assert_eq!(showcase.session().unwrap().id(), 2);
    assert_eq!(host.active_loops(), 1);
}

#[test]
fn test_load_failure_reaches_modal() {
    let mut showcase = showcase();
    let mut host = CountingHost::new();
    showcase.open_project(3, &SCREEN, &mut host).unwrap();
    showcase.poll_loads();

    assert_eq!(
        showcase.modal().status.as_deref(),
        Some("Error: unexpected end of GLB chunk")
    );
    assert_eq!(host.active_loops(), 0);

    // Opening again retries the load
    showcase.open_project(1, &SCREEN, &mut host).unwrap();
    showcase.poll_loads();
    assert_eq!(showcase.modal().status, None);
}

#[test]
fn test_setup_failure_reaches_modal() {
    let mut showcase = Showcase::new(
        ProjectRegistry::from_static(&TEST_PROJECTS),
        MockSurfaceFactory::failing(),
        inline_loader(),
        ViewerConfig::default(),
    );
    let mut host = CountingHost::new();

    assert!(showcase.open_project(1, &SCREEN, &mut host).is_err());
    assert!(showcase.modal().visible);
    assert_eq!(showcase.modal().status.as_deref(), Some("Error: no adapter available"));
    assert!(showcase.session().is_none());
    assert!(host.loops.is_empty());
}

#[test]
fn test_projects_without_model_do_nothing() {
    let mut showcase = showcase();
    let mut host = CountingHost::new();

    assert!(!showcase.open_project(4, &SCREEN, &mut host).unwrap());
    assert!(!showcase.open_project(99, &SCREEN, &mut host).unwrap());
    assert!(!showcase.modal().visible);
    assert!(host.loops.is_empty());
}

#[test]
fn test_input_is_forwarded_to_session() {
    let mut showcase = showcase();
    let mut host = CountingHost::new();

    // Nothing open: input is ignored
    showcase.rotate(10.0, 10.0);
    assert!(!showcase.focus_at(640.0, 360.0));
    showcase.frame().unwrap();

    showcase.open_project(1, &SCREEN, &mut host).unwrap();
    showcase.poll_loads();
    showcase.frame().unwrap();
    assert!(showcase.focus_at(640.0, 360.0));

    showcase.handle_resize(&FixedContainer::new(640, 640));
    let session = showcase.session().unwrap();
    assert_eq!(session.camera().aspect_ratio, 1.0);
    assert_eq!(session.surface().unwrap().size(), (640, 640));
}
