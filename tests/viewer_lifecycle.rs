mod common;

use cgmath::{EuclideanSpace, Point3};
use common::{approx, reference_model, MockSurface};
use turntable::surface::RenderSurface;
use turntable::bounds;
use turntable::config::ViewerConfig;
use turntable::error::ViewerError;
use turntable::fullscreen::{ExitReason, PointerTarget};
use turntable::viewer::{LoadOutcome, Viewer};

fn viewer() -> (Viewer<MockSurface>, std::rc::Rc<std::cell::RefCell<common::Probe>>) {
    let (primary, probe) = MockSurface::new(800, 600);
    (Viewer::new(ViewerConfig::default(), primary), probe)
}

#[test]
fn starts_on_the_default_view() {
    let (viewer, _) = viewer();
    let state = viewer.camera_state();
    assert_eq!(state.position, Point3::new(0.0, 0.0, 5.0));
    assert_eq!(state.target, Point3::origin());
    assert!(approx(state.aspect, 800.0 / 600.0));
    assert!(viewer.model().is_none());
}

#[test]
fn load_fits_and_frames_the_model() {
    let (mut viewer, _) = viewer();
    let ticket = viewer.begin_load();
    let outcome = viewer.finish_load(ticket, Ok(reference_model()));

    let LoadOutcome::Replaced(fitted) = outcome else {
        panic!("expected the model to be replaced, got {outcome:?}");
    };
    assert!(approx(fitted.scale, 0.5));
    assert_eq!(viewer.revision(), 1);

    let model = viewer.model().expect("model loaded");
    let bbox = bounds::compute(model);
    let center = bbox.center();
    assert!(approx(center.x, 0.0) && approx(center.y, 0.0) && approx(center.z, 0.0));
    assert!(approx(bbox.max_len(), 3.0));

    let state = viewer.camera_state();
    assert!(approx(state.position.x, 0.0));
    assert!(approx(state.position.y, 0.0));
    assert!(approx(state.position.z, 6.0));
    assert_eq!(state.target, Point3::origin());
}

#[test]
fn reset_view_is_idempotent() {
    let (mut viewer, _) = viewer();
    let ticket = viewer.begin_load();
    viewer.finish_load(ticket, Ok(reference_model()));

    viewer.pointer_down(100.0, 100.0);
    viewer.pointer_move(180.0, 140.0);
    viewer.pointer_up();
    viewer.wheel(120.0);
    let ticket = viewer.start_primary_loop();
    viewer.step(ticket);

    let first = viewer.reset_view();
    let second = viewer.reset_view();
    assert_eq!(first, second);
    // The model turned a little during the step, so its box grew slightly.
    assert!((first.position.z - 6.0).abs() < 0.05);
}

#[test]
fn stale_load_is_discarded() {
    let (mut viewer, _) = viewer();
    let slow = viewer.begin_load();
    let fast = viewer.begin_load();

    assert!(matches!(
        viewer.finish_load(fast, Ok(reference_model())),
        LoadOutcome::Replaced(_)
    ));
    let before = viewer.model().cloned();
    let outcome = viewer.finish_load(slow, Ok(turntable::scene::Model::new(vec![], vec![])));
    assert!(matches!(outcome, LoadOutcome::Stale));
    assert_eq!(viewer.model().cloned(), before);
    assert_eq!(viewer.revision(), 1);
}

#[test]
fn failed_load_keeps_the_current_model() {
    let (mut viewer, _) = viewer();
    let ticket = viewer.begin_load();
    viewer.finish_load(ticket, Ok(reference_model()));
    let camera = viewer.camera_state();

    let ticket = viewer.begin_load();
    let outcome = viewer.finish_load(ticket, Err(ViewerError::fetch("missing.glb", "HTTP 404")));
    match outcome {
        LoadOutcome::Failed(err) => assert!(err.is_load_failure()),
        other => panic!("expected a failure, got {other:?}"),
    }
    assert!(viewer.model().is_some());
    assert_eq!(viewer.revision(), 1);
    assert_eq!(viewer.camera_state(), camera);
}

#[test]
fn step_spins_the_model_and_draws_the_primary() {
    let (mut viewer, probe) = viewer();
    let ticket = viewer.begin_load();
    viewer.finish_load(ticket, Ok(reference_model()));

    let frame = viewer.start_primary_loop();
    assert!(viewer.step(frame));
    assert!(viewer.step(frame));

    let model = viewer.model().expect("model loaded");
    assert!(approx(model.rotation_y.0, 0.004));
    assert_eq!(probe.borrow().draws, 2);
    assert_eq!(probe.borrow().last_revision, Some(1));
}

#[test]
fn draw_failures_do_not_stop_the_loop() {
    let (mut viewer, probe) = viewer();
    probe.borrow_mut().fail_draws = true;
    let frame = viewer.start_primary_loop();
    assert!(viewer.step(frame));
    assert!(viewer.step(frame));
    assert_eq!(probe.borrow().draws, 2);
}

#[test]
fn zero_sized_resize_is_ignored() {
    let (mut viewer, probe) = viewer();
    let before = viewer.camera_state();

    assert!(!viewer.resize(0, 400));
    assert!(!viewer.resize(400, 0));
    assert_eq!(viewer.camera_state(), before);
    assert_eq!(probe.borrow().resizes, 0);
    assert_eq!(viewer.primary().size(), (800, 600));

    assert!(viewer.resize(1000, 500));
    assert!(approx(viewer.camera_state().aspect, 2.0));
}

#[test]
fn panel_session_takes_over_and_hands_back() {
    let (mut viewer, primary_probe) = viewer();
    let primary_frame = viewer.start_primary_loop();
    let (panel, panel_probe) = MockSurface::new(1080, 1920);

    let (id, session_frame) = viewer.enter_panel(panel).expect("panel opens");
    assert!(viewer.is_panel_active());
    assert!(approx(viewer.camera_state().aspect, 1080.0 / 1920.0));

    assert!(!viewer.step(primary_frame));
    assert!(viewer.step(session_frame));
    assert_eq!(primary_probe.borrow().draws, 0);
    assert_eq!(panel_probe.borrow().draws, 1);
    assert!(viewer.panel_target_mut(id).is_some());

    let (second, _) = MockSurface::new(1080, 1920);
    assert!(viewer.enter_panel(second).is_err());

    let primary_again = viewer.exit_panel(ExitReason::Toggle).expect("panel closes");
    assert!(!viewer.is_panel_active());
    assert!(panel_probe.borrow().released);
    assert!(approx(viewer.camera_state().aspect, 800.0 / 600.0));
    assert!(!viewer.step(session_frame));
    assert!(viewer.step(primary_again));
    assert_eq!(primary_probe.borrow().draws, 1);
    assert!(viewer.panel_target_mut(id).is_none());
}

#[test]
fn escape_exits_the_panel_once() {
    let (mut viewer, _) = viewer();
    let (panel, panel_probe) = MockSurface::new(1080, 1920);
    viewer.enter_panel(panel).expect("panel opens");

    assert!(viewer.on_escape().is_some());
    assert!(viewer.on_escape().is_none());
    assert!(viewer.on_escape().is_none());
    assert!(panel_probe.borrow().released);
    assert!(!viewer.is_panel_active());
}

#[test]
fn only_backdrop_clicks_close_the_panel() {
    let (mut viewer, _) = viewer();
    let (panel, _) = MockSurface::new(1080, 1920);
    viewer.enter_panel(panel).expect("panel opens");

    assert!(viewer.on_panel_pointer(PointerTarget::Content).is_none());
    assert!(viewer.is_panel_active());
    assert!(viewer.on_panel_pointer(PointerTarget::Backdrop).is_some());
    assert!(!viewer.is_panel_active());
}

#[test]
fn resize_during_a_session_keeps_the_panel_aspect() {
    let (mut viewer, primary_probe) = viewer();
    let (panel, _) = MockSurface::new(1080, 1920);
    viewer.enter_panel(panel).expect("panel opens");

    assert!(viewer.resize(1200, 600));
    assert!(approx(viewer.camera_state().aspect, 1080.0 / 1920.0));
    assert_eq!(primary_probe.borrow().resizes, 1);

    viewer.exit_panel(ExitReason::Toggle);
    assert!(approx(viewer.camera_state().aspect, 2.0));
}
