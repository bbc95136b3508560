use std::time::Duration;

use tallview_core::config::FlingConfig;
use tallview_core::inertia::{
    ExponentialFling, InertiaController, InertiaSolver, InertiaTick, SteppedClock,
};
use tallview_core::window::VisibleWindow;

const FRAME: Duration = Duration::from_millis(16);
const MAX_FRAMES: usize = 10_000;

fn controller() -> InertiaController {
    InertiaController::new(
        Box::new(ExponentialFling::new(&FlingConfig::default())),
        Box::new(SteppedClock::new(FRAME)),
    )
}

/// 500x1000 image, 200-row window.
fn window() -> VisibleWindow {
    let mut window = VisibleWindow::default();
    window.initialize(500, 1000, 200, 1.0);
    window
}

/// Tick until the session ends; returns every top produced.
fn run_to_rest(inertia: &mut InertiaController, window: &mut VisibleWindow) -> Vec<i32> {
    let mut tops = Vec::new();
    for _ in 0..MAX_FRAMES {
        match inertia.tick(window) {
            InertiaTick::Moved(top) => tops.push(top),
            InertiaTick::Settled(top) => {
                tops.push(top);
                return tops;
            }
            InertiaTick::Idle => return tops,
        }
    }
    panic!("fling did not settle within {MAX_FRAMES} frames");
}

#[test]
fn test_idle_without_fling() {
    let mut inertia = controller();
    let mut window = window();
    assert!(!inertia.is_active());
    assert_eq!(inertia.tick(&mut window), InertiaTick::Idle);
    assert_eq!(window.top(), Some(0));
}

#[test]
fn test_fling_settles_within_bounds() {
    let mut inertia = controller();
    let mut window = window();
    window.snap_to_top(100);

    inertia.start_fling(100, 500.0, window.max_top().unwrap());
    assert!(inertia.is_active());
    let session = inertia.session().unwrap();
    assert_eq!(session.start_top, 100);
    assert_eq!(session.velocity, -500.0);

    let tops = run_to_rest(&mut inertia, &mut window);
    assert!(!tops.is_empty());
    assert!(!inertia.is_active());
    let top = window.top().unwrap();
    assert!((0..=800).contains(&top), "top {top}");
    // Downward release scrolls towards the image top.
    assert!(tops.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn test_upward_release_scrolls_down_monotonically() {
    let mut inertia = controller();
    let mut window = window();

    inertia.start_fling(0, -1500.0, window.max_top().unwrap());
    let tops = run_to_rest(&mut inertia, &mut window);

    assert!(tops.windows(2).all(|w| w[1] >= w[0]), "tops {tops:?}");
    let rect = window.rect().unwrap();
    assert!(rect.top > 0);
    assert!(rect.bottom <= 1000);
    assert_eq!(rect.height(), 200);
}

#[test]
fn test_fling_stops_at_bottom_bound() {
    let mut inertia = controller();
    let mut window = window();
    window.snap_to_top(700);

    inertia.start_fling(700, -8000.0, window.max_top().unwrap());
    run_to_rest(&mut inertia, &mut window);
    assert_eq!(window.top(), Some(800));
    assert_eq!(window.rect().unwrap().bottom, 1000);
}

#[test]
fn test_cancel_freezes_window() {
    let mut inertia = controller();
    let mut window = window();

    inertia.start_fling(0, -3000.0, window.max_top().unwrap());
    assert!(matches!(inertia.tick(&mut window), InertiaTick::Moved(_)));
    let frozen = window.rect();

    assert!(inertia.cancel());
    assert!(!inertia.is_active());
    for _ in 0..10 {
        assert_eq!(inertia.tick(&mut window), InertiaTick::Idle);
    }
    assert_eq!(window.rect(), frozen);
    assert!(!inertia.cancel(), "second cancel finds nothing to stop");
}

#[test]
fn test_slow_release_starts_no_session() {
    let mut inertia = controller();
    let mut window = window();
    inertia.start_fling(0, -5.0, window.max_top().unwrap());
    assert!(!inertia.is_active());
    assert_eq!(inertia.tick(&mut window), InertiaTick::Idle);
}

#[test]
fn test_new_fling_replaces_running_one() {
    let mut inertia = controller();
    let mut window = window();

    inertia.start_fling(0, -3000.0, 800);
    inertia.tick(&mut window);
    let top = window.top().unwrap();
    inertia.start_fling(top, 3000.0, 800);
    assert_eq!(inertia.session().unwrap().start_top, top);
    run_to_rest(&mut inertia, &mut window);
    assert!(window.top().unwrap() < top);
}

#[test]
fn test_solver_bounds_cover_short_image() {
    // Window taller than the image: the only valid top is 0.
    let mut solver = ExponentialFling::new(&FlingConfig::default());
    solver.fling(0, 2000.0, 0, 0);
    assert!(solver.compute_offset(FRAME));
    assert_eq!(solver.current(), 0);
    assert!(solver.is_finished());
}
