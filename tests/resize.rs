//! Resize behavior: debounce semantics, relayout versus rebuild, and the
//! single-live-engine property.

use std::rc::Rc;
use std::time::Duration;

use masonry_grid::headless::{EngineEvent, EngineLog, GatedImages, HeadlessElement, HeadlessHost};
use masonry_grid::{ConfigOverlay, GridConfig, GridController, MobileStrategy};

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn harness(viewport: f64, container_width: f64) -> (Rc<HeadlessHost>, Rc<HeadlessElement>, Rc<EngineLog>) {
    init_logging();
    let host = HeadlessHost::new(viewport);
    let log = EngineLog::new();
    host.install_recording_engine(&log);
    host.install_instant_images();
    let container = HeadlessElement::new("#grid", container_width);
    host.register("#grid", &container);
    (host, container, log)
}

#[test]
fn resize_events_coalesce_into_one_pending_timer() {
    let (host, _, _) = harness(1000.0, 1000.0);
    let grid = GridController::new(host.clone(), "#grid", ConfigOverlay::default());
    grid.initialize();

    host.emit_resize();
    host.emit_resize();
    host.emit_resize();

    assert_eq!(
        host.pending_timer_count(),
        1,
        "each resize must cancel the previous debounce timer"
    );
    assert_eq!(host.last_timer_delay(), Some(Duration::from_millis(250)));
}

#[test]
fn debounce_delay_follows_configuration() {
    let (host, _, _) = harness(1000.0, 1000.0);
    let overlay: ConfigOverlay = serde_json::from_str(r#"{"resizeDelay": 100}"#).unwrap();
    let grid = GridController::new(host.clone(), "#grid", overlay);
    grid.initialize();

    host.emit_resize();
    assert_eq!(host.last_timer_delay(), Some(Duration::from_millis(100)));
}

#[test]
fn nothing_happens_until_the_timer_fires() {
    let (host, _, log) = harness(1000.0, 1000.0);
    let grid = GridController::new(host.clone(), "#grid", ConfigOverlay::default());
    grid.initialize();
    let before = log.events().len();

    host.set_viewport_width(1300.0);
    host.emit_resize();

    assert_eq!(log.events().len(), before, "work must wait for the debounce");
}

#[test]
fn same_breakpoint_resize_relayouts_without_rebuild() {
    // 1000 and 1010 both resolve the tablet tier.
    let (host, _, log) = harness(1000.0, 1000.0);
    let grid = GridController::new(host.clone(), "#grid", ConfigOverlay::default());
    grid.initialize();
    assert_eq!(grid.active_breakpoint().as_deref(), Some("tablet"));

    host.set_viewport_width(1010.0);
    host.emit_resize();
    host.fire_pending_timers();

    assert_eq!(log.created_count(), 1, "no rebuild inside one breakpoint");
    assert!(!log.events().contains(&EngineEvent::Destroyed));
    assert_eq!(log.events().last(), Some(&EngineEvent::Layout));
    assert_eq!(grid.active_breakpoint().as_deref(), Some("tablet"));
}

#[test]
fn breakpoint_change_destroys_then_rebuilds() {
    // 1000 is tablet (3 columns), 1300 is desktop (4 columns).
    let (host, _, log) = harness(1000.0, 1200.0);
    let grid = GridController::new(host.clone(), "#grid", ConfigOverlay::default());
    grid.initialize();
    assert_eq!(grid.active_breakpoint().as_deref(), Some("tablet"));

    host.set_viewport_width(1300.0);
    host.emit_resize();
    host.fire_pending_timers();

    assert_eq!(grid.active_breakpoint().as_deref(), Some("desktop"));
    assert_eq!(log.created_count(), 2);
    assert_eq!(log.max_live(), 1, "old engine must die before the new one exists");

    // Container width 1200 at 4 columns: floor(1200 / (4 * 2.2)) = 136.
    assert_eq!(
        log.events().last(),
        Some(&EngineEvent::Created {
            item_selector: ".cake".to_string(),
            column_width: 136.0,
            gutter: 15.0,
        })
    );

    let events = log.events();
    let destroyed_at = events.iter().position(|event| *event == EngineEvent::Destroyed);
    let second_created_at = events
        .iter()
        .enumerate()
        .filter(|(_, event)| matches!(event, EngineEvent::Created { .. }))
        .map(|(index, _)| index)
        .nth(1);
    assert!(
        destroyed_at.is_some() && destroyed_at < second_created_at,
        "destroy must precede the rebuild"
    );
}

#[test]
fn single_live_engine_even_with_slow_images() {
    let host = HeadlessHost::new(1000.0);
    let log = EngineLog::new();
    host.install_recording_engine(&log);
    let images = GatedImages::new();
    host.install_image_loads(images.clone());
    host.register("#grid", &HeadlessElement::new("#grid", 1000.0));

    let grid = GridController::new(host.clone(), "#grid", ConfigOverlay::default());
    grid.initialize();
    images.release_all();
    assert_eq!(log.live(), 1);

    host.set_viewport_width(1300.0);
    host.emit_resize();
    host.fire_pending_timers();

    // Stale engine is torn down synchronously, before images settle.
    assert_eq!(log.live(), 0);
    assert_eq!(images.pending(), 1);

    images.release_all();
    assert_eq!(log.live(), 1);
    assert_eq!(log.max_live(), 1);
    assert!(grid.is_initialized());
}

#[test]
fn superseded_build_pass_never_lands() {
    let host = HeadlessHost::new(1000.0);
    let log = EngineLog::new();
    host.install_recording_engine(&log);
    let images = GatedImages::new();
    host.install_image_loads(images.clone());
    host.register("#grid", &HeadlessElement::new("#grid", 1000.0));

    let grid = GridController::new(host.clone(), "#grid", ConfigOverlay::default());
    grid.initialize();

    // A breakpoint change arrives while the first build still waits on images.
    host.set_viewport_width(1300.0);
    host.emit_resize();
    host.fire_pending_timers();
    assert_eq!(images.pending(), 2);

    images.release_all();
    assert_eq!(
        log.created_count(),
        1,
        "only the newest build pass may construct an engine"
    );
    assert_eq!(log.max_live(), 1);
    assert_eq!(grid.active_breakpoint().as_deref(), Some("desktop"));
}

#[test]
fn flow_then_init_tears_down_below_cutoff_and_rebuilds_above() {
    let (host, container, log) = harness(1000.0, 1000.0);
    let grid = GridController::new(host.clone(), "#grid", ConfigOverlay::default());
    grid.initialize();
    assert_eq!(log.live(), 1);

    host.set_viewport_width(500.0);
    host.emit_resize();
    host.fire_pending_timers();

    assert_eq!(log.live(), 0, "engine torn down below the masonry cutoff");
    assert!(!grid.is_initialized());
    assert!(!container.has_class(masonry_grid::grid::READY_CLASS));

    host.set_viewport_width(1000.0);
    host.emit_resize();
    host.fire_pending_timers();

    assert_eq!(log.live(), 1, "engine rebuilt once the viewport widens again");
    assert_eq!(grid.active_breakpoint().as_deref(), Some("tablet"));
}

#[test]
fn skip_strategy_ignores_resizes_below_cutoff() {
    let host = HeadlessHost::new(1000.0);
    let log = EngineLog::new();
    host.install_recording_engine(&log);
    host.install_instant_images();
    host.register("#grid", &HeadlessElement::new("#grid", 1000.0));

    let config = GridConfig {
        mobile_strategy: MobileStrategy::Skip,
        ..GridConfig::default()
    };
    let grid = GridController::with_config(host.clone(), "#grid", config);
    grid.initialize();
    assert_eq!(log.live(), 1);

    host.set_viewport_width(500.0);
    host.emit_resize();
    host.fire_pending_timers();

    // Variant B performs no destructive cleanup below the cutoff.
    assert_eq!(log.live(), 1);
    assert!(!log.events().contains(&EngineEvent::Destroyed));
}
