//! Attribute-driven auto-discovery of grid containers.

use std::rc::Rc;

use masonry_grid::discover::{auto_init, CONFIG_ATTR, GRID_ATTR};
use masonry_grid::headless::{EngineEvent, EngineLog, HeadlessElement, HeadlessHost};
use masonry_grid::Element;

fn harness(viewport: f64) -> (Rc<HeadlessHost>, Rc<EngineLog>) {
    let host = HeadlessHost::new(viewport);
    let log = EngineLog::new();
    host.install_recording_engine(&log);
    host.install_instant_images();
    (host, log)
}

fn marked(host: &Rc<HeadlessHost>, selector: &str, width: f64) -> Rc<HeadlessElement> {
    let element = HeadlessElement::new(selector, width);
    element.set_attribute(GRID_ATTR, "");
    host.register(selector, &element);
    element
}

#[test]
fn marked_containers_are_wrapped_and_initialized() {
    let (host, log) = harness(1200.0);
    marked(&host, "#one", 1200.0);
    marked(&host, "#two", 900.0);

    // Unmarked elements are left alone.
    host.register("#plain", &HeadlessElement::new("#plain", 800.0));

    let grids = auto_init(host.clone());

    assert_eq!(grids.len(), 2);
    assert!(grids.iter().all(|grid| grid.is_initialized()));
    assert_eq!(log.created_count(), 2);
}

#[test]
fn config_attribute_overlays_defaults() {
    let (host, log) = harness(1200.0);
    let element = marked(&host, "#grid", 1200.0);
    element.set_attribute(
        CONFIG_ATTR,
        r#"{"gutter": 30, "itemSelector": ".photo"}"#,
    );

    let grids = auto_init(host.clone());

    assert_eq!(grids.len(), 1);
    assert_eq!(
        log.events().first(),
        Some(&EngineEvent::Created {
            item_selector: ".photo".to_string(),
            column_width: 136.0,
            gutter: 30.0,
        })
    );
}

#[test]
fn malformed_config_attribute_falls_back_to_defaults() {
    let (host, log) = harness(1200.0);
    let element = marked(&host, "#grid", 1200.0);
    element.set_attribute(CONFIG_ATTR, "{not json");

    let grids = auto_init(host.clone());

    assert_eq!(grids.len(), 1, "discovery must survive a bad overlay");
    assert!(grids[0].is_initialized());
    assert_eq!(
        log.events().first(),
        Some(&EngineEvent::Created {
            item_selector: ".cake".to_string(),
            column_width: 136.0,
            gutter: 15.0,
        })
    );
}

#[test]
fn discovery_without_marked_containers_is_empty() {
    let (host, log) = harness(1200.0);
    host.register("#plain", &HeadlessElement::new("#plain", 800.0));

    let grids = auto_init(host.clone());

    assert!(grids.is_empty());
    assert_eq!(log.created_count(), 0);
}
