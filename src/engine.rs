//! Interfaces to the external masonry layout engine and image-load detector.

use std::rc::Rc;
use std::time::Duration;

use crate::dom::Element;

/// Options handed to the engine when a new instance is built.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub item_selector: String,
    /// Nominal column width from [`crate::breakpoint::column_width`].
    pub column_width: f64,
    pub gutter: f64,
    /// Position items with percentage values so they track container resizes.
    pub percent_position: bool,
    pub transition_duration: Duration,
    /// Size the container to its content so it can be centered by the page.
    pub fit_width: bool,
    // Horizontal ordering is left at the engine default (vertical-fill per
    // column) so later columns can backfill shorter gaps.
}

impl EngineOptions {
    pub fn new(item_selector: impl Into<String>, column_width: f64, gutter: f64) -> Self {
        Self {
            item_selector: item_selector.into(),
            column_width,
            gutter,
            percent_position: true,
            transition_duration: Duration::ZERO,
            fit_width: true,
        }
    }
}

/// One live masonry instance bound to one container.
pub trait LayoutEngine {
    /// Recompute item positions without rebuilding the instance.
    fn layout(&mut self);

    /// Position newly appended items incrementally.
    fn appended(&mut self, items: &[Rc<dyn Element>]);

    /// Stop managing the given items.
    fn remove(&mut self, items: &[Rc<dyn Element>]);

    /// Release everything the instance did to the container. Called exactly
    /// once, before the instance is dropped.
    fn destroy(&mut self);
}

/// Builds engine instances. The host document supplies one implementation.
pub trait EngineFactory {
    fn create(&self, container: Rc<dyn Element>, options: &EngineOptions) -> Box<dyn LayoutEngine>;
}

/// Callback-style wait for all images inside a container to finish loading.
///
/// `on_complete` runs on the same thread, strictly after every image inside
/// `container` has either loaded or failed.
pub trait ImageLoads {
    fn images_loaded(&self, container: Rc<dyn Element>, on_complete: Box<dyn FnOnce()>);
}
