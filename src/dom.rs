//! Capability traits for the document the controller runs inside.
//!
//! The controller never talks to a real DOM or layout library directly; it is
//! handed a [`Host`] and works against these traits, so tests can substitute
//! the fakes in [`crate::headless`].

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::engine::{EngineFactory, ImageLoads};
use crate::timer::TimerToken;

/// Handle for an attached resize listener, so teardown can remove exactly
/// the listener that was added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

impl ListenerToken {
    pub fn next() -> ListenerToken {
        static LISTENER_COUNTER: AtomicU64 = AtomicU64::new(1);
        ListenerToken(LISTENER_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn into_raw(self) -> u64 {
        self.0
    }
}

/// A DOM element, as far as the controller is concerned: a rendered width,
/// attributes, and CSS classes. Containers and grid items are both elements.
pub trait Element {
    /// Current rendered width in pixels.
    fn width(&self) -> f64;

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn has_attribute(&self, name: &str) -> bool;

    fn add_class(&self, name: &str);
    fn remove_class(&self, name: &str);

    /// Identifier used in diagnostics (e.g. the selector or id the element
    /// was resolved from).
    fn debug_label(&self) -> String {
        "<element>".to_string()
    }
}

/// The window/document surface the controller is driven by.
pub trait Host {
    /// Current viewport width in pixels.
    fn viewport_width(&self) -> f64;

    /// Resolve a single element by selector.
    fn query(&self, selector: &str) -> Option<Rc<dyn Element>>;

    /// All elements carrying the given attribute, in document order.
    fn elements_with_attribute(&self, attribute: &str) -> Vec<Rc<dyn Element>>;

    fn add_resize_listener(&self, listener: Rc<dyn Fn()>) -> ListenerToken;
    fn remove_resize_listener(&self, token: ListenerToken);

    /// Schedule a delayed task. The returned token can cancel it while still
    /// pending.
    fn schedule(&self, delay: Duration, action: Box<dyn FnOnce()>) -> TimerToken;
    fn cancel(&self, token: TimerToken);

    /// The layout-engine factory, if the host document provides one.
    fn engine_factory(&self) -> Option<Rc<dyn EngineFactory>>;

    /// The image-load detector, if the host document provides one.
    fn image_loads(&self) -> Option<Rc<dyn ImageLoads>>;
}
