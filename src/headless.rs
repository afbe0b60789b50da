//! Headless harness for driving the controller without a real document.
//!
//! Provides fake implementations of every capability the controller consumes:
//! a [`HeadlessHost`] with manually-fired timers and resize events,
//! [`HeadlessElement`] containers, a recording engine factory, and instant or
//! gated image-load detectors.
//!
//! # Example
//!
//! ```rust
//! use masonry_grid::headless::{EngineLog, HeadlessElement, HeadlessHost};
//! use masonry_grid::{ConfigOverlay, GridController};
//!
//! let host = HeadlessHost::new(1200.0);
//! let log = EngineLog::new();
//! host.install_recording_engine(&log);
//! host.install_instant_images();
//!
//! let container = HeadlessElement::new("#grid", 1200.0);
//! host.register("#grid", &container);
//!
//! let grid = GridController::new(host.clone(), "#grid", ConfigOverlay::default());
//! grid.initialize();
//! assert!(grid.is_initialized());
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use crate::dom::{Element, Host, ListenerToken};
use crate::engine::{EngineFactory, EngineOptions, ImageLoads, LayoutEngine};
use crate::timer::TimerToken;

/// A fake DOM element: width, attributes, and classes, all inspectable.
pub struct HeadlessElement {
    label: String,
    width: Cell<f64>,
    attributes: RefCell<HashMap<String, String>>,
    classes: RefCell<HashSet<String>>,
}

impl HeadlessElement {
    pub fn new(label: impl Into<String>, width: f64) -> Rc<Self> {
        Rc::new(Self {
            label: label.into(),
            width: Cell::new(width),
            attributes: RefCell::new(HashMap::new()),
            classes: RefCell::new(HashSet::new()),
        })
    }

    pub fn set_width(&self, width: f64) {
        self.width.set(width);
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.borrow().contains(name)
    }
}

impl Element for HeadlessElement {
    fn width(&self) -> f64 {
        self.width.get()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attributes.borrow().contains_key(name)
    }

    fn add_class(&self, name: &str) {
        self.classes.borrow_mut().insert(name.to_string());
    }

    fn remove_class(&self, name: &str) {
        self.classes.borrow_mut().remove(name);
    }

    fn debug_label(&self) -> String {
        self.label.clone()
    }
}

struct PendingTimer {
    token: TimerToken,
    delay: Duration,
    action: Box<dyn FnOnce()>,
}

/// A fake window/document. Timers never fire on their own; tests call
/// [`HeadlessHost::fire_pending_timers`] to simulate the delay elapsing.
pub struct HeadlessHost {
    viewport_width: Cell<f64>,
    elements: RefCell<Vec<(String, Rc<HeadlessElement>)>>,
    listeners: RefCell<Vec<(ListenerToken, Rc<dyn Fn()>)>>,
    timers: RefCell<Vec<PendingTimer>>,
    engine_factory: RefCell<Option<Rc<dyn EngineFactory>>>,
    image_loads: RefCell<Option<Rc<dyn ImageLoads>>>,
}

impl HeadlessHost {
    pub fn new(viewport_width: f64) -> Rc<Self> {
        Rc::new(Self {
            viewport_width: Cell::new(viewport_width),
            elements: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            engine_factory: RefCell::new(None),
            image_loads: RefCell::new(None),
        })
    }

    pub fn set_viewport_width(&self, width: f64) {
        self.viewport_width.set(width);
    }

    /// Make an element resolvable by selector and visible to discovery.
    pub fn register(&self, selector: impl Into<String>, element: &Rc<HeadlessElement>) {
        self.elements
            .borrow_mut()
            .push((selector.into(), element.clone()));
    }

    pub fn install_engine_factory(&self, factory: Rc<dyn EngineFactory>) {
        *self.engine_factory.borrow_mut() = Some(factory);
    }

    pub fn install_recording_engine(&self, log: &Rc<EngineLog>) {
        self.install_engine_factory(Rc::new(RecordingEngineFactory { log: log.clone() }));
    }

    pub fn install_image_loads(&self, images: Rc<dyn ImageLoads>) {
        *self.image_loads.borrow_mut() = Some(images);
    }

    /// Image waits that complete synchronously.
    pub fn install_instant_images(&self) {
        self.install_image_loads(Rc::new(InstantImages));
    }

    /// Deliver a resize event to every attached listener.
    pub fn emit_resize(&self) {
        let listeners: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn pending_timer_count(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Delay of the most recently scheduled pending timer.
    pub fn last_timer_delay(&self) -> Option<Duration> {
        self.timers.borrow().last().map(|timer| timer.delay)
    }

    /// Run every pending timer, as if all delays had elapsed.
    pub fn fire_pending_timers(&self) {
        let timers: Vec<_> = self.timers.borrow_mut().drain(..).collect();
        for timer in timers {
            (timer.action)();
        }
    }
}

impl Host for HeadlessHost {
    fn viewport_width(&self) -> f64 {
        self.viewport_width.get()
    }

    fn query(&self, selector: &str) -> Option<Rc<dyn Element>> {
        self.elements
            .borrow()
            .iter()
            .find(|(registered, _)| registered == selector)
            .map(|(_, element)| element.clone() as Rc<dyn Element>)
    }

    fn elements_with_attribute(&self, attribute: &str) -> Vec<Rc<dyn Element>> {
        self.elements
            .borrow()
            .iter()
            .filter(|(_, element)| element.has_attribute(attribute))
            .map(|(_, element)| element.clone() as Rc<dyn Element>)
            .collect()
    }

    fn add_resize_listener(&self, listener: Rc<dyn Fn()>) -> ListenerToken {
        let token = ListenerToken::next();
        self.listeners.borrow_mut().push((token, listener));
        token
    }

    fn remove_resize_listener(&self, token: ListenerToken) {
        self.listeners
            .borrow_mut()
            .retain(|(registered, _)| *registered != token);
    }

    fn schedule(&self, delay: Duration, action: Box<dyn FnOnce()>) -> TimerToken {
        let token = TimerToken::next();
        self.timers.borrow_mut().push(PendingTimer {
            token,
            delay,
            action,
        });
        token
    }

    fn cancel(&self, token: TimerToken) {
        self.timers.borrow_mut().retain(|timer| timer.token != token);
    }

    fn engine_factory(&self) -> Option<Rc<dyn EngineFactory>> {
        self.engine_factory.borrow().clone()
    }

    fn image_loads(&self) -> Option<Rc<dyn ImageLoads>> {
        self.image_loads.borrow().clone()
    }
}

/// One observable engine interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Created {
        item_selector: String,
        column_width: f64,
        gutter: f64,
    },
    Layout,
    Appended(usize),
    Removed(usize),
    Destroyed,
}

/// Shared record of every engine interaction across instances, plus a
/// high-water mark of simultaneously live instances.
#[derive(Default)]
pub struct EngineLog {
    events: RefCell<Vec<EngineEvent>>,
    live: Cell<usize>,
    max_live: Cell<usize>,
}

impl EngineLog {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.borrow().clone()
    }

    /// Number of instances created so far.
    pub fn created_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, EngineEvent::Created { .. }))
            .count()
    }

    /// Instances created but not yet destroyed.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// Most instances ever live at once.
    pub fn max_live(&self) -> usize {
        self.max_live.get()
    }

    fn push(&self, event: EngineEvent) {
        self.events.borrow_mut().push(event);
    }
}

struct RecordingEngineFactory {
    log: Rc<EngineLog>,
}

impl EngineFactory for RecordingEngineFactory {
    fn create(
        &self,
        _container: Rc<dyn Element>,
        options: &EngineOptions,
    ) -> Box<dyn LayoutEngine> {
        self.log.push(EngineEvent::Created {
            item_selector: options.item_selector.clone(),
            column_width: options.column_width,
            gutter: options.gutter,
        });
        let live = self.log.live.get() + 1;
        self.log.live.set(live);
        self.log.max_live.set(self.log.max_live.get().max(live));
        Box::new(RecordingEngine {
            log: self.log.clone(),
        })
    }
}

struct RecordingEngine {
    log: Rc<EngineLog>,
}

impl LayoutEngine for RecordingEngine {
    fn layout(&mut self) {
        self.log.push(EngineEvent::Layout);
    }

    fn appended(&mut self, items: &[Rc<dyn Element>]) {
        self.log.push(EngineEvent::Appended(items.len()));
    }

    fn remove(&mut self, items: &[Rc<dyn Element>]) {
        self.log.push(EngineEvent::Removed(items.len()));
    }

    fn destroy(&mut self) {
        self.log.push(EngineEvent::Destroyed);
        self.log.live.set(self.log.live.get() - 1);
    }
}

/// Image-load detector whose waits complete synchronously.
pub struct InstantImages;

impl ImageLoads for InstantImages {
    fn images_loaded(&self, _container: Rc<dyn Element>, on_complete: Box<dyn FnOnce()>) {
        on_complete();
    }
}

/// Image-load detector that holds completions until the test releases them.
#[derive(Default)]
pub struct GatedImages {
    pending: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl GatedImages {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Complete every outstanding wait, in issue order.
    pub fn release_all(&self) {
        let pending: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        for on_complete in pending {
            on_complete();
        }
    }
}

impl ImageLoads for GatedImages {
    fn images_loaded(&self, _container: Rc<dyn Element>, on_complete: Box<dyn FnOnce()>) {
        self.pending.borrow_mut().push(on_complete);
    }
}
