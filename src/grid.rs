//! The grid controller: breakpoint resolution, engine lifecycle, and
//! debounced resize handling for one container.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, warn};

use crate::breakpoint::column_width;
use crate::config::{ConfigOverlay, GridConfig, MobileStrategy};
use crate::dom::{Element, Host, ListenerToken};
use crate::engine::{EngineFactory, EngineOptions, LayoutEngine};
use crate::timer::TimerToken;

/// Marker attribute set on a container once a controller owns it. At most
/// one controller may be active per container.
pub const INITIALIZED_ATTR: &str = "data-masonry-initialized";

/// Structural class applied when the controller takes over a container.
pub const CONTAINER_CLASS: &str = "masonry-grid-container";

/// Class applied once the engine instance is live, for stylesheet
/// coordination with layout state.
pub const READY_CLASS: &str = "masonry-initialized";

/// Narrowest viewport the engine is built for. Below this, items stay in
/// natural document flow.
pub const MASONRY_MIN_WIDTH: f64 = 768.0;

/// How the controller finds its container.
pub enum GridTarget {
    Selector(String),
    Element(Rc<dyn Element>),
}

impl From<&str> for GridTarget {
    fn from(selector: &str) -> Self {
        GridTarget::Selector(selector.to_string())
    }
}

impl From<String> for GridTarget {
    fn from(selector: String) -> Self {
        GridTarget::Selector(selector)
    }
}

impl From<Rc<dyn Element>> for GridTarget {
    fn from(element: Rc<dyn Element>) -> Self {
        GridTarget::Element(element)
    }
}

#[derive(Default)]
struct ControllerState {
    engine: Option<Box<dyn LayoutEngine>>,
    active: Option<String>,
    resize_timer: Option<TimerToken>,
    resize_listener: Option<ListenerToken>,
    initialized: bool,
    /// Bumped whenever a build pass starts or the engine is torn down, so an
    /// image-load continuation from a superseded pass is dropped instead of
    /// constructing an engine over a newer one.
    generation: u64,
}

struct GridInner {
    host: Rc<dyn Host>,
    container: Rc<dyn Element>,
    config: GridConfig,
    state: RefCell<ControllerState>,
}

/// Lifecycle manager for one masonry container.
///
/// Construction is soft-failing: if the container cannot be resolved the
/// controller stays inert and every operation is a no-op. All recoverable
/// conditions are logged and absorbed; nothing here panics or returns errors
/// to the caller.
pub struct GridController {
    inner: Option<Rc<GridInner>>,
}

impl GridController {
    /// Build a controller from a configuration overlay merged onto defaults.
    pub fn new(host: Rc<dyn Host>, target: impl Into<GridTarget>, overlay: ConfigOverlay) -> Self {
        Self::with_config(host, target, GridConfig::default().apply(overlay))
    }

    /// Build a controller from a complete configuration.
    pub fn with_config(
        host: Rc<dyn Host>,
        target: impl Into<GridTarget>,
        config: GridConfig,
    ) -> Self {
        let container = match target.into() {
            GridTarget::Selector(selector) => {
                let found = host.query(&selector);
                if found.is_none() {
                    error!(selector = %selector, "grid container not found");
                }
                found
            }
            GridTarget::Element(element) => Some(element),
        };

        let inner = container.map(|container| {
            Rc::new(GridInner {
                host,
                container,
                config,
                state: RefCell::new(ControllerState::default()),
            })
        });

        Self { inner }
    }

    /// Whether construction resolved a container.
    pub fn is_attached(&self) -> bool {
        self.inner.is_some()
    }

    /// Take over the container and build the engine.
    ///
    /// Aborts (with a logged diagnostic) if the host is missing the layout
    /// engine or image-load detector, or if the container is already owned by
    /// another controller. Under [`MobileStrategy::Skip`] this is a complete
    /// no-op below [`MASONRY_MIN_WIDTH`].
    pub fn initialize(&self) {
        if let Some(inner) = &self.inner {
            inner.initialize();
        }
    }

    /// Request a pure relayout from the engine, if one is live.
    pub fn layout(&self) {
        if let Some(inner) = &self.inner {
            inner.layout();
        }
    }

    /// Forward newly appended items to the engine for incremental placement.
    pub fn add_items(&self, items: &[Rc<dyn Element>]) {
        if let Some(inner) = &self.inner {
            inner.add_items(items);
        }
    }

    /// Withdraw items from the engine and relayout the remainder.
    pub fn remove_items(&self, items: &[Rc<dyn Element>]) {
        if let Some(inner) = &self.inner {
            inner.remove_items(items);
        }
    }

    /// Tear down the engine, cancel any pending debounce timer, and detach
    /// the resize listener.
    pub fn destroy(&self) {
        if let Some(inner) = &self.inner {
            inner.destroy();
        }
    }

    /// Name of the breakpoint the current engine was built for.
    pub fn active_breakpoint(&self) -> Option<String> {
        self.inner
            .as_ref()
            .and_then(|inner| inner.state.borrow().active.clone())
    }

    /// Whether a live engine instance exists.
    pub fn is_initialized(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.state.borrow().initialized)
    }

    pub fn config(&self) -> Option<&GridConfig> {
        self.inner.as_ref().map(|inner| &inner.config)
    }
}

impl GridInner {
    fn initialize(self: &Rc<Self>) {
        let label = self.container.debug_label();

        if self.host.engine_factory().is_none() {
            error!(container = %label, "masonry engine not available, skipping initialization");
            return;
        }
        if self.host.image_loads().is_none() {
            error!(container = %label, "image-load detector not available, skipping initialization");
            return;
        }

        if self.container.has_attribute(INITIALIZED_ATTR) {
            debug!(container = %label, "container already initialized, skipping");
            return;
        }

        let width = self.host.viewport_width();
        if self.config.mobile_strategy == MobileStrategy::Skip && width < MASONRY_MIN_WIDTH {
            debug!(container = %label, width, "viewport below masonry cutoff, leaving document flow");
            return;
        }

        self.container.set_attribute(INITIALIZED_ATTR, "true");
        self.container.add_class(CONTAINER_CLASS);
        self.init_masonry();

        if self.config.enable_resize {
            let weak = Rc::downgrade(self);
            let token = self.host.add_resize_listener(Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_resize();
                }
            }));
            self.state.borrow_mut().resize_listener = Some(token);
        }
    }

    /// Resolve the breakpoint and (re)build the engine for it.
    ///
    /// A stale engine is destroyed synchronously before the image-load wait
    /// is issued, so two instances never coexist on one container.
    fn init_masonry(self: &Rc<Self>) {
        let width = self.host.viewport_width();
        let Some((name, spec)) = self.config.breakpoints.resolve(width) else {
            warn!("no breakpoints configured, skipping masonry build");
            return;
        };
        let name = name.to_string();
        let columns = spec.columns;

        if width < MASONRY_MIN_WIDTH {
            // Narrow viewports keep natural document flow; an engine left
            // over from a wider layout is torn down here.
            self.destroy_masonry();
            return;
        }

        let container_width = self.container.width();
        let column_width = column_width(columns, container_width);

        let generation = {
            let mut state = self.state.borrow_mut();
            if state.engine.is_some() && state.active.as_deref() != Some(name.as_str()) {
                debug!(
                    from = state.active.as_deref().unwrap_or("none"),
                    to = %name,
                    "breakpoint changed, destroying engine before rebuild"
                );
                if let Some(mut engine) = state.engine.take() {
                    engine.destroy();
                }
                state.initialized = false;
                self.container.remove_class(READY_CLASS);
            }
            state.active = Some(name.clone());
            state.generation += 1;
            state.generation
        };

        let Some(factory) = self.host.engine_factory() else {
            error!("masonry engine not available, skipping build");
            return;
        };
        let Some(images) = self.host.image_loads() else {
            error!("image-load detector not available, skipping build");
            return;
        };

        debug!(
            breakpoint = %name,
            columns,
            column_width,
            container_width,
            "waiting for images before building engine"
        );

        let weak = Rc::downgrade(self);
        images.images_loaded(
            self.container.clone(),
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.finish_build(generation, factory, column_width);
                }
            }),
        );
    }

    /// Continuation of [`Self::init_masonry`], run once images have settled.
    fn finish_build(
        self: &Rc<Self>,
        generation: u64,
        factory: Rc<dyn EngineFactory>,
        column_width: f64,
    ) {
        if self.state.borrow().generation != generation {
            debug!("image-load continuation superseded, dropping");
            return;
        }

        let options = EngineOptions::new(
            self.config.item_selector.clone(),
            column_width,
            self.config.gutter,
        );
        let mut engine = factory.create(self.container.clone(), &options);

        let mut state = self.state.borrow_mut();
        if state.generation != generation {
            // The factory ran host code that restarted or tore down the grid.
            drop(state);
            engine.destroy();
            return;
        }
        state.engine = Some(engine);
        state.initialized = true;
        drop(state);

        self.container.add_class(READY_CLASS);
        debug!(
            container = %self.container.debug_label(),
            column_width,
            "masonry engine built"
        );
    }

    /// Idempotent engine teardown. Also invalidates any in-flight
    /// image-load continuation.
    fn destroy_masonry(&self) {
        let mut state = self.state.borrow_mut();
        state.generation += 1;
        state.active = None;
        if let Some(mut engine) = state.engine.take() {
            state.initialized = false;
            engine.destroy();
            self.container.remove_class(READY_CLASS);
        }
    }

    fn on_resize(self: &Rc<Self>) {
        let mut state = self.state.borrow_mut();
        if let Some(token) = state.resize_timer.take() {
            self.host.cancel(token);
        }

        let weak = Rc::downgrade(self);
        let token = self.host.schedule(
            self.config.resize_delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.state.borrow_mut().resize_timer = None;
                    inner.handle_resize();
                }
            }),
        );
        state.resize_timer = Some(token);
    }

    fn handle_resize(self: &Rc<Self>) {
        let width = self.host.viewport_width();
        if self.config.mobile_strategy == MobileStrategy::Skip && width < MASONRY_MIN_WIDTH {
            debug!(width, "resize below masonry cutoff ignored");
            return;
        }

        let Some((name, _)) = self.config.breakpoints.resolve(width) else {
            return;
        };
        let name = name.to_string();

        let mut state = self.state.borrow_mut();
        if state.active.as_deref() == Some(name.as_str()) {
            debug!(breakpoint = %name, width, "breakpoint unchanged, relayout only");
            if let Some(engine) = state.engine.as_mut() {
                engine.layout();
            }
            return;
        }
        drop(state);

        debug!(breakpoint = %name, width, "breakpoint changed on resize, rebuilding");
        self.init_masonry();
    }

    fn layout(&self) {
        if let Some(engine) = self.state.borrow_mut().engine.as_mut() {
            engine.layout();
        }
    }

    fn add_items(&self, items: &[Rc<dyn Element>]) {
        if let Some(engine) = self.state.borrow_mut().engine.as_mut() {
            engine.appended(items);
        }
    }

    fn remove_items(&self, items: &[Rc<dyn Element>]) {
        if let Some(engine) = self.state.borrow_mut().engine.as_mut() {
            engine.remove(items);
            engine.layout();
        }
    }

    fn destroy(&self) {
        self.destroy_masonry();
        let mut state = self.state.borrow_mut();
        if let Some(token) = state.resize_timer.take() {
            self.host.cancel(token);
        }
        if let Some(token) = state.resize_listener.take() {
            self.host.remove_resize_listener(token);
        }
    }
}
