//! # Masonry Grid
//! A responsive lifecycle controller for masonry-style image grids.
//!
//! The crate does not place items itself; placement belongs to an external
//! layout engine reached through the [`LayoutEngine`](engine::LayoutEngine)
//! trait. What lives here is everything around the engine: named viewport
//! breakpoints mapping to column counts, the column-width arithmetic, the
//! decision between a cheap relayout and a full rebuild when the viewport
//! changes, debounced resize handling, incremental item insertion and
//! removal, and deterministic teardown.
//!
//! ## Example
//! ```rust
//! use masonry_grid::headless::{EngineLog, HeadlessElement, HeadlessHost};
//! use masonry_grid::{ConfigOverlay, GridController};
//!
//! // A fake document; a real integration supplies its own `Host`.
//! let host = HeadlessHost::new(1200.0);
//! let log = EngineLog::new();
//! host.install_recording_engine(&log);
//! host.install_instant_images();
//! host.register("#cakes", &HeadlessElement::new("#cakes", 1200.0));
//!
//! let grid = GridController::new(host.clone(), "#cakes", ConfigOverlay::default());
//! grid.initialize();
//!
//! // 1200 px resolves the desktop tier: 4 columns.
//! assert_eq!(grid.active_breakpoint().as_deref(), Some("desktop"));
//! assert_eq!(log.created_count(), 1);
//! ```
//!
//! ## Lifecycle
//! [`GridController::initialize`] marks the container, resolves the active
//! breakpoint, waits for images inside the container to settle, and builds
//! the engine. Resize events are debounced; a resize that stays inside the
//! active breakpoint only asks the engine to relayout, while a breakpoint
//! change destroys the instance and builds a fresh one. At no point do two
//! engine instances coexist on one container.
//!
//! Containers carrying the `data-masonry-grid` attribute can be picked up in
//! bulk with [`discover::auto_init`], with an optional JSON configuration
//! overlay in `data-masonry-config`.
//!
//! All recoverable failures (missing container, missing engine, repeated
//! initialization, malformed overlay) are logged through `tracing` and
//! absorbed; no operation panics or returns an error to the caller.

pub mod breakpoint;
pub mod config;
pub mod discover;
pub mod dom;
pub mod engine;
pub mod grid;
pub mod headless;
pub mod timer;

pub use breakpoint::{column_width, BreakpointSpec, Breakpoints, COLUMN_SPAN_RATIO};
pub use config::{ConfigOverlay, GridConfig, MobileStrategy};
pub use dom::{Element, Host, ListenerToken};
pub use engine::{EngineFactory, EngineOptions, ImageLoads, LayoutEngine};
pub use grid::{GridController, GridTarget, MASONRY_MIN_WIDTH};
pub use timer::TimerToken;

/// Commonly used types.
pub mod prelude {
    pub use crate::breakpoint::{BreakpointSpec, Breakpoints};
    pub use crate::config::{ConfigOverlay, GridConfig, MobileStrategy};
    pub use crate::discover::auto_init;
    pub use crate::dom::{Element, Host};
    pub use crate::engine::{EngineFactory, EngineOptions, ImageLoads, LayoutEngine};
    pub use crate::grid::{GridController, GridTarget};
}
