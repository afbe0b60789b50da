use std::time::Duration;

use serde::Deserialize;

use crate::breakpoint::Breakpoints;

/// What to do with viewports narrower than the masonry cutoff (768 px).
///
/// The two modes differ observably: `FlowThenInit` still marks the container
/// and runs the init path, which tears down any live engine below the cutoff;
/// `Skip` leaves the container completely untouched (no marker attribute, no
/// CSS class) so items stay in natural document flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MobileStrategy {
    /// Desktop-first: always run initialization; the masonry pass itself
    /// destroys any engine instance below the cutoff and builds nothing.
    #[default]
    FlowThenInit,
    /// Mobile-skip: short-circuit initialization entirely below the cutoff.
    Skip,
}

/// Controller configuration. Supplied once at construction, immutable after.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub breakpoints: Breakpoints,
    /// Fixed pixel spacing between grid items.
    pub gutter: f64,
    /// Selector identifying grid items inside the container.
    pub item_selector: String,
    pub enable_resize: bool,
    /// Trailing-edge debounce window for resize events.
    pub resize_delay: Duration,
    pub mobile_strategy: MobileStrategy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            gutter: 15.0,
            item_selector: ".cake".to_string(),
            enable_resize: true,
            resize_delay: Duration::from_millis(250),
            mobile_strategy: MobileStrategy::default(),
        }
    }
}

impl GridConfig {
    /// Merge an overlay onto this configuration.
    ///
    /// Missing overlay fields keep their current values. A `breakpoints`
    /// overlay replaces the whole tier set, except that an empty map is
    /// ignored so the catch-all tier invariant cannot be emptied out.
    pub fn apply(mut self, overlay: ConfigOverlay) -> Self {
        if let Some(breakpoints) = overlay.breakpoints {
            if !breakpoints.is_empty() {
                self.breakpoints = breakpoints;
            }
        }
        if let Some(gutter) = overlay.gutter {
            self.gutter = gutter;
        }
        if let Some(item_selector) = overlay.item_selector {
            self.item_selector = item_selector;
        }
        if let Some(enable_resize) = overlay.enable_resize {
            self.enable_resize = enable_resize;
        }
        if let Some(millis) = overlay.resize_delay {
            self.resize_delay = Duration::from_millis(millis);
        }
        if let Some(mobile_strategy) = overlay.mobile_strategy {
            self.mobile_strategy = mobile_strategy;
        }
        self
    }
}

/// Partial configuration, as carried by the `data-masonry-config` attribute.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOverlay {
    pub breakpoints: Option<Breakpoints>,
    pub gutter: Option<f64>,
    pub item_selector: Option<String>,
    pub enable_resize: Option<bool>,
    /// Milliseconds.
    pub resize_delay: Option<u64>,
    pub mobile_strategy: Option<MobileStrategy>,
}
