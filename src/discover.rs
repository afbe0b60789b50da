//! Attribute-driven discovery of grid containers.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::ConfigOverlay;
use crate::dom::{Element as _, Host};
use crate::grid::{GridController, GridTarget};

/// Attribute marking a container for auto-initialization.
pub const GRID_ATTR: &str = "data-masonry-grid";

/// Sibling attribute carrying a JSON configuration overlay.
pub const CONFIG_ATTR: &str = "data-masonry-config";

/// Wrap every element carrying [`GRID_ATTR`] in an initialized controller.
///
/// A malformed [`CONFIG_ATTR`] overlay is logged and replaced by defaults;
/// discovery never fails. Intended to run once on document-ready.
pub fn auto_init(host: Rc<dyn Host>) -> Vec<GridController> {
    let containers = host.elements_with_attribute(GRID_ATTR);
    debug!(count = containers.len(), "auto-initializing masonry grids");

    containers
        .into_iter()
        .map(|container| {
            let overlay = match container.attribute(CONFIG_ATTR) {
                Some(json) => match serde_json::from_str::<ConfigOverlay>(&json) {
                    Ok(overlay) => overlay,
                    Err(err) => {
                        warn!(
                            container = %container.debug_label(),
                            error = %err,
                            "malformed grid config attribute, using defaults"
                        );
                        ConfigOverlay::default()
                    }
                },
                None => ConfigOverlay::default(),
            };

            let controller =
                GridController::new(host.clone(), GridTarget::Element(container), overlay);
            controller.initialize();
            controller
        })
        .collect()
}
