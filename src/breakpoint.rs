use indexmap::IndexMap;
use serde::Deserialize;

/// Ratio between the rendered width of a grid item and the nominal column
/// width handed to the layout engine. Items are sized by estimated image
/// aspect, so they come out roughly 2.2x wider than the column they anchor
/// to. Changing this changes the visual output of every existing page.
pub const COLUMN_SPAN_RATIO: f64 = 2.2;

/// A named viewport-width tier mapping to a target column count.
///
/// `max_width` is the inclusive upper viewport-width bound for the tier.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointSpec {
    pub max_width: f64,
    pub columns: u32,
}

/// Width breakpoints in pixels, keyed by tier name.
///
/// Tiers keep their insertion order, and `max_width` values are expected to
/// be pairwise distinct with one catch-all tier whose `max_width` is large
/// enough to cover any viewport.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Breakpoints {
    tiers: IndexMap<String, BreakpointSpec>,
}

impl Default for Breakpoints {
    fn default() -> Self {
        let mut tiers = IndexMap::new();
        tiers.insert("mobile".to_string(), BreakpointSpec { max_width: 767.0, columns: 2 });
        tiers.insert("tablet".to_string(), BreakpointSpec { max_width: 1023.0, columns: 3 });
        tiers.insert("desktop".to_string(), BreakpointSpec { max_width: 1399.0, columns: 4 });
        tiers.insert("large".to_string(), BreakpointSpec { max_width: 9999.0, columns: 5 });
        Self { tiers }
    }
}

impl Breakpoints {
    pub fn new(tiers: IndexMap<String, BreakpointSpec>) -> Self {
        Self { tiers }
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn get(&self, name: &str) -> Option<&BreakpointSpec> {
        self.tiers.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BreakpointSpec)> {
        self.tiers.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Resolve the active tier for a viewport width.
    ///
    /// Tiers are scanned in ascending `max_width` order and the first one
    /// with `width <= max_width` wins. If none matches (a gapped set built by
    /// hand), the tier with the largest `max_width` is returned.
    pub fn resolve(&self, width: f64) -> Option<(&str, &BreakpointSpec)> {
        let mut sorted: Vec<_> = self.tiers.iter().collect();
        sorted.sort_by(|a, b| {
            a.1.max_width
                .partial_cmp(&b.1.max_width)
                .expect("finite breakpoint widths")
        });

        for (name, spec) in &sorted {
            if width <= spec.max_width {
                return Some((name.as_str(), *spec));
            }
        }

        sorted.last().map(|(name, spec)| (name.as_str(), *spec))
    }
}

/// Nominal column width for the layout engine.
///
/// Deterministic and pure: `floor(container_width / (columns * 2.2))`.
pub fn column_width(columns: u32, container_width: f64) -> f64 {
    (container_width / (f64::from(columns) * COLUMN_SPAN_RATIO)).floor()
}
