//! Density layout of variants inside a visible window
//!
//! The layout engine is a pure function of the variants, the viewport and the
//! [`LayoutConfig`]. It never performs I/O, so it can be re-run on every
//! viewport change.
//!
//! # Example
//!
//! ```
//! use ferro_sv::config::LayoutConfig;
//! use ferro_sv::layout::{LayoutEngine, Viewport};
//! use ferro_sv::variant::{analyze_variant, VariantRecord};
//!
//! let variants: Vec<_> = [100, 104, 109]
//!     .iter()
//!     .map(|&p| analyze_variant(&VariantRecord::snv(1, p, 'A', 'T'), "1").unwrap())
//!     .collect();
//! let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
//!
//! let layout = LayoutEngine::new(LayoutConfig::default()).layout(&variants, &viewport);
//! // aggregated into one bubble of 3, then expanded back below the threshold
//! assert_eq!(layout.items.len(), 3);
//! ```

pub mod bubble;
pub mod label;
pub mod lanes;
pub mod viewport;

pub use bubble::{aggregate, combine_bubbles, expand_bubbles, is_discrete, Bubble, ItemKind, LayoutItem};
pub use label::{compact_count, LabelMetrics, TextSize};
pub use lanes::{assign_interval_layers, assign_lanes};
pub use viewport::Viewport;

use crate::config::LayoutConfig;
use crate::variant::AnalyzedVariant;
use serde::{Deserialize, Serialize};

/// Render-ready items with their lanes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub items: Vec<LayoutItem>,
    /// Highest lane used; sizes the vertical band
    pub max_layer_index: usize,
}

impl Layout {
    pub fn bubbles(&self) -> impl Iterator<Item = &Bubble> {
        self.items.iter().filter_map(LayoutItem::as_bubble)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Aggregate, combine, expand (unless collapsed) and assign lanes.
    pub fn layout(&self, variants: &[AnalyzedVariant], viewport: &Viewport) -> Layout {
        let metrics = LabelMetrics::from_config(&self.config);
        let margin = self.config.bubble_margin;

        let mut order: Vec<usize> = (0..variants.len()).collect();
        order.sort_by_key(|&i| variants[i].start_index);

        let items = aggregate(variants, &order, viewport, margin, &metrics);
        let mut items = combine_bubbles(items, viewport, margin, &metrics);
        if !self.config.collapsed {
            items = expand_bubbles(
                items,
                variants,
                u64::from(self.config.expand_threshold),
                &metrics,
            );
        }
        let max_layer_index = assign_lanes(&mut items);

        log::debug!(
            "laid out {} variants as {} items over {} lanes",
            variants.len(),
            items.len(),
            max_layer_index + 1
        );
        Layout {
            items,
            max_layer_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{analyze_variant, VariantRecord};

    fn snv(position: u64) -> AnalyzedVariant {
        analyze_variant(&VariantRecord::snv(1, position, 'A', 'G'), "1").unwrap()
    }

    #[test]
    fn test_input_is_sorted_by_start() {
        let variants = vec![snv(900), snv(100)];
        let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
        let layout = LayoutEngine::default().layout(&variants, &viewport);
        assert_eq!(layout.items[0].kind, ItemKind::Variant { index: 1 });
        assert_eq!(layout.items[1].kind, ItemKind::Variant { index: 0 });
    }

    #[test]
    fn test_collapsed_keeps_bubbles() {
        let variants = vec![snv(100), snv(102), snv(104)];
        let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
        let config = LayoutConfig {
            collapsed: true,
            ..Default::default()
        };
        let layout = LayoutEngine::new(config).layout(&variants, &viewport);
        assert_eq!(layout.items.len(), 1);
        assert_eq!(layout.bubbles().next().map(|b| b.variations_count), Some(3));
    }

    #[test]
    fn test_empty_input() {
        let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
        let layout = LayoutEngine::default().layout(&[], &viewport);
        assert!(layout.items.is_empty());
        assert_eq!(layout.max_layer_index, 0);
    }
}
