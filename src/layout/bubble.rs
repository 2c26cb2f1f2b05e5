//! Aggregating nearby variants into count bubbles
//!
//! Three passes run over variants sorted by start:
//!
//! 1. [`aggregate`] scans left to right keeping one open bubble; a variant
//!    whose start lies within the margin of the open bubble's circle joins it.
//! 2. [`combine_bubbles`] merges neighbouring aggregates whose circles touch.
//! 3. [`expand_bubbles`] turns small aggregates back into their variants.

use crate::layout::label::LabelMetrics;
use crate::layout::viewport::Viewport;
use crate::variant::{AnalyzedVariant, PositioningInterval};
use serde::{Deserialize, Serialize};

/// An aggregate of one or more variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bubble {
    pub start_index: u64,
    pub end_index: u64,
    pub variations_count: u64,
    /// Radius in pixels
    pub radius: f64,
    /// Indices of the member variants in the layout input
    pub members: Vec<usize>,
    /// A single aggregate record delivered by the data source
    pub server_side: bool,
}

impl Bubble {
    fn midpoint(&self) -> f64 {
        (self.start_index + self.end_index) as f64 / 2.0
    }

    fn absorb(&mut self, other: &Bubble, metrics: &LabelMetrics) {
        self.variations_count += other.variations_count;
        self.end_index = self.end_index.max(other.end_index);
        self.radius = metrics.bubble_radius(self.variations_count);
        self.members.extend_from_slice(&other.members);
        self.server_side = false;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ItemKind {
    /// A variant drawn on its own; `index` points into the layout input
    Variant { index: usize },
    Bubble(Bubble),
}

/// One render-ready entry with its lane assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    pub kind: ItemKind,
    pub start_index: u64,
    pub end_index: u64,
    pub positioning: Vec<PositioningInterval>,
}

impl LayoutItem {
    pub fn variant(index: usize, variant: &AnalyzedVariant) -> Self {
        Self {
            kind: ItemKind::Variant { index },
            start_index: variant.start_index_corrected,
            end_index: variant.end_index,
            positioning: variant.positioning.clone(),
        }
    }

    pub fn bubble(bubble: Bubble) -> Self {
        Self {
            start_index: bubble.start_index,
            end_index: bubble.end_index,
            positioning: vec![PositioningInterval::new(bubble.start_index, bubble.end_index)],
            kind: ItemKind::Bubble(bubble),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self.kind, ItemKind::Bubble(_))
    }

    pub fn as_bubble(&self) -> Option<&Bubble> {
        match &self.kind {
            ItemKind::Bubble(bubble) => Some(bubble),
            ItemKind::Variant { .. } => None,
        }
    }

    pub fn variations_count(&self, variants: &[AnalyzedVariant]) -> u64 {
        match &self.kind {
            ItemKind::Bubble(bubble) => bubble.variations_count,
            ItemKind::Variant { index } => variants
                .get(*index)
                .map_or(1, |v| u64::from(v.variations_count())),
        }
    }
}

/// An entry of the first pass: standalone, or a candidate bubble that becomes
/// an aggregate once it absorbs a neighbour.
enum Entry {
    Standalone(usize),
    Open { bubble: Bubble, aggregate: bool },
}

fn single_bubble(index: usize, variant: &AnalyzedVariant, metrics: &LabelMetrics) -> Bubble {
    let count = u64::from(variant.variations_count());
    Bubble {
        start_index: variant.start_index_corrected,
        end_index: variant.end_index,
        variations_count: count,
        radius: metrics.bubble_radius(count),
        members: vec![index],
        server_side: variant.is_statistic(),
    }
}

/// Whether a variant must be drawn as its own interval.
pub fn is_discrete(variant: &AnalyzedVariant, viewport: &Viewport) -> bool {
    variant.structural && !variant.inter_chromosome && viewport.bp_to_px(variant.length as f64) > 1.0
}

/// First aggregation pass over `order`, the variant indices sorted by start.
pub fn aggregate(
    variants: &[AnalyzedVariant],
    order: &[usize],
    viewport: &Viewport,
    margin: f64,
    metrics: &LabelMetrics,
) -> Vec<LayoutItem> {
    let margin_bp = viewport.px_to_bp(margin);
    let mut entries: Vec<Entry> = Vec::new();
    let mut open: Option<usize> = None;

    for &index in order {
        let Some(variant) = variants.get(index) else {
            continue;
        };
        if is_discrete(variant, viewport) {
            entries.push(Entry::Standalone(index));
            open = None;
            continue;
        }

        if let Some(Entry::Open { bubble, aggregate: merged }) =
            open.and_then(|i| entries.get_mut(i))
        {
            let reach = bubble.midpoint() + viewport.px_to_bp(bubble.radius);
            if variant.start_index as f64 - margin_bp <= reach {
                let member = single_bubble(index, variant, metrics);
                bubble.absorb(&member, metrics);
                *merged = true;
                continue;
            }
        }

        entries.push(Entry::Open {
            bubble: single_bubble(index, variant, metrics),
            aggregate: variant.is_statistic(),
        });
        open = Some(entries.len() - 1);
    }

    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Standalone(index) => Some(LayoutItem::variant(index, &variants[index])),
            Entry::Open {
                bubble,
                aggregate: true,
            } => Some(LayoutItem::bubble(bubble)),
            Entry::Open { bubble, .. } => bubble
                .members
                .first()
                .map(|&index| LayoutItem::variant(index, &variants[index])),
        })
        .collect()
}

/// Second pass: merge neighbouring aggregates whose circles, widened by the
/// margin, touch. Standalone variants end the running aggregate.
pub fn combine_bubbles(
    items: Vec<LayoutItem>,
    viewport: &Viewport,
    margin: f64,
    metrics: &LabelMetrics,
) -> Vec<LayoutItem> {
    let margin_bp = viewport.px_to_bp(margin);
    let mut result = Vec::with_capacity(items.len());
    let mut running: Option<Bubble> = None;

    for item in items {
        let bubble = match item.kind {
            ItemKind::Bubble(bubble) => bubble,
            kind => {
                if let Some(previous) = running.take() {
                    result.push(LayoutItem::bubble(previous));
                }
                result.push(LayoutItem { kind, ..item });
                continue;
            }
        };
        match running.as_mut() {
            Some(previous)
                if bubble.midpoint() - viewport.px_to_bp(bubble.radius) - margin_bp
                    <= previous.midpoint() + viewport.px_to_bp(previous.radius) =>
            {
                previous.absorb(&bubble, metrics);
            }
            _ => {
                if let Some(previous) = running.replace(bubble) {
                    result.push(LayoutItem::bubble(previous));
                }
            }
        }
    }
    if let Some(previous) = running {
        result.push(LayoutItem::bubble(previous));
    }
    result
}

/// Third pass: aggregates below `threshold` are replaced by their members.
/// Single server-side aggregates stay bubbles.
pub fn expand_bubbles(
    items: Vec<LayoutItem>,
    variants: &[AnalyzedVariant],
    threshold: u64,
    metrics: &LabelMetrics,
) -> Vec<LayoutItem> {
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        match item.kind {
            ItemKind::Bubble(bubble) if !bubble.server_side && bubble.variations_count < threshold => {
                for index in bubble.members {
                    let Some(variant) = variants.get(index) else {
                        continue;
                    };
                    if variant.is_statistic() {
                        result.push(LayoutItem::bubble(single_bubble(index, variant, metrics)));
                    } else {
                        result.push(LayoutItem::variant(index, variant));
                    }
                }
            }
            kind => result.push(LayoutItem { kind, ..item }),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::variant::{analyze_variant, VariantRecord, VariantType};

    fn metrics() -> LabelMetrics {
        LabelMetrics::from_config(&LayoutConfig::default())
    }

    fn snvs(positions: &[u64]) -> Vec<AnalyzedVariant> {
        positions
            .iter()
            .map(|&p| analyze_variant(&VariantRecord::snv(1, p, 'A', 'C'), "1").unwrap())
            .collect()
    }

    fn all(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_close_variants_aggregate() {
        // 1 px per bp; first radius is 10 px, margin 5 px
        let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
        let variants = snvs(&[100, 105, 112]);
        let items = aggregate(&variants, &all(3), &viewport, 5.0, &metrics());
        assert_eq!(items.len(), 1);
        let bubble = items[0].as_bubble().unwrap();
        assert_eq!(bubble.variations_count, 3);
        assert_eq!(bubble.members, vec![0, 1, 2]);
        assert_eq!((bubble.start_index, bubble.end_index), (100, 112));
    }

    #[test]
    fn test_distant_variants_stay_apart() {
        let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
        let variants = snvs(&[100, 300]);
        let items = aggregate(&variants, &all(2), &viewport, 5.0, &metrics());
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| !i.is_aggregate()));
    }

    #[test]
    fn test_wide_structural_variant_closes_bubble() {
        let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
        let mut variants = snvs(&[100]);
        variants.push(
            analyze_variant(&VariantRecord::symbolic(1, 101, 400, VariantType::Del), "1").unwrap(),
        );
        variants.extend(snvs(&[102]));
        let items = aggregate(&variants, &all(3), &viewport, 5.0, &metrics());
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].kind, ItemKind::Variant { index: 1 });
    }

    #[test]
    fn test_absorbed_point_inside_span_keeps_end() {
        // 1 Mb per pixel: the deletion is narrower than a pixel and aggregates
        let viewport = Viewport::new(1, 1_000_000_000, 1000.0).unwrap();
        let deletion = VariantRecord::symbolic(1, 100, 400_000, VariantType::Del);
        let mut variants = vec![analyze_variant(&deletion, "1").unwrap()];
        variants.extend(snvs(&[200]));
        let items = aggregate(&variants, &all(2), &viewport, 5.0, &metrics());
        let items = combine_bubbles(items, &viewport, 5.0, &metrics());
        let bubble = items[0].as_bubble().unwrap();
        assert_eq!(bubble.variations_count, 2);
        assert_eq!((bubble.start_index, bubble.end_index), (101, 400_000));
    }

    #[test]
    fn test_statistic_is_always_a_bubble() {
        let viewport = Viewport::new(1, 1_000_000, 1000.0).unwrap();
        let variants =
            vec![analyze_variant(&VariantRecord::statistic(1, 100, 5000, 12), "1").unwrap()];
        let items = aggregate(&variants, &[0], &viewport, 5.0, &metrics());
        let items = expand_bubbles(items, &variants, 50, &metrics());
        let bubble = items[0].as_bubble().unwrap();
        assert!(bubble.server_side);
        assert_eq!(bubble.variations_count, 12);
    }

    #[test]
    fn test_combine_touching_bubbles() {
        let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
        let a = Bubble {
            start_index: 100,
            end_index: 110,
            variations_count: 60,
            radius: 10.0,
            members: vec![0],
            server_side: false,
        };
        let b = Bubble {
            start_index: 125,
            end_index: 135,
            members: vec![1],
            ..a.clone()
        };
        let c = Bubble {
            start_index: 500,
            end_index: 510,
            members: vec![2],
            ..a.clone()
        };
        let items = vec![a, b, c].into_iter().map(LayoutItem::bubble).collect();
        let combined = combine_bubbles(items, &viewport, 5.0, &metrics());
        assert_eq!(combined.len(), 2);
        let first = combined[0].as_bubble().unwrap();
        assert_eq!(first.variations_count, 120);
        assert_eq!(first.end_index, 135);
        assert_eq!(first.members, vec![0, 1]);
    }

    #[test]
    fn test_expand_small_bubbles_only() {
        let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
        let variants = snvs(&[100, 105, 112]);
        let items = aggregate(&variants, &all(3), &viewport, 5.0, &metrics());
        let expanded = expand_bubbles(items.clone(), &variants, 50, &metrics());
        assert_eq!(expanded.len(), 3);
        assert!(expanded.iter().all(|i| !i.is_aggregate()));

        let kept = expand_bubbles(items, &variants, 3, &metrics());
        assert_eq!(kept.len(), 1);
    }
}
