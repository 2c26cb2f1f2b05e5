//! Lane assignment for rendered intervals

use crate::layout::bubble::LayoutItem;
use crate::variant::PositioningInterval;

/// Assign a lane to every interval, longest first.
///
/// Intervals are processed by descending length (ties keep input order). An
/// interval takes the lane above the highest lane among already placed
/// intervals it overlaps, or lane 0. Every overlapped interval records the
/// highest lane stacked on it and, unless the newcomer is an aggregate, one
/// more variant drawn above it.
///
/// `aggregate[i]` flags whether `intervals[i]` belongs to a bubble; missing
/// entries count as plain variants. Returns the highest lane used.
pub fn assign_interval_layers(intervals: &mut [PositioningInterval], aggregate: &[bool]) -> usize {
    let mut order: Vec<usize> = (0..intervals.len()).collect();
    order.sort_by(|&a, &b| intervals[b].length.cmp(&intervals[a].length));

    for interval in intervals.iter_mut() {
        interval.layer_index = 0;
        interval.max_layer_index = 0;
        interval.variants_under_count = 0;
    }

    let mut max_layer = 0;
    for (position, &current) in order.iter().enumerate() {
        let is_aggregate = aggregate.get(current).copied().unwrap_or(false);
        let overlapping: Vec<usize> = order[..position]
            .iter()
            .copied()
            .filter(|&placed| intervals[placed].overlaps(&intervals[current]))
            .collect();

        let layer = overlapping
            .iter()
            .map(|&placed| intervals[placed].layer_index + 1)
            .max()
            .unwrap_or(0);

        for &placed in &overlapping {
            let other = &mut intervals[placed];
            other.max_layer_index = other.max_layer_index.max(layer);
            if !is_aggregate {
                other.variants_under_count += 1;
            }
        }

        let interval = &mut intervals[current];
        interval.layer_index = layer;
        interval.max_layer_index = layer;
        max_layer = max_layer.max(layer);
    }
    max_layer
}

/// Assign lanes across all positioning intervals of `items`.
pub fn assign_lanes(items: &mut [LayoutItem]) -> usize {
    let mut flat: Vec<PositioningInterval> = Vec::new();
    let mut aggregate: Vec<bool> = Vec::new();
    for item in items.iter() {
        for interval in &item.positioning {
            flat.push(*interval);
            aggregate.push(item.is_aggregate());
        }
    }

    let max_layer = assign_interval_layers(&mut flat, &aggregate);

    let mut assigned = flat.into_iter();
    for item in items.iter_mut() {
        for interval in item.positioning.iter_mut() {
            if let Some(value) = assigned.next() {
                *interval = value;
            }
        }
    }
    max_layer
}
