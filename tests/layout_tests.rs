//! Integration tests for the variant density layout

use ferro_sv::layout::{is_discrete, ItemKind, LayoutEngine, Viewport};
use ferro_sv::variant::{analyze_variant, AnalyzedVariant, VariantRecord, VariantType};
use ferro_sv::LayoutConfig;

fn snv(position: u64) -> AnalyzedVariant {
    analyze_variant(&VariantRecord::snv(1, position, 'C', 'T'), "1").unwrap()
}

fn engine(collapsed: bool) -> LayoutEngine {
    LayoutEngine::new(LayoutConfig {
        collapsed,
        ..Default::default()
    })
}

#[test]
fn test_three_close_variants() {
    let variants = vec![snv(100), snv(104), snv(109)];
    let viewport = Viewport::new(1, 1000, 1000.0).unwrap();

    let collapsed = engine(true).layout(&variants, &viewport);
    assert_eq!(collapsed.items.len(), 1);
    let bubble = collapsed.items[0].as_bubble().unwrap();
    assert_eq!(bubble.variations_count, 3);
    assert_eq!(bubble.members, vec![0, 1, 2]);

    let expanded = engine(false).layout(&variants, &viewport);
    assert_eq!(expanded.items.len(), 3);
    assert!(expanded.items.iter().all(|i| !i.is_aggregate()));
    assert_eq!(expanded.max_layer_index, 0);
}

#[test]
fn test_large_aggregate_is_not_expanded() {
    // zoomed out: 100 bp per pixel, so every variant falls into one circle
    let variants: Vec<_> = (100..160).map(snv).collect();
    let viewport = Viewport::new(1, 100_000, 1000.0).unwrap();
    let layout = engine(false).layout(&variants, &viewport);
    assert_eq!(layout.items.len(), 1);
    assert_eq!(layout.items[0].as_bubble().unwrap().variations_count, 60);
}

#[test]
fn test_small_aggregate_is_expanded() {
    let variants: Vec<_> = (100..140).map(snv).collect();
    let viewport = Viewport::new(1, 100_000, 1000.0).unwrap();
    let layout = engine(false).layout(&variants, &viewport);
    assert_eq!(layout.items.len(), 40);
}

#[test]
fn test_expand_threshold_from_config() {
    let variants: Vec<_> = (100..140).map(snv).collect();
    let viewport = Viewport::new(1, 100_000, 1000.0).unwrap();
    let config = LayoutConfig {
        expand_threshold: 10,
        ..Default::default()
    };
    let layout = LayoutEngine::new(config).layout(&variants, &viewport);
    assert_eq!(layout.items.len(), 1);
}

#[test]
fn test_structural_variant_gets_lane_below_short_ones() {
    let deletion =
        analyze_variant(&VariantRecord::symbolic(1, 200, 800, VariantType::Del), "1").unwrap();
    let variants = vec![deletion, snv(300), snv(302)];
    let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
    assert!(is_discrete(&variants[0], &viewport));

    let layout = engine(false).layout(&variants, &viewport);
    assert_eq!(layout.items.len(), 3);
    assert_eq!(layout.max_layer_index, 1);

    let deletion_item = layout
        .items
        .iter()
        .find(|i| i.kind == ItemKind::Variant { index: 0 })
        .unwrap();
    let interval = deletion_item.positioning[0];
    assert_eq!(interval.layer_index, 0);
    assert_eq!(interval.max_layer_index, 1);
    assert_eq!(interval.variants_under_count, 2);

    for item in layout.items.iter().filter(|i| i.kind != ItemKind::Variant { index: 0 }) {
        assert_eq!(item.positioning[0].layer_index, 1);
    }
}

#[test]
fn test_narrow_structural_variant_aggregates() {
    // 601 bp at 0.001 px per bp is not wider than a pixel
    let deletion =
        analyze_variant(&VariantRecord::symbolic(1, 200, 800, VariantType::Del), "1").unwrap();
    let viewport = Viewport::new(1, 1_000_000, 1000.0).unwrap();
    assert!(!is_discrete(&deletion, &viewport));
}

#[test]
fn test_bubble_end_covers_absorbed_structural_variant() {
    // a sub-pixel deletion followed by a point variant inside it
    let deletion =
        analyze_variant(&VariantRecord::symbolic(1, 100, 400_000, VariantType::Del), "1").unwrap();
    let variants = vec![deletion, snv(200)];
    let viewport = Viewport::new(1, 1_000_000_000, 1000.0).unwrap();
    assert!(!is_discrete(&variants[0], &viewport));

    let layout = engine(true).layout(&variants, &viewport);
    let bubble = layout.items[0].as_bubble().unwrap();
    assert_eq!(bubble.variations_count, 2);
    assert_eq!(bubble.start_index, 101);
    assert_eq!(bubble.end_index, 400_000);
}

#[test]
fn test_inter_chromosomal_breakend_is_never_discrete() {
    let record = VariantRecord::breakend(1, 500, "G", &["G[2:1500["]);
    let variant = analyze_variant(&record, "1").unwrap();
    assert!(variant.structural && variant.inter_chromosome);
    let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
    assert!(!is_discrete(&variant, &viewport));
}

#[test]
fn test_statistic_record_stays_a_bubble() {
    let variants = vec![
        analyze_variant(&VariantRecord::statistic(1, 1_000, 50_000, 7), "1").unwrap(),
        snv(900_000),
    ];
    let viewport = Viewport::new(1, 1_000_000, 1000.0).unwrap();
    let layout = engine(false).layout(&variants, &viewport);
    let bubbles: Vec<_> = layout.bubbles().collect();
    assert_eq!(bubbles.len(), 1);
    assert!(bubbles[0].server_side);
    assert_eq!(bubbles[0].variations_count, 7);
}

#[test]
fn test_layout_serializes_items() {
    let variants = vec![snv(100), snv(104)];
    let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
    let layout = engine(true).layout(&variants, &viewport);
    let value = serde_json::to_value(&layout).unwrap();
    assert_eq!(value["maxLayerIndex"], 0);
    assert_eq!(value["items"][0]["kind"]["kind"], "bubble");
    assert_eq!(value["items"][0]["kind"]["variationsCount"], 2);
}
