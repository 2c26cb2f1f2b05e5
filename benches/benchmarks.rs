//! Performance benchmarks for ferro-sv
//!
//! Run with: cargo bench
//! Run specific benchmark: cargo bench -- layout

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ferro_sv::layout::{LayoutEngine, Viewport};
use ferro_sv::variant::{analyze_allele, analyze_variant, AnalyzedVariant, VariantRecord, VariantType};
use ferro_sv::{LayoutConfig, MockAnnotationProvider, Reconstructor};

/// Deterministic mix of SNVs and deletions spread over `span` bases
fn variants(count: u64, span: u64) -> Vec<AnalyzedVariant> {
    (0..count)
        .map(|i| {
            let position = 1 + (i * 7919) % span;
            let record = if i % 10 == 0 {
                VariantRecord::symbolic(1, position, position + 500, VariantType::Del)
            } else {
                VariantRecord::snv(1, position, 'A', 'G')
            };
            analyze_variant(&record, "1").expect("valid record")
        })
        .collect()
}

// =============================================================================
// Layout benchmarks
// =============================================================================

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let engine = LayoutEngine::new(LayoutConfig::default());

    for count in [100u64, 1_000, 10_000] {
        let input = variants(count, 1_000_000);
        let viewport = Viewport::new(1, 1_000_000, 1200.0).expect("valid viewport");
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::new("variants", count), &input, |b, v| {
            b.iter(|| engine.layout(black_box(v), &viewport))
        });
    }

    group.finish();
}

/// Zoomed in, almost nothing aggregates and lane assignment dominates
fn bench_layout_zoomed(c: &mut Criterion) {
    let input = variants(2_000, 20_000);
    let viewport = Viewport::new(1, 20_000, 4000.0).expect("valid viewport");
    let engine = LayoutEngine::new(LayoutConfig::default());

    c.bench_function("layout_zoomed", |b| {
        b.iter(|| engine.layout(black_box(&input), &viewport))
    });
}

// =============================================================================
// Allele and reconstruction benchmarks
// =============================================================================

fn bench_alleles(c: &mut Criterion) {
    let alleles = vec![
        ("snv", "A", "G"),
        ("ins", "A", "ATTGCA"),
        ("symbolic", "N", "<INV>"),
        ("breakend", "G", "G]17:198982]"),
    ];

    let mut group = c.benchmark_group("alleles");
    for (name, reference, alternate) in &alleles {
        group.bench_function(*name, |b| {
            b.iter(|| analyze_allele(black_box(reference), black_box(alternate)))
        });
    }
    group.finish();
}

fn bench_reconstruction(c: &mut Criterion) {
    let provider = MockAnnotationProvider::with_test_data();
    let context = provider.reference().clone();
    let gene_file = context.gene_file.clone();
    let reconstructor = Reconstructor::new(provider, context);

    let records = vec![
        ("del", VariantRecord::symbolic(1, 100, 500, VariantType::Del)),
        ("inv", VariantRecord::symbolic(1, 100, 500, VariantType::Inv)),
        ("dup", VariantRecord::symbolic(1, 100, 500, VariantType::Dup)),
    ];

    let mut group = c.benchmark_group("reconstruction");
    for (name, record) in &records {
        group.bench_function(*name, |b| {
            b.iter(|| reconstructor.analyze_record(black_box(record), gene_file.as_ref()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_layout,
    bench_layout_zoomed,
    bench_alleles,
    bench_reconstruction,
);

criterion_main!(benches);
