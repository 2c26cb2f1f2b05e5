//! Tests for the CLI helpers: bundle loading, variant input and text output

use ferro_sv::annotation::{AnnotationBundle, ChromosomeGenes, Gene, Interval, Strand, Transcript};
use ferro_sv::cli::{output_analysis, output_layout, read_json, read_variants, OutputFormat};
use ferro_sv::layout::{LayoutEngine, Viewport};
use ferro_sv::variant::{analyze_variant, VariantRecord, VariantRequest, VariantType};
use ferro_sv::{MockAnnotationProvider, Reconstructor, SvConfig};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

fn bundle() -> AnnotationBundle {
    let provider = MockAnnotationProvider::with_test_data();
    AnnotationBundle {
        reference: provider.reference().clone(),
        genes: vec![ChromosomeGenes {
            chromosome_id: 1,
            genes: vec![
                Gene::new("ALPHA", 1, 300, Strand::Positive).with_transcript(Transcript::new(
                    "ALPHA-201",
                    vec![Interval::new(0, 49), Interval::new(80, 129), Interval::new(200, 299)],
                )),
                Gene::new("BETA", 401, 900, Strand::Negative).with_transcript(Transcript::new(
                    "BETA-201",
                    vec![Interval::new(0, 99), Interval::new(150, 249), Interval::new(300, 499)],
                )),
            ],
        }],
        variants: vec![VariantRecord::symbolic(1, 100, 500, VariantType::Del)],
    }
}

fn render<F: FnOnce(&mut Cursor<Vec<u8>>)>(f: F) -> String {
    let mut buffer = Cursor::new(Vec::new());
    f(&mut buffer);
    String::from_utf8(buffer.into_inner()).unwrap()
}

#[test]
fn test_bundle_file_drives_analysis() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bundle.json");
    fs::write(&path, serde_json::to_string_pretty(&bundle()).unwrap()).unwrap();

    let provider = MockAnnotationProvider::from_json(&path).unwrap();
    let context = provider.reference().clone();
    let reconstructor = Reconstructor::new(provider, context);
    let selection = reconstructor.pre_analyze().unwrap();
    let analysis = reconstructor
        .analyze(&VariantRequest::new(1, 1, 100), Some(&selection.selected))
        .unwrap();

    let text = render(|w| output_analysis(w, &analysis, OutputFormat::Text).unwrap());
    assert!(text.contains("breakpoint 1: 1:100 ALPHA"));
    assert!(text.contains("breakpoint 2: 1:500 BETA"));
    assert!(text.contains("structure 1: ALPHA-BETA junction at 70 of 370"));

    let json = render(|w| output_analysis(w, &analysis, OutputFormat::Json).unwrap());
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["kind"], "structural");
    assert_eq!(value["altStructures"][0]["breakpoint"], 70);
}

#[test]
fn test_inter_chromosomal_junction_text() {
    let provider = MockAnnotationProvider::with_test_data();
    let context = provider.reference().clone();
    let gene_file = context.gene_file.clone();
    let reconstructor = Reconstructor::new(provider, context);
    let record = VariantRecord::breakend(1, 150, "G", &["G[2:1500["]);
    let analysis = reconstructor
        .analyze_record(&record, gene_file.as_ref())
        .unwrap();

    let text = render(|w| output_analysis(w, &analysis, OutputFormat::Text).unwrap());
    assert!(text.contains("breakpoint 2: 2:1500 DELTA"));
    assert!(text.contains("junction 1: 1:150 -> 2:1500"));
    assert!(!text.contains("structure 1:"));

    let json = render(|w| output_analysis(w, &analysis, OutputFormat::Json).unwrap());
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["junctionLabels"][0]["label"], "1:150 -> 2:1500");
    assert_eq!(value["altStructures"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_read_variant_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("variant.json");
    let record = VariantRecord::breakend(1, 150, "G", &["G[2:1500["]);
    fs::write(&path, serde_json::to_string(&record).unwrap()).unwrap();
    let loaded: VariantRecord = read_json(&path).unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn test_layout_text_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("variants.json");
    let records = vec![
        VariantRecord::snv(1, 100, 'A', 'G'),
        VariantRecord::snv(1, 104, 'A', 'G'),
        VariantRecord::snv(1, 700, 'A', 'G'),
    ];
    fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

    let variants: Vec<_> = read_variants(&path)
        .unwrap()
        .iter()
        .map(|r| analyze_variant(r, "1").unwrap())
        .collect();
    let viewport = Viewport::new(1, 1000, 1000.0).unwrap();
    let config = SvConfig::default().merge_with_cli(Some(true), None);
    let layout = LayoutEngine::new(config.layout).layout(&variants, &viewport);

    let text = render(|w| output_layout(w, &layout, &variants, OutputFormat::Text).unwrap());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "bubble x2 100-104 lane 0");
    assert_eq!(lines[1], "variant \u{2192} 700-700 lane 0");
    assert_eq!(lines[2], "lanes: 1");
}
