//! Integration tests for junction reconstruction against the mock provider

use ferro_sv::annotation::{Gene, GeneFile, Interval, MockAnnotationProvider, Strand, Transcript};
use ferro_sv::config::ReconstructConfig;
use ferro_sv::junction::{Reconstructor, StructuralAnalysis, VariantAnalysis};
use ferro_sv::structure::BreakpointSide;
use ferro_sv::variant::{VariantRecord, VariantRequest, VariantType};
use ferro_sv::{ErrorCode, FerroError};

fn reconstructor_for(provider: MockAnnotationProvider) -> Reconstructor<MockAnnotationProvider> {
    let context = provider.reference().clone();
    Reconstructor::new(provider, context)
}

fn reconstructor() -> Reconstructor<MockAnnotationProvider> {
    reconstructor_for(MockAnnotationProvider::with_test_data())
}

fn gene_file() -> GeneFile {
    GeneFile::new(100, "genes.gtf")
}

fn structural(record: &VariantRecord) -> StructuralAnalysis {
    let analysis = reconstructor()
        .analyze_record(record, Some(&gene_file()))
        .unwrap();
    match analysis {
        VariantAnalysis::Structural(analysis) => *analysis,
        VariantAnalysis::Short(_) => panic!("expected a structural analysis"),
    }
}

// =============================================================================
// Deletion / inversion / duplication
// =============================================================================

#[test]
fn test_deletion_joins_two_genes() {
    let analysis = structural(&VariantRecord::symbolic(1, 100, 500, VariantType::Del));

    assert_eq!(analysis.chromosomes, vec!["1"]);
    assert_eq!(analysis.breakpoints.len(), 2);
    assert_eq!(analysis.connections.len(), 1);
    let names: Vec<&str> = analysis.genes.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["ALPHA", "BETA"]);

    assert_eq!(analysis.alt_structures.len(), 1);
    let structure = &analysis.alt_structures[0];
    assert_eq!(structure.gene_names(), vec!["ALPHA", "BETA"]);
    assert_eq!(structure.breakpoint, 70);
    assert_eq!(structure.total_exons_length, 370);
    assert_eq!(structure.chromosome.as_ref().and_then(|c| c.id), Some(1));
    assert!(analysis.duplicated_gene_names.is_none());
}

#[test]
fn test_deletion_structure_is_gap_free() {
    let analysis = structural(&VariantRecord::symbolic(1, 100, 500, VariantType::Del));
    let exons = &analysis.alt_structures[0].consensus_exons;
    for pair in exons.windows(2) {
        assert_eq!(pair[0].relative.end + 1, pair[1].relative.start);
    }
    assert_eq!(exons[0].relative.start, 0);
}

#[test]
fn test_inversion_yields_two_structures() {
    let analysis = structural(&VariantRecord::symbolic(1, 100, 500, VariantType::Inv));
    assert_eq!(analysis.connections.len(), 2);
    assert_eq!(analysis.alt_structures.len(), 2);
    for structure in &analysis.alt_structures {
        assert_eq!(structure.gene_names(), vec!["ALPHA", "BETA"]);
        assert!(structure.breakpoint > 0);
        assert!(structure.consensus_exons.iter().any(|e| e.is_breakpoint()));
    }
}

#[test]
fn test_inversion_flags_joining_exons() {
    // both ends fall inside exons: ALPHA at relative 69, BETA at relative 149
    let analysis = structural(&VariantRecord::symbolic(1, 100, 600, VariantType::Inv));
    assert_eq!(analysis.alt_structures.len(), 2);

    let forward = &analysis.alt_structures[0];
    assert_eq!(forward.breakpoint, 70);
    let backward = &analysis.alt_structures[1];
    assert_eq!(backward.breakpoint, 131);

    for structure in [forward, backward] {
        let exons = &structure.consensus_exons;
        assert_eq!(exons[1].gene_name, "ALPHA");
        assert_eq!(exons[1].breakpoint, Some(BreakpointSide::End));
        assert_eq!(exons[2].gene_name, "BETA");
        assert_eq!(exons[2].breakpoint, Some(BreakpointSide::Start));
        assert_eq!(exons[2].relative.start, structure.breakpoint);
        assert_eq!(exons.iter().filter(|e| e.is_breakpoint()).count(), 2);
    }
}

#[test]
fn test_duplication_across_genes() {
    let analysis = structural(&VariantRecord::symbolic(1, 250, 12_000, VariantType::Dup));
    assert_eq!(analysis.alt_structures.len(), 3);
    assert_eq!(analysis.alt_structures[0].gene_names(), vec!["ALPHA"]);
    assert_eq!(analysis.alt_structures[1].gene_names(), vec!["GAMMA", "ALPHA"]);
    assert_eq!(analysis.alt_structures[2].gene_names(), vec!["GAMMA"]);
    // BETA lies inside the duplicated region without being hit
    assert_eq!(analysis.duplicated_gene_names, Some(vec!["BETA".to_string()]));
}

#[test]
fn test_duplication_inside_one_gene() {
    let analysis = structural(&VariantRecord::symbolic(1, 11_000, 16_000, VariantType::Dup));
    assert_eq!(analysis.alt_structures.len(), 1);
    assert_eq!(analysis.alt_structures[0].gene_names(), vec!["GAMMA"]);
    assert!(analysis.duplicated_gene_names.is_none());
}

#[test]
fn test_breakpoint_without_gene_gets_placeholder() {
    let analysis = structural(&VariantRecord::symbolic(1, 5_000, 10_500, VariantType::Del));
    let structure = &analysis.alt_structures[0];
    assert_eq!(structure.gene_names(), vec!["empty_0", "GAMMA"]);
    // placeholder is a quarter of the empty gene length
    assert_eq!(structure.breakpoint, 5);
    assert!(structure.consensus_exons[0].is_placeholder());
    assert!(analysis.genes[0].gene.is_empty());
}

#[test]
fn test_placeholder_length_follows_config() {
    let provider = MockAnnotationProvider::with_test_data();
    let context = provider.reference().clone();
    let config = ReconstructConfig {
        empty_gene_length: 40,
        ..Default::default()
    };
    let reconstructor = Reconstructor::with_config(provider, context, config);
    let record = VariantRecord::symbolic(1, 5_000, 10_500, VariantType::Del);
    let analysis = reconstructor
        .analyze_record(&record, Some(&gene_file()))
        .unwrap();
    assert_eq!(analysis.structural().unwrap().alt_structures[0].breakpoint, 10);
}

#[test]
fn test_structural_variant_without_gene_file_fails() {
    let record = VariantRecord::symbolic(1, 100, 500, VariantType::Del);
    let err = reconstructor().analyze_record(&record, None).unwrap_err();
    assert_eq!(err, FerroError::NoAnnotationAvailable);
    assert_eq!(err.code(), ErrorCode::NoAnnotationAvailable);
    assert_eq!(err.to_string(), "No genes file is available");

    // a short variant is still described without annotation
    let record = VariantRecord::snv(1, 120, 'A', 'G');
    assert!(reconstructor().analyze_record(&record, None).unwrap().short().is_some());
}

// =============================================================================
// Breakends
// =============================================================================

#[test]
fn test_inter_chromosomal_breakend_is_labelled_only() {
    let record = VariantRecord::breakend(1, 150, "G", &["G[2:1500["]);
    let analysis = structural(&record);

    assert!(analysis.variant.inter_chromosome);
    assert_eq!(analysis.chromosomes, vec!["1", "2"]);
    assert_eq!(analysis.breakpoints[1].chromosome.id, Some(2));
    let names: Vec<&str> = analysis.genes.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["ALPHA", "DELTA"]);

    assert!(analysis.alt_structures.is_empty());
    assert_eq!(analysis.junction_labels.len(), 1);
    assert_eq!(analysis.junction_labels[0].connection_index, 0);
    assert_eq!(analysis.junction_labels[0].label, "1:150 -> 2:1500");
}

#[test]
fn test_unknown_mate_chromosome_is_empty() {
    let record = VariantRecord::breakend(1, 150, "G", &["G[chrUn:1500["]);
    let analysis = structural(&record);
    assert_eq!(analysis.breakpoints[1].gene().map(|g| g.name()), Some("empty_1"));
    assert!(analysis.alt_structures.is_empty());
    assert_eq!(analysis.junction_labels[0].label, "1:150 -> chrUn:1500");
}

#[test]
fn test_intra_chromosomal_breakend_is_reconstructed() {
    let record = VariantRecord::breakend(1, 150, "G", &["G[1:500["]);
    let analysis = structural(&record);
    assert!(!analysis.variant.inter_chromosome);
    assert!(analysis.junction_labels.is_empty());
    assert_eq!(analysis.alt_structures.len(), 1);
    let structure = &analysis.alt_structures[0];
    assert_eq!(structure.chromosome.as_ref().and_then(|c| c.id), Some(1));
    let last = structure.consensus_exons.last().map_or(0, |e| e.relative.end + 1);
    assert_eq!(structure.total_exons_length, last);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_unsupported_type() {
    let record = VariantRecord::symbolic(1, 100, 500, VariantType::Other("CNV".to_string()));
    let err = reconstructor()
        .analyze_record(&record, Some(&gene_file()))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnsupportedVariantType);
    assert_eq!(err.to_string(), "'CNV' variant visualization is not supported.");
}

#[test]
fn test_fetch_failure_surfaces_as_unavailable() {
    let r = reconstructor_for(MockAnnotationProvider::with_test_data().fail_fetches(true));
    let err = r
        .analyze(&VariantRequest::new(7, 1, 100), Some(&gene_file()))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::VariantInfoUnavailable);
}

#[test]
fn test_invalid_breakend_is_not_hidden() {
    let record = VariantRecord::breakend(1, 150, "G", &["G[2:15x0["]);
    let err = reconstructor()
        .analyze_record(&record, Some(&gene_file()))
        .unwrap_err();
    assert!(matches!(err, FerroError::InvalidBreakend { .. }));
}

// =============================================================================
// Loading through a request
// =============================================================================

#[test]
fn test_analyze_by_request() {
    let mut provider = MockAnnotationProvider::with_test_data();
    provider.add_variant(VariantRecord::symbolic(1, 100, 500, VariantType::Del));
    let r = reconstructor_for(provider);

    let selection = r.pre_analyze().unwrap();
    let analysis = r
        .analyze(&VariantRequest::new(7, 1, 100), Some(&selection.selected))
        .unwrap();
    assert_eq!(analysis.structural().unwrap().alt_structures[0].breakpoint, 70);

    let err = r
        .analyze(&VariantRequest::new(7, 1, 101), Some(&selection.selected))
        .unwrap_err();
    assert!(matches!(err, FerroError::VariantInfoUnavailable { .. }));
}

#[test]
fn test_short_variant_features() {
    // the deletion removes bases 121..=122 of ALPHA's second exon
    let record = VariantRecord::new(1, 120, 122, "ATT", vec!["A".to_string()]);
    let analysis = reconstructor()
        .analyze_record(&record, Some(&gene_file()))
        .unwrap();
    let short = analysis.short().unwrap();
    assert_eq!(short.display_reference, "ATT");
    let allele = &short.alleles[0];
    assert_eq!(allele.display_source, "A");
    assert_eq!(allele.affected[0].name, "ALPHA");
    assert!(!allele.rows.is_empty());
}

#[test]
fn test_analysis_is_repeatable() {
    let record = VariantRecord::symbolic(1, 100, 500, VariantType::Inv);
    let r = reconstructor();
    let first = r.analyze_record(&record, Some(&gene_file())).unwrap();
    let second = r.analyze_record(&record, Some(&gene_file())).unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Selection changes
// =============================================================================

fn overlapping_genes() -> Reconstructor<MockAnnotationProvider> {
    let mut provider = MockAnnotationProvider::with_test_data();
    provider.add_gene(
        1,
        Gene::new("ANTI", 90, 400, Strand::Negative).with_transcript(Transcript::new(
            "ANTI-201",
            vec![Interval::new(0, 99), Interval::new(200, 310)],
        )),
    );
    reconstructor_for(provider)
}

fn overlapping_deletion() -> StructuralAnalysis {
    let record = VariantRecord::symbolic(1, 100, 500, VariantType::Del);
    let analysis = overlapping_genes()
        .analyze_record(&record, Some(&gene_file()))
        .unwrap();
    analysis.structural().unwrap().clone()
}

#[test]
fn test_first_resolved_gene_is_selected() {
    let analysis = overlapping_deletion();
    let names: Vec<&str> = analysis.breakpoints[0]
        .affected_genes
        .iter()
        .map(|g| g.name())
        .collect();
    assert_eq!(names, vec!["ALPHA", "ANTI"]);
    assert_eq!(analysis.alt_structures[0].gene_names(), vec!["ALPHA", "BETA"]);
}

#[test]
fn test_change_affected_gene() {
    let mut analysis = overlapping_deletion();
    analysis.change_affected_gene(0, "ANTI", 5).unwrap();
    assert_eq!(analysis.genes[0].name, "ANTI");
    assert_eq!(analysis.alt_structures[0].gene_names(), vec!["ANTI", "BETA"]);

    // switching back restores the original structure
    let original = overlapping_deletion();
    analysis.change_affected_gene(0, "ALPHA", 5).unwrap();
    assert_eq!(analysis.alt_structures, original.alt_structures);
}

#[test]
fn test_change_affected_gene_errors() {
    let mut analysis = overlapping_deletion();
    let err = analysis.change_affected_gene(0, "GAMMA", 5).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownGene);
    let err = analysis.change_affected_gene(9, "ALPHA", 5).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidConnection);
}

#[test]
fn test_change_affected_transcript() {
    let mut analysis = overlapping_deletion();
    let before = analysis.alt_structures[0].breakpoint;
    analysis
        .change_affected_transcript("ALPHA", "ALPHA-202", 5)
        .unwrap();
    let selected = analysis.breakpoints[0]
        .gene()
        .and_then(|g| g.structure())
        .and_then(|s| s.selected_transcript.clone());
    assert_eq!(selected.as_deref(), Some("ALPHA-202"));
    assert_ne!(analysis.alt_structures[0].breakpoint, before);

    let err = analysis
        .change_affected_transcript("ALPHA", "ALPHA-999", 5)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownTranscript);
    let err = analysis
        .change_affected_transcript("ZETA", "ZETA-201", 5)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownGene);
}

#[test]
fn test_rebuild_is_idempotent() {
    let mut analysis = overlapping_deletion();
    let before = analysis.clone();
    analysis.rebuild(5).unwrap();
    assert_eq!(analysis, before);
}
