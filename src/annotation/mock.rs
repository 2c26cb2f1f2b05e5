//! Mock annotation provider for testing

use crate::annotation::gene::{Chromosome, Domain, Gene, GeneFile, Interval, Strand, Transcript};
use crate::annotation::provider::{AnnotationProvider, ReferenceContext, TrackQuery};
use crate::error::FerroError;
use crate::variant::{VariantRecord, VariantRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Genes of one chromosome in an annotation bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromosomeGenes {
    pub chromosome_id: u64,
    pub genes: Vec<Gene>,
}

/// On-disk form of a mock provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationBundle {
    pub reference: ReferenceContext,
    #[serde(default)]
    pub genes: Vec<ChromosomeGenes>,
    #[serde(default)]
    pub variants: Vec<VariantRecord>,
}

/// Mock provider serving genes and variants from memory
#[derive(Debug, Clone, Default)]
pub struct MockAnnotationProvider {
    reference: ReferenceContext,
    genes: HashMap<u64, Vec<Gene>>,
    variants: Vec<VariantRecord>,
    fail_fetches: bool,
}

impl MockAnnotationProvider {
    /// Create an empty provider for a reference
    pub fn new(reference: ReferenceContext) -> Self {
        Self {
            reference,
            ..Default::default()
        }
    }

    /// Load a provider from an [`AnnotationBundle`] JSON file
    pub fn from_json(path: &Path) -> Result<Self, FerroError> {
        let content = std::fs::read_to_string(path)?;
        let bundle: AnnotationBundle = serde_json::from_str(&content)?;
        Ok(Self::from_bundle(bundle))
    }

    pub fn from_bundle(bundle: AnnotationBundle) -> Self {
        let mut provider = Self::new(bundle.reference);
        for entry in bundle.genes {
            provider
                .genes
                .entry(entry.chromosome_id)
                .or_default()
                .extend(entry.genes);
        }
        provider.variants = bundle.variants;
        provider
    }

    pub fn reference(&self) -> &ReferenceContext {
        &self.reference
    }

    pub fn add_gene(&mut self, chromosome_id: u64, gene: Gene) {
        self.genes.entry(chromosome_id).or_default().push(gene);
    }

    pub fn add_variant(&mut self, variant: VariantRecord) {
        self.variants.push(variant);
    }

    /// Make every fetch fail with [`FerroError::DataFetch`]
    pub fn fail_fetches(mut self, fail: bool) -> Self {
        self.fail_fetches = fail;
        self
    }

    fn check_available(&self, what: &str) -> Result<(), FerroError> {
        if self.fail_fetches {
            return Err(FerroError::fetch(format!("{} request failed", what)));
        }
        Ok(())
    }

    /// Create a provider with a small two-chromosome reference.
    ///
    /// | Gene | Chr | Span | Strand | Notes |
    /// |------|-----|------|--------|-------|
    /// | ALPHA | 1 | 1-300 | + | two transcripts, `Kinase` domain |
    /// | OLD | 1 | 100-200 | + | status `deprecated` |
    /// | BETA | 1 | 401-900 | - | `Zinc finger` domain |
    /// | GAMMA | 1 | 10001-20000 | + | `SH2` domain |
    /// | DELTA | 2 | 1001-2000 | + | `PDZ` domain |
    pub fn with_test_data() -> Self {
        let reference = ReferenceContext {
            id: 1,
            name: "test-ref".to_string(),
            chromosomes: vec![
                Chromosome::new(1, "1", 10_000_000),
                Chromosome::new(2, "2", 5_000_000),
            ],
            gene_file: Some(GeneFile::new(100, "genes.gtf")),
            gene_tracks: Vec::new(),
        };
        let mut provider = Self::new(reference);

        provider.add_gene(
            1,
            Gene::new("ALPHA", 1, 300, Strand::Positive)
                .with_transcript(
                    Transcript::new(
                        "ALPHA-201",
                        vec![
                            Interval::new(0, 49),
                            Interval::new(80, 129),
                            Interval::new(200, 299),
                        ],
                    )
                    .with_biotype("protein_coding")
                    .with_domains(vec![Domain::new("Kinase", 20, 70)]),
                )
                .with_transcript(Transcript::new(
                    "ALPHA-202",
                    vec![Interval::new(0, 59), Interval::new(200, 249)],
                )),
        );

        let mut old = Gene::new("OLD", 100, 200, Strand::Positive)
            .with_transcript(Transcript::new("OLD-201", vec![Interval::new(0, 100)]));
        old.status = Some("deprecated".to_string());
        provider.add_gene(1, old);

        provider.add_gene(
            1,
            Gene::new("BETA", 401, 900, Strand::Negative).with_transcript(
                Transcript::new(
                    "BETA-201",
                    vec![
                        Interval::new(0, 99),
                        Interval::new(150, 249),
                        Interval::new(300, 499),
                    ],
                )
                .with_biotype("protein_coding")
                .with_domains(vec![Domain::new("Zinc finger", 120, 180)]),
            ),
        );

        provider.add_gene(
            1,
            Gene::new("GAMMA", 10_001, 20_000, Strand::Positive).with_transcript(
                Transcript::new(
                    "GAMMA-201",
                    vec![
                        Interval::new(0, 999),
                        Interval::new(2000, 2999),
                        Interval::new(5000, 5999),
                        Interval::new(8000, 9999),
                    ],
                )
                .with_biotype("protein_coding")
                .with_domains(vec![Domain::new("SH2", 500, 1500)]),
            ),
        );

        provider.add_gene(
            2,
            Gene::new("DELTA", 1001, 2000, Strand::Positive).with_transcript(
                Transcript::new("DELTA-201", vec![Interval::new(0, 199), Interval::new(500, 699)])
                    .with_biotype("protein_coding")
                    .with_domains(vec![Domain::new("PDZ", 50, 120)]),
            ),
        );

        provider
    }
}

fn overlaps(gene: &Gene, query: &TrackQuery) -> bool {
    gene.start_index <= query.end_index && gene.end_index >= query.start_index
}

impl AnnotationProvider for MockAnnotationProvider {
    fn chromosome_by_name(
        &self,
        reference_id: u64,
        name: &str,
    ) -> Result<Option<Chromosome>, FerroError> {
        self.check_available("chromosome")?;
        if reference_id != self.reference.id {
            return Ok(None);
        }
        Ok(self
            .reference
            .chromosomes
            .iter()
            .find(|c| crate::variant::is_current_chromosome(&c.name, Some(name)))
            .cloned())
    }

    fn gene_transcripts(
        &self,
        _reference_id: u64,
        query: &TrackQuery,
    ) -> Result<Vec<Gene>, FerroError> {
        self.check_available("gene track")?;
        Ok(self
            .genes
            .get(&query.chromosome_id)
            .map(|genes| genes.iter().filter(|g| overlaps(g, query)).cloned().collect())
            .unwrap_or_default())
    }

    fn genes(&self, reference_id: u64, query: &TrackQuery) -> Result<Vec<Gene>, FerroError> {
        let mut genes = self.gene_transcripts(reference_id, query)?;
        for gene in &mut genes {
            gene.transcripts.clear();
        }
        Ok(genes)
    }

    fn variant(&self, request: &VariantRequest) -> Result<Option<VariantRecord>, FerroError> {
        self.check_available("variant")?;
        Ok(self
            .variants
            .iter()
            .find(|v| v.chromosome_id == request.chromosome_id && v.start_index == request.position)
            .cloned())
    }
}
