//! Variant analysis against an annotation provider
//!
//! [`Reconstructor`] is the outermost boundary of the junction pipeline: it
//! loads a variant, decides between the structural and the short-variant
//! path, resolves genes at every breakpoint and hands the result to
//! [`StructuralAnalysis`]. Provider failures surfacing here are converted to
//! [`FerroError::VariantInfoUnavailable`].

use crate::annotation::{
    affected_features, affected_rows, AffectedGene, AffectedRow, AnnotationProvider, Chromosome,
    GeneFile, GeneRef, ReferenceContext, TrackQuery,
};
use crate::config::ReconstructConfig;
use crate::error::FerroError;
use crate::junction::breakpoint::{breakpoints_for, Breakpoint};
use crate::junction::selection::StructuralAnalysis;
use crate::variant::{
    abbreviate, analyze_variant, AnalyzedAllele, AnalyzedVariant, VariantRecord, VariantRequest,
    VariantType,
};
use serde::{Deserialize, Serialize};

/// Bases shown around a short variant besides the variant itself.
const SHORT_VARIANT_FLANK: u64 = 50;

/// Gene files a variant can be analyzed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneFileSelection {
    pub gene_files: Vec<GeneFile>,
    pub selected: GeneFile,
}

/// Features hit by one alternative allele of a short variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlleleFeatures {
    pub allele: AnalyzedAllele,
    pub display_source: String,
    pub affected: Vec<AffectedGene>,
    pub rows: Vec<AffectedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortVariantAnalysis {
    pub variant: AnalyzedVariant,
    pub chromosome: Chromosome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene_file: Option<GeneFile>,
    pub display_reference: String,
    /// Window the features were loaded for
    pub window_start: u64,
    pub window_end: u64,
    pub alleles: Vec<AlleleFeatures>,
}

/// Result of analyzing one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VariantAnalysis {
    Structural(Box<StructuralAnalysis>),
    Short(Box<ShortVariantAnalysis>),
}

impl VariantAnalysis {
    pub fn structural(&self) -> Option<&StructuralAnalysis> {
        match self {
            VariantAnalysis::Structural(analysis) => Some(analysis),
            VariantAnalysis::Short(_) => None,
        }
    }

    pub fn short(&self) -> Option<&ShortVariantAnalysis> {
        match self {
            VariantAnalysis::Short(analysis) => Some(analysis),
            VariantAnalysis::Structural(_) => None,
        }
    }
}

fn unavailable(err: FerroError) -> FerroError {
    match err {
        FerroError::DataFetch { msg } => FerroError::VariantInfoUnavailable { cause: Some(msg) },
        other => other,
    }
}

/// Runs variant analysis for one reference.
pub struct Reconstructor<P: AnnotationProvider> {
    provider: P,
    context: ReferenceContext,
    config: ReconstructConfig,
}

impl<P: AnnotationProvider> Reconstructor<P> {
    /// Create a reconstructor with default constants
    pub fn new(provider: P, context: ReferenceContext) -> Self {
        Self {
            provider,
            context,
            config: ReconstructConfig::default(),
        }
    }

    /// Create a reconstructor with custom configuration
    pub fn with_config(provider: P, context: ReferenceContext, config: ReconstructConfig) -> Self {
        Self {
            provider,
            context,
            config,
        }
    }

    pub fn config(&self) -> &ReconstructConfig {
        &self.config
    }

    pub fn context(&self) -> &ReferenceContext {
        &self.context
    }

    /// List the gene files available and select the first.
    pub fn pre_analyze(&self) -> Result<GeneFileSelection, FerroError> {
        let gene_files = self.context.gene_files();
        let selected = gene_files
            .first()
            .cloned()
            .ok_or(FerroError::NoAnnotationAvailable)?;
        Ok(GeneFileSelection {
            gene_files,
            selected,
        })
    }

    /// Load a variant and analyze it.
    pub fn analyze(
        &self,
        request: &VariantRequest,
        gene_file: Option<&GeneFile>,
    ) -> Result<VariantAnalysis, FerroError> {
        let record = self
            .provider
            .variant(request)
            .map_err(unavailable)?
            .ok_or_else(|| FerroError::VariantInfoUnavailable {
                cause: Some(format!(
                    "no variant at {}:{}",
                    request.chromosome_id, request.position
                )),
            })?;
        self.analyze_record(&record, gene_file)
    }

    /// Analyze an already loaded record.
    pub fn analyze_record(
        &self,
        record: &VariantRecord,
        gene_file: Option<&GeneFile>,
    ) -> Result<VariantAnalysis, FerroError> {
        let chromosome = self
            .context
            .chromosome(record.chromosome_id)
            .cloned()
            .ok_or_else(|| FerroError::VariantInfoUnavailable {
                cause: Some(format!("unknown chromosome id {}", record.chromosome_id)),
            })?;
        let variant = analyze_variant(record, &chromosome.name)?;

        let analysis = if variant.structural || variant.inter_chromosome {
            self.analyze_structural(variant, &chromosome, gene_file)
                .map(|a| VariantAnalysis::Structural(Box::new(a)))
        } else {
            self.analyze_short(variant, chromosome, gene_file)
                .map(|a| VariantAnalysis::Short(Box::new(a)))
        };
        analysis.map_err(unavailable)
    }

    fn analyze_structural(
        &self,
        variant: AnalyzedVariant,
        chromosome: &Chromosome,
        gene_file: Option<&GeneFile>,
    ) -> Result<StructuralAnalysis, FerroError> {
        let (mut breakpoints, connections) = breakpoints_for(&variant, chromosome)?;
        let file = gene_file.ok_or(FerroError::NoAnnotationAvailable)?;

        for (index, breakpoint) in breakpoints.iter_mut().enumerate() {
            let genes = self.breakpoint_genes(breakpoint, file)?;
            if genes.is_empty() {
                log::warn!(
                    "no gene at {}:{}, using a placeholder",
                    breakpoint.chromosome.name,
                    breakpoint.position
                );
                breakpoint.set_genes(vec![GeneRef::empty(format!("empty_{}", index))]);
            } else {
                breakpoint.set_genes(genes);
            }
        }

        let duplicated = if variant.variant_type == VariantType::Dup && !variant.inter_chromosome {
            self.duplicated_genes(&variant, file, &breakpoints)?
        } else {
            None
        };

        let analysis = StructuralAnalysis::new(
            variant,
            Some(file.clone()),
            breakpoints,
            connections,
            duplicated,
            self.config.placeholder_length(),
        )?;
        log::info!(
            "{} variant: {} breakpoints, {} genes, {} alternative structures",
            analysis.variant.variant_type,
            analysis.breakpoints.len(),
            analysis.genes.len(),
            analysis.alt_structures.len()
        );
        Ok(analysis)
    }

    /// Genes in the window around a breakpoint, resolving its chromosome first
    /// when only the name is known.
    fn breakpoint_genes(
        &self,
        breakpoint: &mut Breakpoint,
        file: &GeneFile,
    ) -> Result<Vec<GeneRef>, FerroError> {
        if breakpoint.chromosome.id.is_none() {
            match self
                .provider
                .chromosome_by_name(self.context.id, &breakpoint.chromosome.name)?
            {
                Some(chromosome) => breakpoint.chromosome = chromosome,
                None => {
                    log::warn!("chromosome {} not found", breakpoint.chromosome.name);
                    return Ok(Vec::new());
                }
            }
        }
        let Some(chromosome_id) = breakpoint.chromosome.id else {
            return Ok(Vec::new());
        };

        let window = self.config.breakpoint_window;
        let start = breakpoint.position.saturating_sub(window).max(1);
        let mut end = breakpoint.position + window;
        if let Some(size) = breakpoint.chromosome.size {
            end = end.min(size);
        }
        log::debug!(
            "loading genes for {}:{}-{}",
            breakpoint.chromosome.name,
            start,
            end
        );

        let query = TrackQuery::new(file.id, chromosome_id, start, end);
        let genes = self.provider.gene_transcripts(self.context.id, &query)?;
        Ok(genes
            .iter()
            .filter(|g| g.is_ok())
            .map(|g| GeneRef::from_gene(g, self.config.transcript_mode))
            .collect())
    }

    /// Gene names inside a duplication that no breakpoint resolved.
    fn duplicated_genes(
        &self,
        variant: &AnalyzedVariant,
        file: &GeneFile,
        breakpoints: &[Breakpoint],
    ) -> Result<Option<Vec<String>>, FerroError> {
        let end = variant
            .end_index
            .min(variant.start_index + self.config.duplicated_genes_max_range);
        let query = TrackQuery::new(file.id, variant.record.chromosome_id, variant.start_index, end)
            .with_scale_factor(self.config.duplicated_genes_scale_factor);
        let mut names: Vec<String> = self
            .provider
            .genes(self.context.id, &query)?
            .iter()
            .filter(|g| g.is_gene_feature())
            .map(|g| g.display_name())
            .collect();

        for gene in breakpoints.iter().flat_map(|b| b.affected_genes.iter()) {
            if let Some(index) = names.iter().position(|n| n == gene.name()) {
                names.remove(index);
            }
        }
        Ok((!names.is_empty()).then_some(names))
    }

    fn analyze_short(
        &self,
        variant: AnalyzedVariant,
        chromosome: Chromosome,
        gene_file: Option<&GeneFile>,
    ) -> Result<ShortVariantAnalysis, FerroError> {
        let visible = SHORT_VARIANT_FLANK + variant.length;
        let size = chromosome.size.unwrap_or(u64::MAX);
        let start = ((variant.start_index as f64 - visible as f64 / 2.0).round()).max(1.0) as u64;
        let window_end = size.min(start + visible);
        let window_start = window_end.saturating_sub(visible).max(1);

        let genes = match (gene_file, chromosome.id) {
            (Some(file), Some(chromosome_id)) => {
                let query = TrackQuery::new(file.id, chromosome_id, window_start, window_end);
                self.provider
                    .gene_transcripts(self.context.id, &query)?
                    .into_iter()
                    .filter(|g| g.is_ok())
                    .collect()
            }
            _ => Vec::new(),
        };

        let alleles = variant
            .alleles
            .iter()
            .map(|allele| {
                let start = variant.start_index_corrected;
                let end = start + allele.info.length.unwrap_or(0) as u64;
                let affected = affected_features(&genes, start, end);
                let rows = affected_rows(&affected);
                AlleleFeatures {
                    allele: allele.clone(),
                    display_source: abbreviate(&allele.source),
                    affected,
                    rows,
                }
            })
            .collect();

        Ok(ShortVariantAnalysis {
            display_reference: abbreviate(&variant.record.reference_allele),
            variant,
            chromosome,
            gene_file: gene_file.cloned(),
            window_start,
            window_end,
            alleles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::MockAnnotationProvider;

    fn reconstructor() -> Reconstructor<MockAnnotationProvider> {
        let provider = MockAnnotationProvider::with_test_data();
        let context = provider.reference().clone();
        Reconstructor::new(provider, context)
    }

    #[test]
    fn test_pre_analyze_selects_reference_file() {
        let selection = reconstructor().pre_analyze().unwrap();
        assert_eq!(selection.selected.id, 100);
        assert_eq!(selection.gene_files.len(), 1);
    }

    #[test]
    fn test_pre_analyze_without_files() {
        let r = Reconstructor::new(
            MockAnnotationProvider::new(ReferenceContext::default()),
            ReferenceContext::default(),
        );
        assert_eq!(r.pre_analyze().unwrap_err(), FerroError::NoAnnotationAvailable);
    }

    #[test]
    fn test_breakpoint_window_is_clamped() {
        let r = reconstructor();
        let mut bp = Breakpoint::new(1, Chromosome::new(1, "1", 10_000_000));
        let genes = r.breakpoint_genes(&mut bp, &GeneFile::new(100, "genes.gtf")).unwrap();
        assert_eq!(genes.iter().map(GeneRef::name).collect::<Vec<_>>(), vec!["ALPHA"]);
    }

    #[test]
    fn test_breakpoint_resolves_chromosome_by_name() {
        let r = reconstructor();
        let mut bp = Breakpoint::new(1500, Chromosome::named("chr2"));
        let genes = r.breakpoint_genes(&mut bp, &GeneFile::new(100, "genes.gtf")).unwrap();
        assert_eq!(bp.chromosome.id, Some(2));
        assert_eq!(genes[0].name(), "DELTA");

        let mut bp = Breakpoint::new(1500, Chromosome::named("chrUn"));
        let genes = r.breakpoint_genes(&mut bp, &GeneFile::new(100, "genes.gtf")).unwrap();
        assert!(genes.is_empty());
        assert_eq!(bp.chromosome.id, None);
    }

    #[test]
    fn test_short_variant_window() {
        let r = reconstructor();
        let record = VariantRecord::snv(1, 10, 'A', 'G');
        let analysis = r.analyze_record(&record, None).unwrap();
        let short = analysis.short().unwrap();
        assert_eq!(short.window_start, 1);
        assert_eq!(short.window_end, 52);
        assert!(short.alleles[0].affected.is_empty());
    }

    #[test]
    fn test_structural_variant_needs_gene_file() {
        let record = VariantRecord::symbolic(1, 100, 500, VariantType::Del);
        let err = reconstructor().analyze_record(&record, None).unwrap_err();
        assert_eq!(err, FerroError::NoAnnotationAvailable);

        // the type check comes first
        let record = VariantRecord::symbolic(1, 100, 500, VariantType::Other("CNV".to_string()));
        let err = reconstructor().analyze_record(&record, None).unwrap_err();
        assert!(matches!(err, FerroError::UnsupportedVariantType { .. }));
    }

    #[test]
    fn test_fetch_failure_is_converted() {
        let provider = MockAnnotationProvider::with_test_data().fail_fetches(true);
        let context = provider.reference().clone();
        let r = Reconstructor::new(provider, context);
        let file = GeneFile::new(100, "genes.gtf");
        let record = VariantRecord::symbolic(1, 100, 500, VariantType::Del);
        let err = r.analyze_record(&record, Some(&file)).unwrap_err();
        assert!(matches!(err, FerroError::VariantInfoUnavailable { .. }));
        assert_eq!(err.to_string(), "Error loading variant info");
    }
}
