//! Annotation provider trait
//!
//! Defines the interface to the collaborators that resolve chromosomes, fetch
//! gene/transcript tracks and load variant details.

use crate::annotation::gene::{Chromosome, Gene, GeneFile};
use crate::error::FerroError;
use crate::variant::{VariantRecord, VariantRequest};
use serde::{Deserialize, Serialize};

/// A gene track window query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackQuery {
    pub file_id: u64,
    pub chromosome_id: u64,
    pub start_index: u64,
    pub end_index: u64,
    pub scale_factor: f64,
}

impl TrackQuery {
    pub fn new(file_id: u64, chromosome_id: u64, start_index: u64, end_index: u64) -> Self {
        Self {
            file_id,
            chromosome_id,
            start_index,
            end_index,
            scale_factor: 1.0,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }
}

/// The reference a variant is displayed against.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceContext {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub chromosomes: Vec<Chromosome>,
    /// Gene file bundled with the reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene_file: Option<GeneFile>,
    /// Gene tracks open in the current session
    #[serde(default)]
    pub gene_tracks: Vec<GeneFile>,
}

impl ReferenceContext {
    pub fn chromosome(&self, id: u64) -> Option<&Chromosome> {
        self.chromosomes.iter().find(|c| c.id == Some(id))
    }

    /// Candidate gene files: the reference's own file first, then open tracks
    /// not already listed.
    pub fn gene_files(&self) -> Vec<GeneFile> {
        let mut files: Vec<GeneFile> = self.gene_file.iter().cloned().collect();
        for track in &self.gene_tracks {
            if !files.iter().any(|f| f.id == track.id) {
                files.push(track.clone());
            }
        }
        files
    }
}

/// Trait for the annotation collaborators.
///
/// Implementations might include:
/// - `MockAnnotationProvider` for testing and offline bundles
/// - a REST client for a genome browser backend
///
/// An empty result is never an error; only transport or decoding failures
/// should surface as [`FerroError::DataFetch`].
pub trait AnnotationProvider {
    /// Resolve a chromosome of the reference by name.
    fn chromosome_by_name(
        &self,
        reference_id: u64,
        name: &str,
    ) -> Result<Option<Chromosome>, FerroError>;

    /// Genes with their transcripts, exons and domains overlapping a window.
    fn gene_transcripts(&self, reference_id: u64, query: &TrackQuery)
        -> Result<Vec<Gene>, FerroError>;

    /// Gene features overlapping a window, transcripts not required.
    fn genes(&self, reference_id: u64, query: &TrackQuery) -> Result<Vec<Gene>, FerroError> {
        self.gene_transcripts(reference_id, query)
    }

    /// Load one variant.
    fn variant(&self, request: &VariantRequest) -> Result<Option<VariantRecord>, FerroError>;
}

/// Blanket implementation for boxed trait objects
impl AnnotationProvider for Box<dyn AnnotationProvider> {
    fn chromosome_by_name(
        &self,
        reference_id: u64,
        name: &str,
    ) -> Result<Option<Chromosome>, FerroError> {
        (**self).chromosome_by_name(reference_id, name)
    }

    fn gene_transcripts(
        &self,
        reference_id: u64,
        query: &TrackQuery,
    ) -> Result<Vec<Gene>, FerroError> {
        (**self).gene_transcripts(reference_id, query)
    }

    fn genes(&self, reference_id: u64, query: &TrackQuery) -> Result<Vec<Gene>, FerroError> {
        (**self).genes(reference_id, query)
    }

    fn variant(&self, request: &VariantRequest) -> Result<Option<VariantRecord>, FerroError> {
        (**self).variant(request)
    }
}

impl<P: AnnotationProvider + ?Sized> AnnotationProvider for &P {
    fn chromosome_by_name(
        &self,
        reference_id: u64,
        name: &str,
    ) -> Result<Option<Chromosome>, FerroError> {
        (**self).chromosome_by_name(reference_id, name)
    }

    fn gene_transcripts(
        &self,
        reference_id: u64,
        query: &TrackQuery,
    ) -> Result<Vec<Gene>, FerroError> {
        (**self).gene_transcripts(reference_id, query)
    }

    fn genes(&self, reference_id: u64, query: &TrackQuery) -> Result<Vec<Gene>, FerroError> {
        (**self).genes(reference_id, query)
    }

    fn variant(&self, request: &VariantRequest) -> Result<Option<VariantRecord>, FerroError> {
        (**self).variant(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_files_precedence() {
        let context = ReferenceContext {
            id: 1,
            name: "GRCh38".to_string(),
            chromosomes: vec![],
            gene_file: Some(GeneFile::new(7, "genes.gtf")),
            gene_tracks: vec![GeneFile::new(9, "extra.gff"), GeneFile::new(7, "genes.gtf")],
        };
        let ids: Vec<u64> = context.gene_files().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![7, 9]);
    }

    #[test]
    fn test_no_gene_files() {
        assert!(ReferenceContext::default().gene_files().is_empty());
    }

    #[test]
    fn test_track_query_scale() {
        let q = TrackQuery::new(1, 2, 10, 20).with_scale_factor(0.001);
        assert_eq!(q.scale_factor, 0.001);
    }
}
