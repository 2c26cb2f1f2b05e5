//! Gene annotation: models, providers and derived gene structures

pub mod affected;
pub mod consensus;
pub mod gene;
pub mod mock;
pub mod provider;

pub use affected::{
    affected_features, affected_rows, extract_cds_regions, AffectedExon, AffectedGene,
    AffectedRow, AffectedTranscript,
};
pub use consensus::{canonical_transcript, GeneRef, GeneStructure};
pub use gene::{Chromosome, Domain, Gene, GeneFile, Interval, Strand, Transcript};
pub use mock::{AnnotationBundle, ChromosomeGenes, MockAnnotationProvider};
pub use provider::{AnnotationProvider, ReferenceContext, TrackQuery};
