//! Junction reconstruction for structural variants
//!
//! A structural variant is reduced to breakpoints and the connections joining
//! them ([`breakpoint`]); genes are resolved at every breakpoint through an
//! [`AnnotationProvider`](crate::annotation::AnnotationProvider)
//! ([`reconstruct`]); each connection is then turned into an alternative exon
//! structure by splitting and merging the affected genes ([`recover`]).
//! Junctions joining two chromosomes only get a coordinate label.
//!
//! # Example
//!
//! ```
//! use ferro_sv::annotation::MockAnnotationProvider;
//! use ferro_sv::junction::Reconstructor;
//! use ferro_sv::variant::{VariantRecord, VariantType};
//!
//! let provider = MockAnnotationProvider::with_test_data();
//! let context = provider.reference().clone();
//! let reconstructor = Reconstructor::new(provider, context);
//!
//! let selection = reconstructor.pre_analyze().unwrap();
//! let record = VariantRecord::symbolic(1, 100, 500, VariantType::Del);
//! let analysis = reconstructor
//!     .analyze_record(&record, Some(&selection.selected))
//!     .unwrap();
//!
//! let structural = analysis.structural().unwrap();
//! assert_eq!(structural.alt_structures.len(), 1);
//! assert_eq!(structural.alt_structures[0].breakpoint, 70);
//! ```

pub mod breakpoint;
pub mod reconstruct;
pub mod recover;
pub mod selection;

pub use breakpoint::{breakpoints_for, sort_breakpoints, Breakpoint, ConnectionEnd, VariantConnection};
pub use reconstruct::{
    AlleleFeatures, GeneFileSelection, Reconstructor, ShortVariantAnalysis, VariantAnalysis,
};
pub use recover::{
    breakpoint_segment, is_local_junction, junction_label, recover_alternative_structure,
    recover_duplication_structures, AlternativeStructure, JunctionLabel,
};
pub use selection::{AffectedGeneEntry, StructuralAnalysis};
