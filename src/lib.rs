// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-sv: structural variant junction reconstruction and variant layout
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! Two independent engines live here:
//!
//! - [`junction`] rebuilds the exon structures that a structural variant
//!   (deletion, inversion, duplication or breakend) would produce, on a
//!   relative "exons only" axis.
//! - [`layout`] aggregates dense variants into count bubbles and assigns
//!   non-overlapping lanes for a visible window.
//!
//! # Example
//!
//! ```
//! use ferro_sv::{MockAnnotationProvider, Reconstructor, VariantRecord, VariantType};
//!
//! let provider = MockAnnotationProvider::with_test_data();
//! let context = provider.reference().clone();
//! let gene_file = context.gene_file.clone();
//! let reconstructor = Reconstructor::new(provider, context);
//!
//! // A deletion from inside ALPHA to inside BETA
//! let record = VariantRecord::symbolic(1, 100, 500, VariantType::Del);
//! let analysis = reconstructor.analyze_record(&record, gene_file.as_ref()).unwrap();
//! let structural = analysis.structural().unwrap();
//! assert_eq!(structural.alt_structures.len(), 1);
//! ```

pub mod annotation;
pub mod cli;
pub mod config;
pub mod error;
pub mod junction;
pub mod layout;
pub mod structure;
pub mod variant;

// Re-export commonly used types
pub use annotation::{AnnotationProvider, GeneRef, GeneStructure, MockAnnotationProvider};
pub use config::{LayoutConfig, ReconstructConfig, SvConfig, TranscriptMode};
pub use error::{ErrorCode, FerroError};
pub use junction::{AlternativeStructure, Reconstructor, StructuralAnalysis, VariantAnalysis};
pub use layout::{Layout, LayoutEngine, Viewport};
pub use variant::{analyze_variant, AnalyzedVariant, VariantRecord, VariantType};

/// Result type alias for ferro-sv operations
pub type Result<T> = std::result::Result<T, FerroError>;
