//! Variant records, allele classification and variant analysis

pub mod allele;
pub mod analyzer;
pub mod record;

pub use allele::{
    abbreviate, analyze_allele, analyze_alleles, analyze_sequence, parse_breakend, AlleleInfo,
    AlleleType, AnalyzedAllele, AttachSide, Mate,
};
pub use analyzer::{analyze_variant, is_current_chromosome, AnalyzedVariant, PositioningInterval};
pub use record::{GenotypeData, VariantRecord, VariantRequest, VariantType, Zygosity};
