//! Variant analysis: type inference, structural flags and positioning
//!
//! [`analyze_variant`] turns a raw [`VariantRecord`] into an
//! [`AnalyzedVariant`] carrying everything the layout engine and the junction
//! reconstructor need: classified alleles, the inter-chromosomal flag, display
//! symbols and the intervals the variant occupies on the current chromosome.

use crate::error::FerroError;
use crate::variant::allele::{abbreviate, analyze_alleles, AlleleType, AnalyzedAllele};
use crate::variant::record::{VariantRecord, VariantType, Zygosity};
use serde::{Deserialize, Serialize};

/// An interval a variant occupies, with its lane assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositioningInterval {
    pub start_index: u64,
    pub end_index: u64,
    pub length: u64,
    #[serde(default)]
    pub layer_index: usize,
    #[serde(default)]
    pub max_layer_index: usize,
    /// Number of non-aggregate items drawn above this one
    #[serde(default)]
    pub variants_under_count: usize,
}

impl PositioningInterval {
    /// An interval never ends before it starts; an anchor-shifted insertion
    /// occupies its single corrected position.
    pub fn new(start_index: u64, end_index: u64) -> Self {
        let end_index = end_index.max(start_index);
        Self {
            start_index,
            end_index,
            length: end_index - start_index + 1,
            ..Default::default()
        }
    }

    pub fn overlaps(&self, other: &PositioningInterval) -> bool {
        self.start_index <= other.end_index && other.start_index <= self.end_index
    }
}

/// A variant record after analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedVariant {
    pub record: VariantRecord,
    /// Declared type, or the first classified allele's type
    pub variant_type: VariantType,
    pub start_index: u64,
    pub end_index: u64,
    /// Start shifted past the anchor base for ins/del
    pub start_index_corrected: u64,
    pub length: u64,
    pub alleles: Vec<AnalyzedAllele>,
    pub structural: bool,
    pub inter_chromosome: bool,
    /// No breakend boundaries were found; positioning is the record span
    pub is_default_positioning: bool,
    pub positioning: Vec<PositioningInterval>,
    pub symbol: String,
    pub name: String,
    pub structural_symbol: String,
    pub zygosity: Zygosity,
}

impl AnalyzedVariant {
    /// Variants behind this record (1 for ordinary records)
    pub fn variations_count(&self) -> u32 {
        self.record.variations_count.unwrap_or(1).max(1)
    }

    pub fn is_statistic(&self) -> bool {
        self.variant_type == VariantType::Statistic
    }

    /// Breakend alleles with an intra-chromosomal mate
    pub fn mates(&self) -> impl Iterator<Item = &crate::variant::allele::Mate> {
        self.alleles.iter().filter_map(|a| a.mate.as_ref())
    }
}

/// Whether a chromosome name refers to `current`, ignoring case, a `chr`
/// prefix and angle brackets. A missing name means the current chromosome.
pub fn is_current_chromosome(current: &str, test: Option<&str>) -> bool {
    let Some(test) = test else {
        return true;
    };
    normalize_chromosome(current) == normalize_chromosome(test)
}

fn normalize_chromosome(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    let unbracketed = lower
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(&lower);
    unbracketed
        .strip_prefix("chr")
        .unwrap_or(unbracketed)
        .to_string()
}

/// Analyze a record displayed on `current_chromosome`.
pub fn analyze_variant(
    record: &VariantRecord,
    current_chromosome: &str,
) -> Result<AnalyzedVariant, FerroError> {
    let translation = record.variant_type.translation();
    let corrected = record.start_index + translation;

    let mut variant = AnalyzedVariant {
        record: record.clone(),
        variant_type: record.variant_type.clone(),
        start_index: record.start_index,
        end_index: record.end_index,
        start_index_corrected: corrected,
        length: (record.end_index + 1).saturating_sub(record.start_index),
        alleles: Vec::new(),
        structural: record.structural,
        inter_chromosome: false,
        is_default_positioning: true,
        positioning: vec![PositioningInterval::new(corrected, record.end_index)],
        symbol: String::new(),
        name: String::new(),
        structural_symbol: String::new(),
        zygosity: record.zygosity(),
    };

    if variant.is_statistic() {
        return Ok(variant);
    }

    if variant.variant_type == VariantType::Ins {
        variant.end_index = variant.start_index;
    }

    let mut alleles = analyze_alleles(&record.reference_allele, &record.alternative_alleles)?;

    if variant.variant_type.is_unknown() {
        if let Some(kind) = alleles.iter().find_map(|a| a.info.allele_type.as_ref()) {
            variant.variant_type = kind.to_string().parse().unwrap_or_default();
        }
    }
    variant.structural = variant.structural
        || alleles.iter().any(|a| a.is_symbolic() || a.is_breakend());

    let symbol = variant.variant_type.symbol();
    variant.name = symbol.clone();
    variant.structural_symbol = symbol.clone();
    variant.symbol = if variant.structural { String::new() } else { symbol };

    let translation = variant.variant_type.translation();
    let mut positioning = Vec::new();
    for allele in &mut alleles {
        if let Some(mate) = allele.mate.as_mut() {
            mate.intra_chromosome =
                is_current_chromosome(current_chromosome, mate.chromosome.as_deref());
            variant.inter_chromosome |= !mate.intra_chromosome;
            if mate.intra_chromosome {
                let start = variant.start_index.min(mate.position);
                let end = variant.start_index.max(mate.position);
                positioning.push(PositioningInterval::new(start + translation, end));
            }
        }
    }

    if positioning.is_empty() {
        variant.is_default_positioning = true;
        positioning.push(PositioningInterval::new(
            variant.start_index + translation,
            variant.end_index,
        ));
    } else {
        variant.is_default_positioning = false;
    }
    variant.positioning = positioning;
    variant.start_index_corrected = variant.start_index + translation;
    variant.length = (variant.end_index + 1).saturating_sub(variant.start_index);

    for allele in &mut alleles {
        allele.display_text = display_text(&variant, &record.reference_allele, allele);
    }
    variant.alleles = alleles;

    Ok(variant)
}

fn display_text(
    variant: &AnalyzedVariant,
    reference: &str,
    allele: &AnalyzedAllele,
) -> Option<String> {
    if let Some(sequence) = allele.info.sequence.as_deref().filter(|s| !s.is_empty()) {
        return Some(match allele.info.allele_type {
            None | Some(AlleleType::Substitution) => format!("{}\u{2192}{}", reference, sequence),
            _ => abbreviate(sequence),
        });
    }
    if !variant.structural || variant.inter_chromosome {
        return None;
    }
    match variant.variant_type {
        VariantType::Inv => Some("\u{2194}".to_string()),
        VariantType::Ins => Some("+".to_string()),
        VariantType::Del => Some("\u{2014}".to_string()),
        VariantType::Bnd => Some("BND".to_string()),
        _ if !allele.source.is_empty() => Some(allele.source.clone()),
        _ => None,
    }
}
