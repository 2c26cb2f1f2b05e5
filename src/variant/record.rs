//! Variant records as delivered by the variant source
//!
//! A [`VariantRecord`] is one VCF-like row: a reference allele, its
//! alternative alleles and an optional declared type. Server-side aggregates
//! ("statistic" records) use the same shape with a `variations_count`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Variant type as declared by the source or inferred from the alleles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum VariantType {
    Snv,
    Ins,
    Del,
    Inv,
    Dup,
    Bnd,
    /// Server-side aggregate of several variants
    Statistic,
    /// Any other declared type (e.g. `CNV`), kept verbatim
    Other(String),
    #[default]
    Unknown,
}

impl VariantType {
    /// Declared types whose junctions can be reconstructed
    pub fn is_reconstructable(&self) -> bool {
        matches!(
            self,
            VariantType::Inv | VariantType::Dup | VariantType::Del | VariantType::Bnd
        )
    }

    /// Offset added to the start of ins/del records so the drawn position
    /// skips the anchor base.
    pub fn translation(&self) -> u64 {
        match self {
            VariantType::Ins | VariantType::Del => 1,
            _ => 0,
        }
    }

    /// Short glyph used for non-structural variants.
    pub fn symbol(&self) -> String {
        match self {
            VariantType::Ins => "+".to_string(),
            VariantType::Del => "\u{2014}".to_string(),
            VariantType::Snv => "\u{2192}".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, VariantType::Unknown)
    }
}

impl FromStr for VariantType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "" => VariantType::Unknown,
            "snv" | "snp" | "sub" => VariantType::Snv,
            "ins" => VariantType::Ins,
            "del" => VariantType::Del,
            "inv" => VariantType::Inv,
            "dup" => VariantType::Dup,
            "bnd" => VariantType::Bnd,
            "statistic" => VariantType::Statistic,
            _ => VariantType::Other(trimmed.to_string()),
        })
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantType::Snv => write!(f, "snv"),
            VariantType::Ins => write!(f, "ins"),
            VariantType::Del => write!(f, "del"),
            VariantType::Inv => write!(f, "inv"),
            VariantType::Dup => write!(f, "dup"),
            VariantType::Bnd => write!(f, "bnd"),
            VariantType::Statistic => write!(f, "statistic"),
            VariantType::Other(s) => write!(f, "{}", s),
            VariantType::Unknown => Ok(()),
        }
    }
}

impl Serialize for VariantType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VariantType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

/// Genotype zygosity of the displayed sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zygosity {
    #[default]
    Unknown,
    Homozygous,
    Heterozygous,
}

impl Zygosity {
    /// Map a genotype organism type (`HOMOZYGOUS`, `HETEROZYGOUS`, ...) to zygosity.
    pub fn from_organism_type(organism_type: Option<&str>) -> Self {
        match organism_type.map(|s| s.to_ascii_lowercase()) {
            Some(s) if s.starts_with("homo") => Zygosity::Homozygous,
            Some(s) if s.starts_with("hetero") => Zygosity::Heterozygous,
            _ => Zygosity::Unknown,
        }
    }
}

/// Per-sample genotype details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenotypeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organism_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genotype_string: Option<String>,
}

/// One variant row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub chromosome_id: u64,
    /// 1-based first position
    pub start_index: u64,
    /// 1-based last position (inclusive)
    pub end_index: u64,
    #[serde(default)]
    pub reference_allele: String,
    #[serde(default)]
    pub alternative_alleles: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "VariantType::is_unknown")]
    pub variant_type: VariantType,
    /// Declared structural by the source
    #[serde(default)]
    pub structural: bool,
    /// Count of variants behind a statistic record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genotype_data: Option<GenotypeData>,
}

impl VariantRecord {
    /// Create a record with minimal required fields
    pub fn new(
        chromosome_id: u64,
        start_index: u64,
        end_index: u64,
        reference_allele: impl Into<String>,
        alternative_alleles: Vec<String>,
    ) -> Self {
        Self {
            identifier: None,
            chromosome_id,
            start_index,
            end_index,
            reference_allele: reference_allele.into(),
            alternative_alleles,
            variant_type: VariantType::Unknown,
            structural: false,
            variations_count: None,
            genotype_data: None,
        }
    }

    /// Create a single nucleotide variant
    pub fn snv(chromosome_id: u64, position: u64, reference: char, alternate: char) -> Self {
        Self::new(
            chromosome_id,
            position,
            position,
            reference.to_string(),
            vec![alternate.to_string()],
        )
        .with_type(VariantType::Snv)
    }

    /// Create a symbolic structural variant (`<INV>`, `<DEL>`, ...) spanning
    /// `start..=end`.
    pub fn symbolic(chromosome_id: u64, start: u64, end: u64, variant_type: VariantType) -> Self {
        let symbol = format!("<{}>", variant_type.to_string().to_ascii_uppercase());
        let mut record = Self::new(chromosome_id, start, end, "N", vec![symbol]);
        record.variant_type = variant_type;
        record.structural = true;
        record
    }

    /// Create a breakend record
    pub fn breakend(chromosome_id: u64, position: u64, reference: &str, alleles: &[&str]) -> Self {
        let mut record = Self::new(
            chromosome_id,
            position,
            position,
            reference,
            alleles.iter().map(|a| a.to_string()).collect(),
        );
        record.variant_type = VariantType::Bnd;
        record.structural = true;
        record
    }

    /// Create a server-side aggregate
    pub fn statistic(chromosome_id: u64, start: u64, end: u64, count: u32) -> Self {
        let mut record = Self::new(chromosome_id, start, end, "", Vec::new());
        record.variant_type = VariantType::Statistic;
        record.variations_count = Some(count);
        record
    }

    pub fn with_type(mut self, variant_type: VariantType) -> Self {
        self.variant_type = variant_type;
        self
    }

    pub fn with_genotype(mut self, organism_type: impl Into<String>) -> Self {
        self.genotype_data = Some(GenotypeData {
            organism_type: Some(organism_type.into()),
            genotype_string: None,
        });
        self
    }

    pub fn is_statistic(&self) -> bool {
        self.variant_type == VariantType::Statistic
    }

    pub fn zygosity(&self) -> Zygosity {
        Zygosity::from_organism_type(
            self.genotype_data
                .as_ref()
                .and_then(|g| g.organism_type.as_deref()),
        )
    }
}

/// Parameters identifying a variant to load and analyze.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcf_file_id: Option<u64>,
    #[serde(default)]
    pub open_by_url: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,
    pub chromosome_id: u64,
    pub position: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
}

impl VariantRequest {
    pub fn new(vcf_file_id: u64, chromosome_id: u64, position: u64) -> Self {
        Self {
            vcf_file_id: Some(vcf_file_id),
            chromosome_id,
            position,
            ..Default::default()
        }
    }
}
