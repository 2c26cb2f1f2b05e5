//! Gene, transcript and chromosome models
//!
//! These are the data contracts of the gene/transcript track collaborator.
//!
//! # Coordinate System
//!
//! | Field | Basis | Notes |
//! |-------|-------|-------|
//! | `Gene.start_index`, `Gene.end_index` | 1-based genomic | inclusive |
//! | `Transcript.exon[]`, `Transcript.utr[]` | 0-based, gene-relative | offset from `start_index` |
//! | `Domain.start`, `Domain.end` | 0-based, spliced | positions along the concatenated exons |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A chromosome of the active reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chromosome {
    pub name: String,
    /// Reference-local id; resolved by name lookup when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Chromosome {
    pub fn new(id: u64, name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            id: Some(id),
            size: Some(size),
        }
    }

    /// A chromosome known only by name (e.g. a breakend mate).
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            size: None,
        }
    }

    /// Same chromosome when both ids are known and equal.
    pub fn same_as(&self, other: &Chromosome) -> bool {
        self.id.is_some() && self.id == other.id
    }
}

/// Gene strand as reported by the annotation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "POSITIVE", alias = "positive", alias = "+")]
    Positive,
    #[serde(rename = "NEGATIVE", alias = "negative", alias = "-")]
    Negative,
}

impl Strand {
    /// The opposite strand.
    pub fn flip(self) -> Self {
        match self {
            Strand::Positive => Strand::Negative,
            Strand::Negative => Strand::Positive,
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Positive => write!(f, "+"),
            Strand::Negative => write!(f, "-"),
        }
    }
}

/// An inclusive interval in gene-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Number of bases covered
    pub fn len(&self) -> i64 {
        if self.end >= self.start {
            self.end - self.start + 1
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named protein domain projected onto transcript coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    pub start: i64,
    pub end: i64,
}

impl Domain {
    pub fn new(name: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }
}

/// A transcript of a gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biotype: Option<String>,
    /// Gene-relative start
    pub start: i64,
    /// Gene-relative end
    pub end: i64,
    #[serde(default)]
    pub exon: Vec<Interval>,
    #[serde(default)]
    pub utr: Vec<Interval>,
    #[serde(default)]
    pub domain: Vec<Domain>,
}

impl Transcript {
    /// Create a transcript spanning its exons.
    pub fn new(name: impl Into<String>, exons: Vec<Interval>) -> Self {
        let start = exons.iter().map(|e| e.start).min().unwrap_or(0);
        let end = exons.iter().map(|e| e.end).max().unwrap_or(0);
        Self {
            name: name.into(),
            biotype: None,
            start,
            end,
            exon: exons,
            utr: Vec::new(),
            domain: Vec::new(),
        }
    }

    pub fn with_biotype(mut self, biotype: impl Into<String>) -> Self {
        self.biotype = Some(biotype.into());
        self
    }

    pub fn with_domains(mut self, domains: Vec<Domain>) -> Self {
        self.domain = domains;
        self
    }

    pub fn with_utrs(mut self, utrs: Vec<Interval>) -> Self {
        self.utr = utrs;
        self
    }

    /// Sum of exon lengths
    pub fn total_exon_length(&self) -> i64 {
        self.exon.iter().map(Interval::len).sum()
    }

    pub fn is_protein_coding(&self) -> bool {
        self.biotype
            .as_deref()
            .is_some_and(|b| b.eq_ignore_ascii_case("protein_coding"))
    }

    pub fn has_domains(&self) -> bool {
        !self.domain.is_empty()
    }
}

fn default_feature() -> String {
    "gene".to_string()
}

/// A gene feature returned by the gene/transcript track query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Feature type (`gene`, `mRNA`, ...)
    #[serde(default = "default_feature")]
    pub feature: String,
    pub start_index: u64,
    pub end_index: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strand: Option<Strand>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Annotation status; anything other than `ok` is discarded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub transcripts: Vec<Transcript>,
}

impl Gene {
    pub fn new(name: impl Into<String>, start_index: u64, end_index: u64, strand: Strand) -> Self {
        Self {
            name: Some(name.into()),
            feature: default_feature(),
            start_index,
            end_index,
            strand: Some(strand),
            attributes: BTreeMap::new(),
            status: None,
            transcripts: Vec::new(),
        }
    }

    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcripts.push(transcript);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Display name: `gene_symbol`, then `gene_name`, then `gene_id`, then the
    /// feature's own name.
    pub fn display_name(&self) -> String {
        ["gene_symbol", "gene_name", "gene_id"]
            .iter()
            .find_map(|key| self.attributes.get(*key))
            .cloned()
            .or_else(|| self.name.clone())
            .unwrap_or_default()
    }

    /// Features without a status are accepted.
    pub fn is_ok(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |s| s.eq_ignore_ascii_case("ok"))
    }

    pub fn is_gene_feature(&self) -> bool {
        self.feature.eq_ignore_ascii_case("gene")
    }

    /// Look up a transcript by name
    pub fn transcript(&self, name: &str) -> Option<&Transcript> {
        self.transcripts.iter().find(|t| t.name == name)
    }

    /// Whether a genomic position lies inside the gene
    pub fn contains(&self, position: u64) -> bool {
        position >= self.start_index && position <= self.end_index
    }
}

/// A gene annotation file or track that breakpoints are resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneFile {
    pub id: u64,
    pub name: String,
}

impl GeneFile {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
