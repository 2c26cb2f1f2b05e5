//! Exon structure types shared by the splitter, the merger and gene structures
//!
//! A structure is an ordered list of [`StructureExon`]s laid out on a
//! contiguous relative axis: each exon's `relative` span starts right after the
//! previous one ends. Introns do not occupy any relative positions.

use crate::annotation::Strand;
use serde::{Deserialize, Serialize};

/// An inclusive span on the relative axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RelativeSpan {
    pub start: i64,
    pub end: i64,
}

impl RelativeSpan {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Distance from start to end (one less than the number of positions)
    pub fn width(&self) -> i64 {
        self.end - self.start
    }

    /// Number of positions covered
    pub fn span(&self) -> i64 {
        self.end - self.start + 1
    }

    pub fn intersects(&self, other: &RelativeSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Intersection with another span, if any
    pub fn clip(&self, other: &RelativeSpan) -> Option<RelativeSpan> {
        if !self.intersects(other) {
            return None;
        }
        Some(RelativeSpan::new(
            self.start.max(other.start),
            self.end.min(other.end),
        ))
    }

    pub fn shift(&mut self, delta: i64) {
        self.start += delta;
        self.end += delta;
    }
}

/// Which end of an exon touches a junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakpointSide {
    Start,
    End,
}

/// A domain fragment carried by an exon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExonDomain {
    pub name: String,
    /// Position of the domain among the gene's consensus domains
    pub domain_index: usize,
    pub range: RelativeSpan,
}

/// Whether an exon comes from annotation or stands in for a gene-less segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExonKind {
    #[default]
    Coding,
    Placeholder,
}

/// One exon of a gene or alternative structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureExon {
    pub kind: ExonKind,
    pub gene_name: String,
    /// Strand-aware exon number within the source gene (0-based)
    pub index: usize,
    /// Gene-relative start
    pub start: i64,
    /// Gene-relative end
    pub end: i64,
    pub relative: RelativeSpan,
    #[serde(default)]
    pub domains: Vec<ExonDomain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strand: Option<Strand>,
    /// Set on the exon(s) adjacent to a junction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoint: Option<BreakpointSide>,
}

impl StructureExon {
    /// A coding exon with no domains, relative span equal to its own span.
    pub fn new(gene_name: impl Into<String>, index: usize, start: i64, end: i64) -> Self {
        Self {
            kind: ExonKind::Coding,
            gene_name: gene_name.into(),
            index,
            start,
            end,
            relative: RelativeSpan::new(start, end),
            domains: Vec::new(),
            strand: None,
            breakpoint: None,
        }
    }

    /// The single exon standing in for a gene-less segment.
    pub fn placeholder(gene_name: impl Into<String>, length: i64) -> Self {
        let end = (length - 1).max(0);
        Self {
            kind: ExonKind::Placeholder,
            gene_name: gene_name.into(),
            index: 0,
            start: 0,
            end,
            relative: RelativeSpan::new(0, end),
            domains: Vec::new(),
            strand: None,
            breakpoint: None,
        }
    }

    pub fn is_breakpoint(&self) -> bool {
        self.breakpoint.is_some()
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == ExonKind::Placeholder
    }

    /// Shift the exon's relative span and its domains.
    pub fn shift_relative(&mut self, delta: i64) {
        self.relative.shift(delta);
        for domain in &mut self.domains {
            domain.range.shift(delta);
        }
    }
}

/// One input to the merger: exons of a split gene, or a gene-less segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Exons(Vec<StructureExon>),
    Empty { gene_name: String },
}

impl Segment {
    pub fn gene_name(&self) -> Option<&str> {
        match self {
            Segment::Exons(exons) => exons.first().map(|e| e.gene_name.as_str()),
            Segment::Empty { gene_name } => Some(gene_name),
        }
    }
}

/// Sum of exon spans, which for a contiguous structure equals `last.end + 1`.
pub fn total_exons_length(exons: &[StructureExon]) -> i64 {
    exons.iter().map(|e| e.relative.span()).sum()
}
