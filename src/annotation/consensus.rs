//! Gene structures: the exon layout a junction is reconstructed from
//!
//! A [`GeneStructure`] is built either from one canonical transcript or from a
//! greedy union of all transcripts of a gene. In both cases exons are laid out
//! on a contiguous relative axis with domains attached to the exons they cover.

use crate::annotation::gene::{Domain, Gene, Interval, Strand, Transcript};
use crate::config::TranscriptMode;
use crate::error::FerroError;
use crate::structure::{total_exons_length, ExonDomain, RelativeSpan, StructureExon};
use serde::{Deserialize, Serialize};

/// The exon structure of one gene as used by reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneStructure {
    pub name: String,
    pub gene: Gene,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strand: Option<Strand>,
    /// Transcript the structure was built from; `None` for a consensus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_transcript: Option<String>,
    pub consensus_domains: Vec<Domain>,
    pub consensus_exons: Vec<StructureExon>,
    pub total_exons_length: i64,
}

/// The gene found at a breakpoint, or a named stand-in when there is none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GeneRef {
    Real(Box<GeneStructure>),
    Empty { name: String },
}

impl GeneRef {
    pub fn empty(name: impl Into<String>) -> Self {
        GeneRef::Empty { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            GeneRef::Real(structure) => &structure.name,
            GeneRef::Empty { name } => name,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, GeneRef::Empty { .. })
    }

    pub fn structure(&self) -> Option<&GeneStructure> {
        match self {
            GeneRef::Real(structure) => Some(structure),
            GeneRef::Empty { .. } => None,
        }
    }

    /// Build the reference for a gene; genes without usable exons become empty.
    pub fn from_gene(gene: &Gene, mode: TranscriptMode) -> Self {
        match GeneStructure::build(gene, mode) {
            Some(structure) => GeneRef::Real(Box::new(structure)),
            None => GeneRef::empty(gene.display_name()),
        }
    }
}

impl GeneStructure {
    /// Build a structure in the given mode. Returns `None` when the gene has no
    /// exons to lay out.
    pub fn build(gene: &Gene, mode: TranscriptMode) -> Option<Self> {
        let transcripts: Vec<&Transcript> = match mode {
            TranscriptMode::Consensus => gene.transcripts.iter().collect(),
            TranscriptMode::Canonical => canonical_transcript(gene).into_iter().collect(),
        };
        let selected = match mode {
            TranscriptMode::Canonical => transcripts.first().map(|t| t.name.clone()),
            TranscriptMode::Consensus => None,
        };
        Self::from_transcripts(gene, &transcripts, selected)
    }

    /// Build a structure from one named transcript.
    pub fn with_transcript(gene: &Gene, transcript: &str) -> Result<Self, FerroError> {
        let tx = gene
            .transcript(transcript)
            .ok_or_else(|| FerroError::UnknownTranscript {
                gene: gene.display_name(),
                transcript: transcript.to_string(),
            })?;
        Self::from_transcripts(gene, &[tx], Some(tx.name.clone())).ok_or_else(|| {
            FerroError::UnknownTranscript {
                gene: gene.display_name(),
                transcript: transcript.to_string(),
            }
        })
    }

    fn from_transcripts(
        gene: &Gene,
        transcripts: &[&Transcript],
        selected_transcript: Option<String>,
    ) -> Option<Self> {
        let name = gene.display_name();
        let domains = consensus_domains(transcripts);
        let exons = consensus_exons(&name, transcripts, &domains, gene.strand);
        if exons.is_empty() {
            return None;
        }
        let total = total_exons_length(&exons);
        Some(Self {
            name,
            gene: gene.clone(),
            strand: gene.strand,
            selected_transcript,
            consensus_domains: domains,
            consensus_exons: exons,
            total_exons_length: total,
        })
    }

    /// Project a genomic position onto the relative axis.
    ///
    /// Exonic positions map inside their exon; intronic positions snap to the
    /// start of the next exon; positions past the last exon map to its end.
    pub fn relative_position(&self, position: u64) -> i64 {
        let gene_start = self.gene.start_index as i64;
        let position = position as i64;
        for exon in &self.consensus_exons {
            if exon.end + gene_start > position {
                if exon.start + gene_start > position {
                    return exon.relative.start;
                }
                return position - gene_start - exon.start + exon.relative.start;
            }
        }
        self.consensus_exons
            .last()
            .map(|e| e.relative.end)
            .unwrap_or(0)
    }

    /// Names of every domain annotated on any transcript of the gene.
    pub fn domain_names(&self) -> impl Iterator<Item = &str> {
        self.gene
            .transcripts
            .iter()
            .flat_map(|t| t.domain.iter().map(|d| d.name.as_str()))
    }
}

/// Pick the transcript a canonical structure is built from.
///
/// Transcripts are ranked by total exon length (longest first) with protein
/// coding transcripts winning ties; the first ranked transcript carrying a
/// domain is chosen, falling back to the first ranked transcript.
pub fn canonical_transcript(gene: &Gene) -> Option<&Transcript> {
    let mut ranked: Vec<&Transcript> = gene.transcripts.iter().collect();
    ranked.sort_by(|a, b| {
        b.total_exon_length()
            .cmp(&a.total_exon_length())
            .then_with(|| b.is_protein_coding().cmp(&a.is_protein_coding()))
    });
    ranked
        .iter()
        .find(|t| t.has_domains())
        .or_else(|| ranked.first())
        .copied()
}

/// Greedy non-overlapping union of the transcripts' domains.
///
/// At each step the next domain starting at or after the cursor is taken,
/// preferring the shorter one at an equal start.
pub fn consensus_domains(transcripts: &[&Transcript]) -> Vec<Domain> {
    let all: Vec<&Domain> = transcripts.iter().flat_map(|t| t.domain.iter()).collect();
    let mut result = Vec::new();
    let mut position = i64::MIN;
    loop {
        let next = all
            .iter()
            .filter(|d| d.start >= position)
            .min_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));
        match next {
            Some(domain) => {
                position = domain.end + 1;
                result.push((*domain).clone());
            }
            None => break,
        }
    }
    result
}

/// Greedy non-overlapping union of the transcripts' exons, laid out on the
/// relative axis with domain fragments attached.
///
/// At an equal start the longer exon wins.
pub fn consensus_exons(
    gene_name: &str,
    transcripts: &[&Transcript],
    domains: &[Domain],
    strand: Option<Strand>,
) -> Vec<StructureExon> {
    let all: Vec<&Interval> = transcripts.iter().flat_map(|t| t.exon.iter()).collect();
    let mut picked: Vec<Interval> = Vec::new();
    let mut position = i64::MIN;
    loop {
        let next = all
            .iter()
            .filter(|e| e.start >= position && e.end >= e.start)
            .min_by(|a, b| a.start.cmp(&b.start).then_with(|| b.end.cmp(&a.end)));
        match next {
            Some(exon) => {
                position = exon.end + 1;
                picked.push(**exon);
            }
            None => break,
        }
    }

    let count = picked.len();
    let mut previous = 0i64;
    picked
        .into_iter()
        .enumerate()
        .map(|(i, interval)| {
            let width = interval.end - interval.start;
            let relative = RelativeSpan::new(previous, previous + width);
            previous += width + 1;

            let index = match strand {
                Some(Strand::Negative) => count - 1 - i,
                _ => i,
            };
            let mut exon = StructureExon::new(gene_name, index, interval.start, interval.end);
            exon.relative = relative;
            exon.strand = strand;
            exon.domains = domains
                .iter()
                .enumerate()
                .filter_map(|(domain_index, d)| {
                    relative
                        .clip(&RelativeSpan::new(d.start, d.end))
                        .map(|range| ExonDomain {
                            name: d.name.clone(),
                            domain_index,
                            range,
                        })
                })
                .collect();
            exon
        })
        .collect()
}
