//! Genes, transcripts, exons and domains hit by a short variant

use crate::annotation::gene::{Domain, Gene, Interval, Strand};
use serde::{Deserialize, Serialize};

/// An exon hit by the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedExon {
    /// 1-based, counted in transcription direction
    pub number: usize,
    pub start: i64,
    pub end: i64,
    pub domains: Vec<Domain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedTranscript {
    pub name: String,
    pub exons: Vec<AffectedExon>,
}

/// A gene fully containing the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedGene {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strand: Option<Strand>,
    pub transcripts: Vec<AffectedTranscript>,
}

/// One row of the flattened gene / transcript / exon / domain table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedRow {
    pub gene: String,
    pub transcript: String,
    pub exon: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Strip UTR blocks from the exon ends. Blocks left empty are dropped.
pub fn extract_cds_regions(exons: &[Interval], utrs: &[Interval]) -> Vec<Interval> {
    exons
        .iter()
        .filter_map(|exon| {
            let mut cds = *exon;
            for utr in utrs {
                if utr.start == cds.start {
                    cds.start = utr.end + 1;
                }
                if utr.end == cds.end {
                    cds.end = utr.start - 1;
                }
            }
            (cds.end > cds.start).then_some(cds)
        })
        .collect()
}

fn covers_endpoint(offset: i64, start: i64, end: i64, v_start: i64, v_end: i64) -> bool {
    let (s, e) = (offset + start, offset + end);
    (s <= v_start && e >= v_start) || (s <= v_end && e >= v_end)
}

/// Collect the features a variant spanning `start..=end` touches.
///
/// Genes must contain the whole variant; transcripts, coding exons and
/// domains need only contain one of its ends.
pub fn affected_features(genes: &[Gene], start: u64, end: u64) -> Vec<AffectedGene> {
    let (v_start, v_end) = (start as i64, end as i64);
    genes
        .iter()
        .filter(|g| g.is_ok() && g.start_index <= start && g.end_index >= end)
        .map(|gene| {
            let offset = gene.start_index as i64;
            let transcripts = gene
                .transcripts
                .iter()
                .filter(|t| covers_endpoint(offset, t.start, t.end, v_start, v_end))
                .map(|t| {
                    let cds = extract_cds_regions(&t.exon, &t.utr);
                    let count = cds.len();
                    let exons = cds
                        .iter()
                        .enumerate()
                        .filter(|(_, e)| covers_endpoint(offset, e.start, e.end, v_start, v_end))
                        .map(|(i, e)| {
                            let number = match gene.strand {
                                Some(Strand::Negative) => count - i,
                                _ => i + 1,
                            };
                            let domains = t
                                .domain
                                .iter()
                                .filter(|d| {
                                    d.start >= e.start
                                        && d.end <= e.end
                                        && covers_endpoint(offset, d.start, d.end, v_start, v_end)
                                })
                                .cloned()
                                .collect();
                            AffectedExon {
                                number,
                                start: e.start,
                                end: e.end,
                                domains,
                            }
                        })
                        .collect();
                    AffectedTranscript {
                        name: t.name.clone(),
                        exons,
                    }
                })
                .collect();
            AffectedGene {
                name: gene.display_name(),
                strand: gene.strand,
                transcripts,
            }
        })
        .collect()
}

/// Flatten affected genes into table rows: one row per exon without
/// domains, one row per distinct domain otherwise.
pub fn affected_rows(genes: &[AffectedGene]) -> Vec<AffectedRow> {
    let mut rows = Vec::new();
    for gene in genes {
        for transcript in &gene.transcripts {
            for exon in &transcript.exons {
                let row = |domain: Option<String>| AffectedRow {
                    gene: gene.name.clone(),
                    transcript: transcript.name.clone(),
                    exon: exon.number,
                    domain,
                };
                if exon.domains.is_empty() {
                    rows.push(row(None));
                }
                let mut seen: Vec<&str> = Vec::new();
                for domain in &exon.domains {
                    if !seen.contains(&domain.name.as_str()) {
                        seen.push(&domain.name);
                        rows.push(row(Some(domain.name.clone())));
                    }
                }
            }
        }
    }
    rows
}
