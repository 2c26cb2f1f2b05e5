//! Concatenating split segments into one alternative structure

use crate::structure::exon::{Segment, StructureExon};
use serde::{Deserialize, Serialize};

/// Exons of several segments laid out one after another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedStructure {
    pub consensus_exons: Vec<StructureExon>,
    /// Relative offset where the last segment starts
    pub breakpoint: i64,
}

/// Concatenate segments, shifting every exon and domain by the summed length
/// of the segments before it.
///
/// A gene-less segment contributes one placeholder exon of
/// `placeholder_length`; every other segment contributes its exon spans, so
/// the result stays gap-free.
pub fn merge_segments(segments: Vec<Segment>, placeholder_length: i64) -> MergedStructure {
    let mut exons = Vec::new();
    let mut offset = 0i64;
    let mut breakpoint = 0i64;

    for segment in segments {
        breakpoint = offset;
        let part = match segment {
            Segment::Exons(part) => part,
            Segment::Empty { gene_name } => {
                vec![StructureExon::placeholder(gene_name, placeholder_length)]
            }
        };
        let length: i64 = part.iter().map(|e| e.relative.span()).sum();
        for mut exon in part {
            exon.shift_relative(offset);
            exons.push(exon);
        }
        offset += length;
    }

    MergedStructure {
        consensus_exons: exons,
        breakpoint,
    }
}
