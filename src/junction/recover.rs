//! Rebuilding the exon structure across a junction

use crate::annotation::{Chromosome, GeneRef};
use crate::error::FerroError;
use crate::junction::breakpoint::{Breakpoint, VariantConnection};
use crate::structure::{
    merge_segments, split_exons, total_exons_length, KeepSide, Segment, StructureExon,
};
use serde::{Deserialize, Serialize};

/// The exon structure produced by joining breakpoint segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeStructure {
    pub consensus_exons: Vec<StructureExon>,
    /// Relative offset where the last joined segment starts
    pub breakpoint: i64,
    /// Shared chromosome of the joined breakpoints; `None` across chromosomes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chromosome: Option<Chromosome>,
    pub total_exons_length: i64,
}

impl AlternativeStructure {
    fn from_segments(
        segments: Vec<Segment>,
        chromosome: Option<Chromosome>,
        placeholder_length: i64,
    ) -> Self {
        let merged = merge_segments(segments, placeholder_length);
        let total = total_exons_length(&merged.consensus_exons);
        Self {
            consensus_exons: merged.consensus_exons,
            breakpoint: merged.breakpoint,
            chromosome,
            total_exons_length: total,
        }
    }

    /// Gene names in joined order, without repeats
    pub fn gene_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for exon in &self.consensus_exons {
            if names.last() != Some(&exon.gene_name.as_str()) {
                names.push(&exon.gene_name);
            }
        }
        names
    }
}

/// A junction whose ends lie on different chromosomes. No exon structure is
/// rebuilt for it; it is shown by its coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JunctionLabel {
    /// Index into the analysis connections
    pub connection_index: usize,
    pub label: String,
}

fn breakpoint_at(breakpoints: &[Breakpoint], index: usize) -> Result<&Breakpoint, FerroError> {
    breakpoints.get(index).ok_or_else(|| FerroError::InvalidConnection {
        msg: format!(
            "breakpoint {} does not exist ({} breakpoints)",
            index,
            breakpoints.len()
        ),
    })
}

/// Cut the selected gene at breakpoint `index`, keeping one side.
///
/// A breakpoint without a gene yields an empty segment named `empty_{index}`.
pub fn breakpoint_segment(
    breakpoints: &[Breakpoint],
    index: usize,
    keep: KeepSide,
    reverse: bool,
) -> Result<Segment, FerroError> {
    let breakpoint = breakpoint_at(breakpoints, index)?;
    let structure = match breakpoint.gene() {
        Some(GeneRef::Real(structure)) => structure,
        Some(GeneRef::Empty { name }) => {
            return Ok(Segment::Empty {
                gene_name: name.clone(),
            })
        }
        None => {
            return Ok(Segment::Empty {
                gene_name: format!("empty_{}", index),
            })
        }
    };

    let position = breakpoint
        .relative_positions
        .get(&structure.name)
        .copied()
        .unwrap_or_else(|| structure.relative_position(breakpoint.position));
    let neighbors: Vec<i64> = breakpoints
        .iter()
        .filter_map(|b| b.relative_positions.get(&structure.name).copied())
        .collect();

    Ok(Segment::Exons(split_exons(
        &structure.consensus_exons,
        position,
        &neighbors,
        keep,
        reverse,
    )))
}

fn shared_chromosome(a: &Breakpoint, b: &Breakpoint) -> Option<Chromosome> {
    if a.chromosome.same_as(&b.chromosome) {
        Some(a.chromosome.clone())
    } else {
        None
    }
}

/// Whether the ends of `connection` lie on the same chromosome.
pub fn is_local_junction(
    connection: &VariantConnection,
    breakpoints: &[Breakpoint],
) -> Result<bool, FerroError> {
    let start = breakpoint_at(breakpoints, connection.start.breakpoint_index)?;
    let end = breakpoint_at(breakpoints, connection.end.breakpoint_index)?;
    Ok(shared_chromosome(start, end).is_some())
}

/// Coordinate label `chr:pos -> chr:pos` for the ends of `connection`.
pub fn junction_label(
    connection: &VariantConnection,
    breakpoints: &[Breakpoint],
) -> Result<String, FerroError> {
    let start = breakpoint_at(breakpoints, connection.start.breakpoint_index)?;
    let end = breakpoint_at(breakpoints, connection.end.breakpoint_index)?;
    Ok(format!(
        "{}:{} -> {}:{}",
        start.chromosome.name, start.position, end.chromosome.name, end.position
    ))
}

/// Join the two ends of `connection`.
///
/// The start end keeps the side its attachment points at; the end end keeps
/// the side its attachment points at and is mirrored when the attachment
/// orientation flips across the junction. With `reverse` the junction is read
/// from the end breakpoint, so the segments are concatenated end-first.
pub fn recover_alternative_structure(
    connection: &VariantConnection,
    breakpoints: &[Breakpoint],
    reverse: bool,
    placeholder_length: i64,
) -> Result<AlternativeStructure, FerroError> {
    let start = connection.start;
    let end = connection.end;

    let left_reverse = if reverse {
        start.attached_at_right
    } else {
        !start.attached_at_right
    };
    let right_reverse = if reverse {
        !end.attached_at_right
    } else {
        end.attached_at_right
    };

    let left = breakpoint_segment(
        breakpoints,
        start.breakpoint_index,
        KeepSide::from_take_left(start.attached_at_right),
        left_reverse,
    )?;
    let right = breakpoint_segment(
        breakpoints,
        end.breakpoint_index,
        KeepSide::from_take_left(end.attached_at_right),
        right_reverse,
    )?;

    let chromosome = shared_chromosome(
        breakpoint_at(breakpoints, start.breakpoint_index)?,
        breakpoint_at(breakpoints, end.breakpoint_index)?,
    );
    let segments = if reverse {
        vec![right, left]
    } else {
        vec![left, right]
    };
    Ok(AlternativeStructure::from_segments(
        segments,
        chromosome,
        placeholder_length,
    ))
}

/// Structures of a tandem duplication.
///
/// The region is cut four ways: outside and inside of the start breakpoint,
/// inside and outside of the end breakpoint. When both ends fall in the same
/// gene the result is one structure `outer-left + core + core + outer-right`;
/// otherwise three: the start junction, the duplicated join and the end
/// junction.
pub fn recover_duplication_structures(
    breakpoints: &[Breakpoint],
    connection: &VariantConnection,
    placeholder_length: i64,
) -> Result<Vec<AlternativeStructure>, FerroError> {
    let start = connection.start;
    let end = connection.end;

    let left_outer = breakpoint_segment(
        breakpoints,
        start.breakpoint_index,
        KeepSide::from_take_left(!start.attached_at_right),
        false,
    )?;
    let left = breakpoint_segment(
        breakpoints,
        start.breakpoint_index,
        KeepSide::from_take_left(start.attached_at_right),
        false,
    )?;
    let right = breakpoint_segment(
        breakpoints,
        end.breakpoint_index,
        KeepSide::from_take_left(end.attached_at_right),
        false,
    )?;
    let right_outer = breakpoint_segment(
        breakpoints,
        end.breakpoint_index,
        KeepSide::from_take_left(!end.attached_at_right),
        false,
    )?;

    let start_bp = breakpoint_at(breakpoints, start.breakpoint_index)?;
    let end_bp = breakpoint_at(breakpoints, end.breakpoint_index)?;
    let chromosome = shared_chromosome(start_bp, end_bp);
    let same_gene = match (start_bp.gene(), end_bp.gene()) {
        (Some(a), Some(b)) => a.name() == b.name(),
        _ => false,
    };

    let structure = |segments: Vec<Segment>| {
        AlternativeStructure::from_segments(segments, chromosome.clone(), placeholder_length)
    };

    if same_gene {
        Ok(vec![structure(vec![left_outer, left.clone(), left, right_outer])])
    } else {
        Ok(vec![
            structure(vec![left_outer, left.clone()]),
            structure(vec![right.clone(), left]),
            structure(vec![right, right_outer]),
        ])
    }
}
