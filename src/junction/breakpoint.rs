//! Breakpoints and the connections joining them

use crate::annotation::{Chromosome, GeneRef};
use crate::error::FerroError;
use crate::variant::{AnalyzedVariant, AttachSide, VariantType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A genomic coordinate where a rearrangement boundary occurs, with the
/// genes resolved there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub position: u64,
    pub chromosome: Chromosome,
    /// Genes overlapping the breakpoint window; never empty once resolved
    #[serde(default)]
    pub affected_genes: Vec<GeneRef>,
    /// Index of the selected gene in `affected_genes`
    #[serde(default)]
    pub affected_gene: usize,
    /// Breakpoint position on each affected gene's relative axis
    #[serde(default)]
    pub relative_positions: BTreeMap<String, i64>,
}

impl Breakpoint {
    pub fn new(position: u64, chromosome: Chromosome) -> Self {
        Self {
            position,
            chromosome,
            affected_genes: Vec::new(),
            affected_gene: 0,
            relative_positions: BTreeMap::new(),
        }
    }

    /// The selected gene
    pub fn gene(&self) -> Option<&GeneRef> {
        self.affected_genes.get(self.affected_gene)
    }

    /// Store resolved genes and their relative positions, selecting the first.
    pub fn set_genes(&mut self, genes: Vec<GeneRef>) {
        self.relative_positions.clear();
        for gene in &genes {
            if let GeneRef::Real(structure) = gene {
                self.relative_positions.insert(
                    structure.name.clone(),
                    structure.relative_position(self.position),
                );
            }
        }
        self.affected_genes = genes;
        self.affected_gene = 0;
    }

    /// Replace every affected gene with the given name, refreshing its relative position.
    pub fn replace_gene(&mut self, gene: &GeneRef) -> bool {
        let mut replaced = false;
        for slot in self.affected_genes.iter_mut() {
            if slot.name() == gene.name() {
                *slot = gene.clone();
                replaced = true;
            }
        }
        if replaced {
            if let GeneRef::Real(structure) = gene {
                self.relative_positions.insert(
                    structure.name.clone(),
                    structure.relative_position(self.position),
                );
            }
        }
        replaced
    }
}

/// One end of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEnd {
    pub breakpoint_index: usize,
    /// The joined piece continues to the right of the breakpoint
    pub attached_at_right: bool,
}

impl ConnectionEnd {
    pub fn new(breakpoint_index: usize, attached_at_right: bool) -> Self {
        Self {
            breakpoint_index,
            attached_at_right,
        }
    }
}

/// A junction between two breakpoint ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantConnection {
    pub start: ConnectionEnd,
    pub end: ConnectionEnd,
}

impl VariantConnection {
    pub fn new(start: ConnectionEnd, end: ConnectionEnd) -> Self {
        Self { start, end }
    }
}

/// Derive breakpoints and connections for a structural variant on `chromosome`.
///
/// | Type | Breakpoints | Connections |
/// |------|-------------|-------------|
/// | inv | start, end | `0R -> 1R`, `1L -> 0L` |
/// | del | start, end | `0R -> 1L` |
/// | dup | start, end | `0L -> 1R` |
/// | bnd / inter-chromosomal | start, one per mate | `0 -> mate` per mate |
///
/// Breakpoints are returned sorted by position with connection indices
/// remapped to the sorted order.
pub fn breakpoints_for(
    variant: &AnalyzedVariant,
    chromosome: &Chromosome,
) -> Result<(Vec<Breakpoint>, Vec<VariantConnection>), FerroError> {
    let mut breakpoints = Vec::new();
    let mut connections = Vec::new();
    let span = |breakpoints: &mut Vec<Breakpoint>| {
        breakpoints.push(Breakpoint::new(variant.start_index, chromosome.clone()));
        breakpoints.push(Breakpoint::new(variant.end_index, chromosome.clone()));
    };

    match (&variant.variant_type, variant.inter_chromosome) {
        (VariantType::Inv, false) => {
            span(&mut breakpoints);
            connections.push(VariantConnection::new(
                ConnectionEnd::new(0, true),
                ConnectionEnd::new(1, true),
            ));
            connections.push(VariantConnection::new(
                ConnectionEnd::new(1, false),
                ConnectionEnd::new(0, false),
            ));
        }
        (VariantType::Dup, false) => {
            span(&mut breakpoints);
            connections.push(VariantConnection::new(
                ConnectionEnd::new(0, false),
                ConnectionEnd::new(1, true),
            ));
        }
        (VariantType::Del, false) => {
            span(&mut breakpoints);
            connections.push(VariantConnection::new(
                ConnectionEnd::new(0, true),
                ConnectionEnd::new(1, false),
            ));
        }
        (kind, _) if kind.is_reconstructable() => {
            breakpoints.push(Breakpoint::new(variant.start_index, chromosome.clone()));
            for mate in variant.mates() {
                let mate_chromosome = match (&mate.chromosome, mate.intra_chromosome) {
                    (Some(name), false) => Chromosome::named(name.clone()),
                    _ => chromosome.clone(),
                };
                breakpoints.push(Breakpoint::new(mate.position, mate_chromosome));
                connections.push(VariantConnection::new(
                    ConnectionEnd::new(0, mate.attached_at == AttachSide::Right),
                    ConnectionEnd::new(breakpoints.len() - 1, mate.reverse_comp),
                ));
            }
        }
        (kind, _) => {
            return Err(FerroError::UnsupportedVariantType {
                variant_type: kind.to_string(),
            })
        }
    }

    Ok(sort_breakpoints(breakpoints, connections))
}

/// Stable sort by position, remapping connection indices.
pub fn sort_breakpoints(
    breakpoints: Vec<Breakpoint>,
    mut connections: Vec<VariantConnection>,
) -> (Vec<Breakpoint>, Vec<VariantConnection>) {
    let mut order: Vec<usize> = (0..breakpoints.len()).collect();
    order.sort_by_key(|&i| breakpoints[i].position);

    let mut new_index = vec![0; breakpoints.len()];
    for (new, &old) in order.iter().enumerate() {
        new_index[old] = new;
    }
    for connection in &mut connections {
        connection.start.breakpoint_index = new_index[connection.start.breakpoint_index];
        connection.end.breakpoint_index = new_index[connection.end.breakpoint_index];
    }

    let mut slots: Vec<Option<Breakpoint>> = breakpoints.into_iter().map(Some).collect();
    let sorted = order.iter().filter_map(|&i| slots[i].take()).collect();
    (sorted, connections)
}
