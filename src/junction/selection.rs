//! Structural analysis results and the selection changes applied to them

use crate::annotation::{Chromosome, GeneFile, GeneRef, GeneStructure};
use crate::error::FerroError;
use crate::junction::breakpoint::{Breakpoint, VariantConnection};
use crate::junction::recover::{
    is_local_junction, junction_label, recover_alternative_structure,
    recover_duplication_structures, AlternativeStructure, JunctionLabel,
};
use crate::variant::{AnalyzedVariant, VariantType};
use serde::{Deserialize, Serialize};

/// A gene selected at one or more breakpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedGeneEntry {
    pub name: String,
    pub chromosome: Chromosome,
    pub gene: GeneRef,
}

/// Everything derived from one structural variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralAnalysis {
    pub variant: AnalyzedVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene_file: Option<GeneFile>,
    /// Lowercased names of the chromosomes touched, first-seen order
    pub chromosomes: Vec<String>,
    pub breakpoints: Vec<Breakpoint>,
    pub connections: Vec<VariantConnection>,
    /// Selected genes, one entry per distinct name
    pub genes: Vec<AffectedGeneEntry>,
    /// Genes inside a duplicated region not hit by a breakpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicated_gene_names: Option<Vec<String>>,
    /// Domain names in first-seen order; the position is the color index
    pub domain_names: Vec<String>,
    pub alt_structures: Vec<AlternativeStructure>,
    /// Junctions joining different chromosomes, shown by coordinates only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub junction_labels: Vec<JunctionLabel>,
}

impl StructuralAnalysis {
    /// Assemble an analysis and build its derived tables.
    pub fn new(
        variant: AnalyzedVariant,
        gene_file: Option<GeneFile>,
        breakpoints: Vec<Breakpoint>,
        connections: Vec<VariantConnection>,
        duplicated_gene_names: Option<Vec<String>>,
        placeholder_length: i64,
    ) -> Result<Self, FerroError> {
        let mut chromosomes: Vec<String> = Vec::new();
        for breakpoint in &breakpoints {
            let name = breakpoint.chromosome.name.to_lowercase();
            if !chromosomes.contains(&name) {
                chromosomes.push(name);
            }
        }

        let mut analysis = Self {
            variant,
            gene_file,
            chromosomes,
            breakpoints,
            connections,
            genes: Vec::new(),
            duplicated_gene_names,
            domain_names: Vec::new(),
            alt_structures: Vec::new(),
            junction_labels: Vec::new(),
        };
        analysis.rebuild(placeholder_length)?;
        Ok(analysis)
    }

    /// Color index of a domain.
    pub fn domain_color_index(&self, name: &str) -> Option<usize> {
        self.domain_names.iter().position(|d| d == name)
    }

    /// Recompute genes, domain colors and alternative structures from the
    /// current breakpoint selection. No data is refetched.
    pub fn rebuild(&mut self, placeholder_length: i64) -> Result<(), FerroError> {
        self.genes.clear();
        self.domain_names.clear();
        for breakpoint in &self.breakpoints {
            let Some(gene) = breakpoint.gene() else {
                continue;
            };
            if !self.genes.iter().any(|g| g.name == gene.name()) {
                self.genes.push(AffectedGeneEntry {
                    name: gene.name().to_string(),
                    chromosome: breakpoint.chromosome.clone(),
                    gene: gene.clone(),
                });
            }
            if let Some(structure) = gene.structure() {
                for name in structure.domain_names() {
                    if !self.domain_names.iter().any(|d| d == name) {
                        self.domain_names.push(name.to_string());
                    }
                }
            }
        }
        self.junction_labels.clear();
        self.alt_structures = self.recover(placeholder_length)?;
        Ok(())
    }

    fn recover(&mut self, placeholder_length: i64) -> Result<Vec<AlternativeStructure>, FerroError> {
        let local = !self.variant.inter_chromosome;
        match (&self.variant.variant_type, self.connections.as_slice()) {
            (VariantType::Inv, [forward, backward, ..]) if local => Ok(vec![
                recover_alternative_structure(forward, &self.breakpoints, false, placeholder_length)?,
                recover_alternative_structure(backward, &self.breakpoints, true, placeholder_length)?,
            ]),
            (VariantType::Dup, [connection, ..]) if local => {
                recover_duplication_structures(&self.breakpoints, connection, placeholder_length)
            }
            _ => {
                let mut structures = Vec::new();
                for (index, connection) in self.connections.iter().enumerate() {
                    if is_local_junction(connection, &self.breakpoints)? {
                        structures.push(recover_alternative_structure(
                            connection,
                            &self.breakpoints,
                            false,
                            placeholder_length,
                        )?);
                    } else {
                        self.junction_labels.push(JunctionLabel {
                            connection_index: index,
                            label: junction_label(connection, &self.breakpoints)?,
                        });
                    }
                }
                Ok(structures)
            }
        }
    }

    /// Select another gene resolved at breakpoint `index` and rebuild.
    pub fn change_affected_gene(
        &mut self,
        index: usize,
        gene_name: &str,
        placeholder_length: i64,
    ) -> Result<(), FerroError> {
        let count = self.breakpoints.len();
        let breakpoint = self
            .breakpoints
            .get_mut(index)
            .ok_or_else(|| FerroError::InvalidConnection {
                msg: format!("breakpoint {} does not exist ({} breakpoints)", index, count),
            })?;
        let position = breakpoint
            .affected_genes
            .iter()
            .position(|g| g.name() == gene_name)
            .ok_or_else(|| FerroError::UnknownGene {
                name: gene_name.to_string(),
            })?;
        breakpoint.affected_gene = position;
        log::debug!("breakpoint {} now shows gene {}", index, gene_name);
        self.rebuild(placeholder_length)
    }

    /// Pin a transcript of an affected gene, rebuild that gene's structure at
    /// every breakpoint that resolved it and then the alternative structures.
    pub fn change_affected_transcript(
        &mut self,
        gene_name: &str,
        transcript: &str,
        placeholder_length: i64,
    ) -> Result<(), FerroError> {
        let gene = self
            .breakpoints
            .iter()
            .flat_map(|b| b.affected_genes.iter())
            .find_map(|g| g.structure().filter(|s| s.name == gene_name))
            .map(|s| s.gene.clone())
            .ok_or_else(|| FerroError::UnknownGene {
                name: gene_name.to_string(),
            })?;

        let structure = GeneStructure::with_transcript(&gene, transcript)?;
        let replacement = GeneRef::Real(Box::new(structure));
        for breakpoint in &mut self.breakpoints {
            breakpoint.replace_gene(&replacement);
        }
        log::debug!("gene {} now uses transcript {}", gene_name, transcript);
        self.rebuild(placeholder_length)
    }
}
