//! Output formatting utilities for CLI operations

use crate::error::FerroError;
use crate::junction::{ShortVariantAnalysis, StructuralAnalysis, VariantAnalysis};
use crate::layout::{ItemKind, Layout};
use crate::variant::{AnalyzedAllele, AnalyzedVariant};
use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text format (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    /// Parse an output format from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use ferro_sv::cli::OutputFormat;
    /// use std::str::FromStr;
    ///
    /// assert!(matches!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json));
    /// assert!(matches!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        })
    }
}

/// Write any serializable value as pretty JSON followed by a newline
pub fn output_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value).map_err(io::Error::other)?;
    writeln!(writer)
}

/// Write an error to the output
///
/// # Arguments
///
/// * `writer` - The output writer (can be stderr, file, or buffer for testing)
/// * `input` - What was being processed when the error occurred
/// * `error` - The error that occurred
/// * `format` - The output format
///
/// # Examples
///
/// ```
/// use ferro_sv::cli::{output_error, OutputFormat};
/// use ferro_sv::FerroError;
/// use std::io::Cursor;
///
/// let mut buffer = Cursor::new(Vec::new());
/// let error = FerroError::NoAnnotationAvailable;
/// output_error(&mut buffer, "variant.json", &error, OutputFormat::Text).unwrap();
/// let result = String::from_utf8(buffer.into_inner()).unwrap();
/// assert!(result.contains("ERROR: variant.json"));
/// ```
pub fn output_error<W: Write>(
    writer: &mut W,
    input: &str,
    error: &FerroError,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "input": input,
                "code": error.code().as_str(),
                "error": error.to_string(),
                "status": "error",
            });
            writeln!(writer, "{}", value)
        }
        OutputFormat::Text => writeln!(writer, "ERROR: {} - {}", input, error.detailed_message()),
    }
}

/// One-line summary of an allele, e.g. `<INV> [INV]` or `AT [del T, 1 bp]`
pub fn describe_allele(allele: &AnalyzedAllele) -> String {
    let mut parts = Vec::new();
    if let Some(kind) = &allele.info.allele_type {
        parts.push(kind.to_string());
    }
    if let Some(sequence) = &allele.info.sequence {
        parts.push(sequence.clone());
    }
    if let Some(length) = allele.info.length {
        parts.push(format!("{} bp", length));
    }
    if let Some(mate) = &allele.mate {
        let chromosome = mate.chromosome.as_deref().unwrap_or(".");
        parts.push(format!(
            "mate {}:{} {:?}{}",
            chromosome,
            mate.position,
            mate.attached_at,
            if mate.reverse_comp { " revcomp" } else { "" }
        ));
    }
    if parts.is_empty() {
        allele.source.clone()
    } else {
        format!("{} [{}]", allele.source, parts.join(", "))
    }
}

pub fn output_allele<W: Write>(
    writer: &mut W,
    allele: &AnalyzedAllele,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => output_json(writer, allele),
        OutputFormat::Text => writeln!(writer, "{}", describe_allele(allele)),
    }
}

fn variant_header(variant: &AnalyzedVariant) -> String {
    format!(
        "{} {}-{} ({} bp)",
        variant.name, variant.start_index, variant.end_index, variant.length
    )
}

fn write_structural<W: Write>(writer: &mut W, analysis: &StructuralAnalysis) -> io::Result<()> {
    writeln!(writer, "{}", variant_header(&analysis.variant))?;
    for (index, breakpoint) in analysis.breakpoints.iter().enumerate() {
        let gene = breakpoint.gene().map_or("-", |g| g.name());
        writeln!(
            writer,
            "  breakpoint {}: {}:{} {}",
            index + 1,
            breakpoint.chromosome.name,
            breakpoint.position,
            gene
        )?;
    }
    if let Some(duplicated) = &analysis.duplicated_gene_names {
        writeln!(writer, "  duplicated: {}", duplicated.join(", "))?;
    }
    for (index, structure) in analysis.alt_structures.iter().enumerate() {
        writeln!(
            writer,
            "  structure {}: {} junction at {} of {}",
            index + 1,
            structure.gene_names().join("-"),
            structure.breakpoint,
            structure.total_exons_length
        )?;
    }
    for junction in &analysis.junction_labels {
        writeln!(
            writer,
            "  junction {}: {}",
            junction.connection_index + 1,
            junction.label
        )?;
    }
    Ok(())
}

fn write_short<W: Write>(writer: &mut W, analysis: &ShortVariantAnalysis) -> io::Result<()> {
    writeln!(writer, "{}", variant_header(&analysis.variant))?;
    writeln!(
        writer,
        "  window: {}:{}-{}",
        analysis.chromosome.name, analysis.window_start, analysis.window_end
    )?;
    writeln!(writer, "  reference: {}", analysis.display_reference)?;
    for features in &analysis.alleles {
        writeln!(writer, "  allele {}", describe_allele(&features.allele))?;
        for row in &features.rows {
            writeln!(
                writer,
                "    {} {} exon {}{}",
                row.gene,
                row.transcript,
                row.exon,
                row.domain
                    .as_deref()
                    .map(|d| format!(" ({})", d))
                    .unwrap_or_default()
            )?;
        }
    }
    Ok(())
}

pub fn output_analysis<W: Write>(
    writer: &mut W,
    analysis: &VariantAnalysis,
    format: OutputFormat,
) -> io::Result<()> {
    match (format, analysis) {
        (OutputFormat::Json, _) => output_json(writer, analysis),
        (OutputFormat::Text, VariantAnalysis::Structural(structural)) => {
            write_structural(writer, structural)
        }
        (OutputFormat::Text, VariantAnalysis::Short(short)) => write_short(writer, short),
    }
}

/// Write laid-out items, one per line with their lanes
pub fn output_layout<W: Write>(
    writer: &mut W,
    layout: &Layout,
    variants: &[AnalyzedVariant],
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return output_json(writer, layout);
    }
    for item in &layout.items {
        let lanes: Vec<String> = item
            .positioning
            .iter()
            .map(|p| p.layer_index.to_string())
            .collect();
        match &item.kind {
            ItemKind::Variant { index } => {
                let name = variants.get(*index).map_or("?", |v| v.name.as_str());
                writeln!(
                    writer,
                    "variant {} {}-{} lane {}",
                    name,
                    item.start_index,
                    item.end_index,
                    lanes.join(",")
                )?;
            }
            ItemKind::Bubble(bubble) => {
                writeln!(
                    writer,
                    "bubble x{} {}-{} lane {}",
                    bubble.variations_count,
                    item.start_index,
                    item.end_index,
                    lanes.join(",")
                )?;
            }
        }
    }
    writeln!(writer, "lanes: {}", layout.max_layer_index + 1)
}
