//! CLI utilities for ferro-sv
//!
//! This module provides testable functions used by the CLI binary.
//! By extracting pure functions and I/O-abstracted functions to the library,
//! we enable comprehensive unit testing without requiring end-to-end CLI tests.

pub mod format;
pub mod input;

// Re-export commonly used items
pub use format::{
    describe_allele, output_allele, output_analysis, output_error, output_json, output_layout,
    OutputFormat,
};
pub use input::{open_input, parse_variants, read_json, read_to_string, read_variants};

use crate::annotation::{Chromosome, ReferenceContext};
use crate::config::TranscriptMode;

/// UTF-8 BOM (Byte Order Mark) constant
const UTF8_BOM: &str = "\u{feff}";

/// Strip UTF-8 BOM from the beginning of a string if present.
///
/// # Examples
///
/// ```
/// use ferro_sv::cli::strip_bom;
///
/// assert_eq!(strip_bom("\u{feff}[]"), "[]");
/// assert_eq!(strip_bom("[]"), "[]");
/// ```
pub fn strip_bom(s: &str) -> &str {
    s.strip_prefix(UTF8_BOM).unwrap_or(s)
}

/// Process an input line: trim whitespace, strip BOM (for first line), and
/// skip comment lines.
///
/// Returns None if the line is empty or a comment-only line. Unlike free
/// text, JSON records may contain `#`, so only leading `#` marks a comment.
///
/// # Examples
///
/// ```
/// use ferro_sv::cli::process_input_line;
///
/// assert_eq!(process_input_line(r##"{"id": "#1"}"##, false), Some(r##"{"id": "#1"}"##));
/// assert_eq!(process_input_line("\u{feff}{}", true), Some("{}"));
/// assert_eq!(process_input_line("# comment", false), None);
/// assert_eq!(process_input_line("   ", false), None);
/// ```
pub fn process_input_line(line: &str, is_first_line: bool) -> Option<&str> {
    let line = line.trim();
    let line = if is_first_line { strip_bom(line) } else { line };

    if line.is_empty() || line.starts_with('#') {
        None
    } else {
        Some(line)
    }
}

/// Parse a transcript mode name (`canonical` or `consensus`)
pub fn parse_transcript_mode(s: &str) -> Result<TranscriptMode, String> {
    match s.to_lowercase().as_str() {
        "canonical" => Ok(TranscriptMode::Canonical),
        "consensus" => Ok(TranscriptMode::Consensus),
        _ => Err(format!(
            "Invalid transcript mode '{}'. Use 'canonical' or 'consensus'.",
            s
        )),
    }
}

/// Find a chromosome of the reference by id or by name
///
/// Names match case-insensitively with or without a `chr` prefix.
pub fn find_chromosome<'a>(reference: &'a ReferenceContext, key: &str) -> Option<&'a Chromosome> {
    if let Ok(id) = key.parse::<u64>() {
        if let Some(chromosome) = reference.chromosome(id) {
            return Some(chromosome);
        }
    }
    let bare = |name: &str| {
        let lower = name.to_lowercase();
        lower.strip_prefix("chr").map(str::to_string).unwrap_or(lower)
    };
    let wanted = bare(key);
    reference
        .chromosomes
        .iter()
        .find(|chromosome| bare(&chromosome.name) == wanted)
}
