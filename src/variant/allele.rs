//! Alternative allele classification
//!
//! Every alternative allele is one of three shapes:
//!
//! | Shape | Example | Result |
//! |-------|---------|--------|
//! | sequence | `ATTG` | insertion / deletion / substitution against the reference |
//! | symbolic | `<INV>` | structural type taken from the symbol |
//! | breakend | `G]17:198982]` | mate location, orientation and joined sequence |
//!
//! Breakend orientation follows VCF: the position of the first bracket tells
//! on which side the local sequence is joined, the bracket kind tells whether
//! the mate piece is reverse complemented.

use crate::error::{FerroError, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a sequence allele against its reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlleleType {
    Insertion,
    Deletion,
    Substitution,
    /// `<XXX>` allele; holds the symbol text without brackets
    Symbolic(String),
}

impl fmt::Display for AlleleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlleleType::Insertion => write!(f, "ins"),
            AlleleType::Deletion => write!(f, "del"),
            AlleleType::Substitution => write!(f, "snv"),
            AlleleType::Symbolic(s) => write!(f, "{}", s),
        }
    }
}

/// Result of comparing an allele sequence with the reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlleleInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allele_type: Option<AlleleType>,
    /// Inserted, deleted or substituted bases; `None` when ambiguous
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

/// Which side of the local base the mate sequence is joined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachSide {
    Left,
    Right,
}

/// Breakend mate location parsed from an allele.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mate {
    /// Mate chromosome; `None` for a position-only mate on the same chromosome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chromosome: Option<String>,
    pub position: u64,
    pub attached_at: AttachSide,
    /// `]` brackets: the mate piece is reverse complemented
    pub reverse_comp: bool,
    /// Filled in by the variant analyzer
    #[serde(default)]
    pub intra_chromosome: bool,
}

/// One alternative allele after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedAllele {
    pub source: String,
    pub info: AlleleInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mate: Option<Mate>,
    /// Label shown for the allele, set by the variant analyzer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

impl AnalyzedAllele {
    pub fn is_symbolic(&self) -> bool {
        matches!(self.info.allele_type, Some(AlleleType::Symbolic(_)))
    }

    pub fn is_breakend(&self) -> bool {
        self.mate.is_some()
    }
}

/// Compare an allele with the reference.
///
/// The longer string decides between deletion and insertion; the shorter must
/// be a prefix (`ref_attached_at_left`) or suffix of it for the differing
/// bases to be extracted. Equal-length differing strings are substitutions.
pub fn analyze_sequence(reference: &str, alternate: &str, ref_attached_at_left: bool) -> AlleleInfo {
    let strip = |long: &str, short: &str| -> Option<String> {
        let rest = if ref_attached_at_left {
            long.strip_prefix(short)
        } else {
            long.strip_suffix(short)
        };
        rest.map(str::to_string)
    };

    let (allele_type, sequence) = if reference.len() > alternate.len() {
        (Some(AlleleType::Deletion), strip(reference, alternate))
    } else if reference.len() < alternate.len() {
        (Some(AlleleType::Insertion), strip(alternate, reference))
    } else if reference != alternate {
        (Some(AlleleType::Substitution), Some(alternate.to_string()))
    } else {
        (None, None)
    };

    let length = sequence.as_ref().map(String::len);
    AlleleInfo {
        allele_type,
        sequence,
        length,
    }
}

/// Parse breakend notation into its mate and the locally joined sequence.
///
/// Returns `Ok(None)` when the allele carries no bracket.
pub fn parse_breakend(allele: &str) -> Result<Option<(Mate, &str)>, FerroError> {
    let open_char = if allele.contains('[') {
        '['
    } else if allele.contains(']') {
        ']'
    } else {
        return Ok(None);
    };

    // Both bracket kinds are single-byte, so these offsets are char boundaries.
    let open = allele.find(open_char).unwrap_or(0);
    let close = allele[open + 1..]
        .find(open_char)
        .map(|i| open + 1 + i)
        .ok_or_else(|| {
            FerroError::breakend(
                allele,
                format!("missing closing '{}'", open_char),
                Some(SourceSpan::new(open, allele.len())),
            )
        })?;

    let location = &allele[open + 1..close];
    let span = SourceSpan::new(open + 1, close);
    let (chromosome, position) = match location.rsplit_once(':') {
        Some((chrom, pos)) => (Some(chrom.to_string()), pos),
        None => (None, location),
    };
    if chromosome.as_deref() == Some("") {
        return Err(FerroError::breakend(
            allele,
            "empty mate chromosome",
            Some(span),
        ));
    }
    let position: u64 = position.parse().map_err(|_| {
        FerroError::breakend(
            allele,
            format!("invalid mate position '{}'", position),
            Some(span.clone()),
        )
    })?;

    let attached_at = if open == 0 {
        AttachSide::Left
    } else {
        AttachSide::Right
    };
    let joined = match attached_at {
        AttachSide::Left => &allele[close + 1..],
        AttachSide::Right => &allele[..open],
    };

    let mate = Mate {
        chromosome,
        position,
        attached_at,
        reverse_comp: open_char == ']',
        intra_chromosome: false,
    };
    Ok(Some((mate, joined)))
}

/// Classify one alternative allele against the reference allele.
pub fn analyze_allele(reference: &str, allele: &str) -> Result<AnalyzedAllele, FerroError> {
    if let Some((mate, joined)) = parse_breakend(allele)? {
        let info = analyze_sequence(reference, joined, mate.attached_at == AttachSide::Left);
        return Ok(AnalyzedAllele {
            source: allele.to_string(),
            info,
            mate: Some(mate),
            display_text: None,
        });
    }

    if let Some(symbol) = allele
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
    {
        return Ok(AnalyzedAllele {
            source: allele.to_string(),
            info: AlleleInfo {
                allele_type: Some(AlleleType::Symbolic(symbol.to_string())),
                sequence: None,
                length: None,
            },
            mate: None,
            display_text: None,
        });
    }

    Ok(AnalyzedAllele {
        source: allele.to_string(),
        info: analyze_sequence(reference, allele, true),
        mate: None,
        display_text: None,
    })
}

/// Classify all alternative alleles of a record.
pub fn analyze_alleles(
    reference: &str,
    alleles: &[String],
) -> Result<Vec<AnalyzedAllele>, FerroError> {
    alleles
        .iter()
        .map(|allele| analyze_allele(reference, allele))
        .collect()
}

const MAX_DESCRIPTION_LENGTH: usize = 10;
const ABBREVIATED_PART: usize = 5;

/// Shorten a long allele sequence to `first5...last5`.
pub fn abbreviate(description: &str) -> String {
    let chars: Vec<char> = description.chars().collect();
    if chars.len() > MAX_DESCRIPTION_LENGTH + 1 {
        let head: String = chars[..ABBREVIATED_PART].iter().collect();
        let tail: String = chars[chars.len() - ABBREVIATED_PART..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        description.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("A", "ATTG", true, Some(AlleleType::Insertion), Some("TTG"))]
    #[case("ATTG", "A", true, Some(AlleleType::Deletion), Some("TTG"))]
    #[case("A", "G", true, Some(AlleleType::Substitution), Some("G"))]
    #[case("A", "GTTA", false, Some(AlleleType::Insertion), Some("GTT"))]
    #[case("A", "GTTC", true, Some(AlleleType::Insertion), None)]
    #[case("A", "A", true, None, None)]
    fn test_analyze_sequence(
        #[case] reference: &str,
        #[case] alternate: &str,
        #[case] left: bool,
        #[case] kind: Option<AlleleType>,
        #[case] sequence: Option<&str>,
    ) {
        let info = analyze_sequence(reference, alternate, left);
        assert_eq!(info.allele_type, kind);
        assert_eq!(info.sequence.as_deref(), sequence);
        assert_eq!(info.length, sequence.map(str::len));
    }

    #[test]
    fn test_breakend_right_reverse() {
        let allele = analyze_allele("G", "G]17:198982]").unwrap();
        let mate = allele.mate.unwrap();
        assert_eq!(mate.chromosome.as_deref(), Some("17"));
        assert_eq!(mate.position, 198982);
        assert_eq!(mate.attached_at, AttachSide::Right);
        assert!(mate.reverse_comp);
        // joined sequence equals the reference: no difference
        assert_eq!(allele.info.allele_type, None);
    }

    #[test]
    fn test_breakend_left_forward() {
        let allele = analyze_allele("T", "[13:123456[AGTNNNNNCAT").unwrap();
        let mate = allele.mate.unwrap();
        assert_eq!(mate.attached_at, AttachSide::Left);
        assert!(!mate.reverse_comp);
        assert_eq!(mate.position, 123456);
        assert_eq!(allele.info.allele_type, Some(AlleleType::Insertion));
        assert_eq!(allele.info.sequence, None);
    }

    #[test]
    fn test_breakend_position_only() {
        let (mate, joined) = parse_breakend("A[500[").unwrap().unwrap();
        assert_eq!(mate.chromosome, None);
        assert_eq!(mate.position, 500);
        assert_eq!(joined, "A");
    }

    #[rstest]
    #[case("G]17:198982")]
    #[case("G]17:abc]")]
    #[case("G[:5[")]
    fn test_breakend_errors(#[case] input: &str) {
        let err = analyze_allele("G", input).unwrap_err();
        assert!(matches!(err, FerroError::InvalidBreakend { .. }));
    }

    #[test]
    fn test_symbolic() {
        let allele = analyze_allele("N", "<INV>").unwrap();
        assert!(allele.is_symbolic());
        assert_eq!(
            allele.info.allele_type,
            Some(AlleleType::Symbolic("INV".to_string()))
        );
    }

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate("ACGTACGTAC"), "ACGTACGTAC");
        assert_eq!(abbreviate("ACGTACGTACG"), "ACGTACGTACG");
        assert_eq!(abbreviate("ACGTACGTACGT"), "ACGTA...TACGT");
    }
}
