//! Error types for ferro-sv
//!
//! Every failure surfaced by the crate is a [`FerroError`]. Each variant maps to
//! an [`ErrorCode`] so callers can branch on the category without matching on
//! message text.
//!
//! Two conditions that look like failures are *not* errors here:
//! a breakpoint without an overlapping gene is represented by
//! [`GeneRef::Empty`](crate::annotation::GeneRef::Empty), and an allele whose
//! difference to the reference is ambiguous keeps `sequence: None`.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Parse errors (E1xxx)
    /// Malformed breakend notation in an alternative allele
    InvalidBreakend = 1001,
    /// Unknown or unparseable variant type
    UnknownVariantType = 1002,

    // Annotation errors (E2xxx)
    /// No gene annotation track is available
    NoAnnotationAvailable = 2001,
    /// A collaborator fetch failed
    DataFetchFailure = 2002,
    /// Gene not present among affected genes
    UnknownGene = 2003,
    /// Transcript not present in the gene
    UnknownTranscript = 2004,

    // Validation errors (E3xxx)
    /// Viewport with an empty or inverted range
    InvalidViewport = 3001,
    /// Connection refers to a missing breakpoint
    InvalidConnection = 3002,

    // Reconstruction errors (E4xxx)
    /// Structural variant subtype outside inv/dup/del/bnd
    UnsupportedVariantType = 4001,
    /// Variant details could not be loaded
    VariantInfoUnavailable = 4002,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E4001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidBreakend => "invalid breakend notation",
            ErrorCode::UnknownVariantType => "unknown variant type",
            ErrorCode::NoAnnotationAvailable => "no gene annotation available",
            ErrorCode::DataFetchFailure => "annotation data fetch failed",
            ErrorCode::UnknownGene => "gene not affected by variant",
            ErrorCode::UnknownTranscript => "transcript not found in gene",
            ErrorCode::InvalidViewport => "invalid viewport",
            ErrorCode::InvalidConnection => "invalid breakpoint connection",
            ErrorCode::UnsupportedVariantType => "unsupported structural variant type",
            ErrorCode::VariantInfoUnavailable => "variant info unavailable",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A span in an allele string indicating where parsing failed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceSpan {
    /// Starting byte offset (0-indexed)
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Render the source with a caret line under the span.
    ///
    /// ```text
    /// G]17:19811
    ///  ^~~~~~~~~
    /// ```
    pub fn highlight(&self, source: &str) -> String {
        if source.is_empty() {
            return String::new();
        }
        let start = self.start.min(source.len());
        let end = self.end.min(source.len()).max(start + 1);

        let mut pointer = " ".repeat(start);
        pointer.push('^');
        pointer.push_str(&"~".repeat(end - start - 1));
        format!("{}\n{}", source, pointer)
    }
}

/// Main error type for ferro-sv operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FerroError {
    /// Breakend allele could not be parsed
    #[error("Invalid breakend allele '{allele}': {msg}")]
    InvalidBreakend {
        allele: String,
        msg: String,
        span: Option<SourceSpan>,
    },

    /// Structural variant subtype that cannot be reconstructed
    #[error("'{variant_type}' variant visualization is not supported.")]
    UnsupportedVariantType { variant_type: String },

    /// No gene file/track to resolve breakpoints against
    #[error("No genes file is available")]
    NoAnnotationAvailable,

    /// A collaborator call failed (chromosome, gene track or variant fetch)
    #[error("Data fetch failed: {msg}")]
    DataFetch { msg: String },

    /// Outermost conversion of any fetch failure during analysis
    #[error("Error loading variant info")]
    VariantInfoUnavailable { cause: Option<String> },

    /// Gene name is not among the genes affected at the breakpoint(s)
    #[error("Gene '{name}' is not affected by this variant")]
    UnknownGene { name: String },

    /// Transcript name is not present in the gene
    #[error("Transcript '{transcript}' not found in gene '{gene}'")]
    UnknownTranscript { gene: String, transcript: String },

    /// Viewport cannot project coordinates
    #[error("Invalid viewport: {msg}")]
    InvalidViewport { msg: String },

    /// Connection references a breakpoint that does not exist
    #[error("Invalid connection: {msg}")]
    InvalidConnection { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl FerroError {
    /// Create a breakend parse error pointing at part of the allele
    pub fn breakend(allele: &str, msg: impl Into<String>, span: Option<SourceSpan>) -> Self {
        FerroError::InvalidBreakend {
            allele: allele.to_string(),
            msg: msg.into(),
            span,
        }
    }

    /// Create a fetch failure
    pub fn fetch(msg: impl Into<String>) -> Self {
        FerroError::DataFetch { msg: msg.into() }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            FerroError::InvalidBreakend { .. } => ErrorCode::InvalidBreakend,
            FerroError::UnsupportedVariantType { .. } => ErrorCode::UnsupportedVariantType,
            FerroError::NoAnnotationAvailable => ErrorCode::NoAnnotationAvailable,
            FerroError::DataFetch { .. } => ErrorCode::DataFetchFailure,
            FerroError::VariantInfoUnavailable { .. } => ErrorCode::VariantInfoUnavailable,
            FerroError::UnknownGene { .. } => ErrorCode::UnknownGene,
            FerroError::UnknownTranscript { .. } => ErrorCode::UnknownTranscript,
            FerroError::InvalidViewport { .. } => ErrorCode::InvalidViewport,
            FerroError::InvalidConnection { .. } => ErrorCode::InvalidConnection,
            FerroError::Io { .. } => ErrorCode::IoError,
            FerroError::Json { .. } => ErrorCode::JsonError,
        }
    }

    /// Whether retrying with a different annotation source may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FerroError::NoAnnotationAvailable
                | FerroError::DataFetch { .. }
                | FerroError::VariantInfoUnavailable { .. }
        )
    }

    /// Get a formatted error, with the failing allele highlighted when known
    pub fn detailed_message(&self) -> String {
        match self {
            FerroError::InvalidBreakend {
                allele,
                span: Some(span),
                ..
            } => format!("[{}] {}\n\n{}", self.code(), self, span.highlight(allele)),
            _ => format!("[{}] {}", self.code(), self),
        }
    }
}

impl From<std::io::Error> for FerroError {
    fn from(err: std::io::Error) -> Self {
        FerroError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FerroError {
    fn from(err: serde_json::Error) -> Self {
        FerroError::Json {
            msg: err.to_string(),
        }
    }
}
