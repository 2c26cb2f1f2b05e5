//! Exon structures and the split / merge operations on them
//!
//! # Example
//!
//! ```
//! use ferro_sv::structure::{merge_segments, split_exons, KeepSide, RelativeSpan, Segment, StructureExon};
//!
//! let mut a = StructureExon::new("A", 0, 0, 99);
//! a.relative = RelativeSpan::new(0, 99);
//! let left = split_exons(&[a], 39, &[], KeepSide::Left, false);
//!
//! let merged = merge_segments(
//!     vec![Segment::Exons(left), Segment::Empty { gene_name: "empty_1".into() }],
//!     5,
//! );
//! assert_eq!(merged.breakpoint, 40);
//! assert_eq!(merged.consensus_exons.last().unwrap().relative, RelativeSpan::new(40, 44));
//! ```

pub mod exon;
pub mod merge;
pub mod split;

pub use exon::{
    total_exons_length, BreakpointSide, ExonDomain, ExonKind, RelativeSpan, Segment,
    StructureExon,
};
pub use merge::{merge_segments, MergedStructure};
pub use split::{split_exons, KeepSide};
