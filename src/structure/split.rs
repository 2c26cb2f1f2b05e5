//! Cutting a gene structure at a breakpoint

use crate::structure::exon::{BreakpointSide, RelativeSpan, StructureExon};

/// Which part of the structure to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeepSide {
    /// Everything up to the breakpoint
    Left,
    /// Everything from the breakpoint on
    Right,
}

impl KeepSide {
    pub fn from_take_left(take_left: bool) -> Self {
        if take_left {
            KeepSide::Left
        } else {
            KeepSide::Right
        }
    }
}

/// Keep one side of `exons` cut at relative position `breakpoint`.
///
/// Other breakpoints in the same gene (`neighbors`) bound the kept part: a
/// neighbor between the gene start and the breakpoint becomes the left border,
/// one between the breakpoint and the gene end the right border. Kept exons are
/// clipped to the borders, the exon whose clipped boundary equals the cut is
/// flagged, and the result is renumbered from zero. With `reverse` the part is mirrored: exon
/// order, strands and domain placement inside each exon are flipped.
pub fn split_exons(
    exons: &[StructureExon],
    breakpoint: i64,
    neighbors: &[i64],
    keep: KeepSide,
    reverse: bool,
) -> Vec<StructureExon> {
    let mut left_border = 0i64;
    let mut right_border = exons.iter().map(|e| e.relative.end).fold(0, i64::max);
    for &other in neighbors {
        if other == breakpoint {
            continue;
        }
        if other > left_border && other < breakpoint {
            left_border = other;
        }
        if other < right_border && other > breakpoint {
            right_border = other;
        }
    }

    let mut kept: Vec<StructureExon> = exons
        .iter()
        .filter_map(|exon| match keep {
            KeepSide::Left => {
                if exon.relative.start >= breakpoint || exon.relative.end < left_border {
                    return None;
                }
                let span = RelativeSpan::new(
                    left_border.max(exon.relative.start),
                    breakpoint.min(exon.relative.end),
                );
                let touches = span.end == breakpoint;
                let side = if reverse {
                    BreakpointSide::Start
                } else {
                    BreakpointSide::End
                };
                Some(clip(exon, span, touches.then_some(side)))
            }
            KeepSide::Right => {
                if exon.relative.end <= breakpoint || exon.relative.start > right_border {
                    return None;
                }
                let span = RelativeSpan::new(
                    breakpoint.max(exon.relative.start),
                    right_border.min(exon.relative.end),
                );
                let side = if reverse {
                    BreakpointSide::End
                } else {
                    BreakpointSide::Start
                };
                Some(clip(exon, span, (span.start == breakpoint).then_some(side)))
            }
        })
        .collect();

    if reverse {
        kept.reverse();
        for exon in &mut kept {
            exon.strand = exon.strand.map(|s| s.flip());
        }
    }

    renumber(&mut kept, reverse);
    kept
}

fn clip(
    exon: &StructureExon,
    span: RelativeSpan,
    breakpoint: Option<BreakpointSide>,
) -> StructureExon {
    let mut clipped = exon.clone();
    clipped.start = exon.start + (span.start - exon.relative.start);
    clipped.end = exon.end - (exon.relative.end - span.end);
    clipped.relative = span;
    clipped.domains = exon
        .domains
        .iter()
        .filter_map(|d| {
            d.range.clip(&span).map(|range| {
                let mut domain = d.clone();
                domain.range = range;
                domain
            })
        })
        .collect();
    if breakpoint.is_some() {
        clipped.breakpoint = breakpoint;
    }
    clipped
}

/// Lay exons out contiguously from zero, mirroring domains when reversed.
fn renumber(exons: &mut [StructureExon], reverse: bool) {
    let mut previous = 0i64;
    for exon in exons.iter_mut() {
        let width = exon.relative.width();
        exon.shift_relative(previous - exon.relative.start);
        if reverse {
            let span = exon.relative;
            for domain in &mut exon.domains {
                let domain_width = domain.range.width();
                let end = span.end - (domain.range.start - span.start);
                domain.range = RelativeSpan::new(end - domain_width, end);
            }
        }
        previous += width + 1;
    }
}
