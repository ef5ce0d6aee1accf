//! Subscript compiler.
//!
//! Parses strings like `"ij,jk->ik"` against the ranks of the operands into
//! per-operand label plans, label occurrence counts and the output labels.

use smallvec::SmallVec;

use super::label::{AxisLabel, Label, LabelCounts, OperandLabels};
use super::notation::EinsumNotation;
use crate::error::{EinsumError, EinsumResult, Segment};

/// Maximum number of input operands plus one (the output).
pub const MAX_OPERANDS: usize = 32;

/// Maximum rank of an operand, the output, or the iteration space.
pub const MAX_DIMS: usize = 64;

/// Parses a subscripts string against the ranks of the operands.
///
/// # Grammar
///
/// ```text
/// einsum      ::= inputs '->' output | inputs
/// inputs      ::= subscript (',' subscript)*
/// output      ::= subscript
/// subscript   ::= (index | ' ')* | (index | ' ')* '...' (index | ' ')*
/// index       ::= [a-zA-Z]
/// ```
///
/// # Examples
///
/// ```
/// use einsum_sumprod::notation::parse_einsum;
///
/// let notation = parse_einsum("ij,jk", &[2, 2]).unwrap();
/// assert_eq!(notation.output_string(), "ik");
/// ```
pub fn parse_einsum(subscripts: &str, ndims: &[usize]) -> EinsumResult<EinsumNotation> {
    let nop = ndims.len();
    if nop == 0 {
        return Err(EinsumError::NoOperands);
    }
    // One slot is reserved for the output operand.
    if nop >= MAX_OPERANDS {
        return Err(EinsumError::TooManyOperands {
            count: nop,
            max: MAX_OPERANDS - 1,
        });
    }
    if let Some(&rank) = ndims.iter().find(|&&ndim| ndim >= MAX_DIMS) {
        return Err(EinsumError::RankTooLarge {
            rank,
            max: MAX_DIMS,
        });
    }

    // Inputs end at the first '-', which must open an arrow.
    let (inputs_str, output_str) = match subscripts.find('-') {
        Some(pos) => {
            if !subscripts[pos..].starts_with("->") {
                return Err(EinsumError::MissingOutputArrow);
            }
            (&subscripts[..pos], Some(&subscripts[pos + 2..]))
        }
        None => (subscripts, None),
    };

    let segments: SmallVec<[&str; 4]> = inputs_str.split(',').collect();
    if segments.len() != nop {
        return Err(EinsumError::OperandCountMismatch {
            specified: segments.len(),
            provided: nop,
        });
    }

    let mut counts = LabelCounts::new();
    let mut operands = SmallVec::with_capacity(nop);
    for (iop, (segment, &ndim)) in segments.iter().zip(ndims.iter()).enumerate() {
        operands.push(parse_operand_subscripts(segment, ndim, iop, &mut counts)?);
    }

    let ndim_broadcast = operands
        .iter()
        .map(OperandLabels::broadcast_count)
        .max()
        .unwrap_or(0);

    let output = match output_str {
        Some(out) => parse_output_subscripts(out, ndim_broadcast, &counts)?,
        None => infer_output(ndim_broadcast, &counts),
    };

    if output.len() >= MAX_DIMS {
        return Err(EinsumError::RankTooLarge {
            rank: output.len(),
            max: MAX_DIMS,
        });
    }

    let notation = EinsumNotation::new(operands, counts, ndim_broadcast, output, output_str.is_some())
        .with_original(subscripts);

    tracing::debug!(
        subscripts,
        output = %notation.output_string(),
        ndim_broadcast,
        "parsed einsum subscripts"
    );

    Ok(notation)
}

/// Parses the subscripts of one operand into `ndim` axis labels.
///
/// The result holds, per axis:
/// - the label, for the first occurrence of a label;
/// - a back-reference to the first occurrence, for repeated labels;
/// - broadcast, for axes absorbed by the ellipsis.
///
/// Examples, as compact codes:
/// - `"abbcbc"`, ndim 6 → `[97, 98, -1, 99, -3, -2]`
/// - `"ab...bc"`, ndim 6 → `[97, 98, 0, 0, -3, 99]`
pub fn parse_operand_subscripts(
    segment: &str,
    ndim: usize,
    operand: usize,
    counts: &mut LabelCounts,
) -> EinsumResult<OperandLabels> {
    let mut labels: SmallVec<[Label; 8]> = SmallVec::new();
    let mut ellipsis: Option<usize> = None;
    let mut chars = segment.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if ellipsis.is_some() || chars.next() != Some('.') || chars.next() != Some('.') {
                    return Err(EinsumError::MalformedEllipsis {
                        segment: Segment::Operand(operand),
                    });
                }
                ellipsis = Some(labels.len());
            }
            ' ' => continue,
            _ => {
                let label = Label::new(c).ok_or(EinsumError::InvalidSubscript { character: c })?;
                if labels.len() >= ndim {
                    return Err(EinsumError::TooManySubscripts { operand });
                }
                labels.push(label);
                counts.record(label);
            }
        }
    }

    let found = labels.len();
    let mut axes: SmallVec<[AxisLabel; 8]> = SmallVec::from_elem(AxisLabel::Broadcast, ndim);
    match ellipsis {
        None => {
            if found != ndim {
                return Err(EinsumError::MissingEllipsis {
                    segment: Segment::Operand(operand),
                });
            }
            for (slot, &label) in axes.iter_mut().zip(labels.iter()) {
                *slot = AxisLabel::Label(label);
            }
        }
        Some(pos) => {
            // Labels after the ellipsis are right-aligned; the gap stays broadcast.
            for (slot, &label) in axes.iter_mut().zip(labels[..pos].iter()) {
                *slot = AxisLabel::Label(label);
            }
            let trailing = &labels[pos..];
            let start = ndim - trailing.len();
            for (slot, &label) in axes[start..].iter_mut().zip(trailing.iter()) {
                *slot = AxisLabel::Label(label);
            }
        }
    }

    mark_repeats(&mut axes);
    Ok(OperandLabels::new(axes, ellipsis))
}

/// Turns every later occurrence of a label into a back-reference to its first axis.
fn mark_repeats(axes: &mut [AxisLabel]) {
    for first in 0..axes.len() {
        let AxisLabel::Label(label) = axes[first] else {
            continue;
        };
        for next in first + 1..axes.len() {
            if axes[next] == AxisLabel::Label(label) {
                axes[next] = AxisLabel::Repeat {
                    offset: next - first,
                };
            }
        }
    }
}

/// Parses the explicit output segment.
///
/// Every label must occur in some input and at most once in the output. The
/// ellipsis expands to `ndim_broadcast` broadcast axes and is required when
/// there are any.
pub fn parse_output_subscripts(
    segment: &str,
    ndim_broadcast: usize,
    counts: &LabelCounts,
) -> EinsumResult<SmallVec<[AxisLabel; 8]>> {
    let mut output: SmallVec<[AxisLabel; 8]> = SmallVec::new();
    let mut seen_ellipsis = false;
    let mut chars = segment.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if seen_ellipsis || chars.next() != Some('.') || chars.next() != Some('.') {
                    return Err(EinsumError::MalformedEllipsis {
                        segment: Segment::Output,
                    });
                }
                seen_ellipsis = true;
                output.extend(core::iter::repeat_n(AxisLabel::Broadcast, ndim_broadcast));
            }
            ' ' => continue,
            _ => {
                let label = Label::new(c).ok_or(EinsumError::InvalidSubscript { character: c })?;
                if output.contains(&AxisLabel::Label(label)) {
                    return Err(EinsumError::RepeatedOutputLabel { label: c });
                }
                if counts.count(label) == 0 {
                    return Err(EinsumError::OutputLabelNotInInputs { label: c });
                }
                output.push(AxisLabel::Label(label));
            }
        }
    }

    if !seen_ellipsis && ndim_broadcast > 0 {
        return Err(EinsumError::MissingEllipsis {
            segment: Segment::Output,
        });
    }

    Ok(output)
}

/// Infers the output when no `->` is given.
///
/// Rules (NumPy einsum convention):
/// 1. Broadcast axes come first, in positional order
/// 2. Labels occurring exactly once across all inputs follow
/// 3. Those labels are sorted by ascending character code
fn infer_output(ndim_broadcast: usize, counts: &LabelCounts) -> SmallVec<[AxisLabel; 8]> {
    let mut output: SmallVec<[AxisLabel; 8]> =
        SmallVec::from_elem(AxisLabel::Broadcast, ndim_broadcast);
    output.extend(
        counts
            .labels()
            .filter(|&label| counts.count(label) == 1)
            .map(AxisLabel::Label),
    );
    output
}
