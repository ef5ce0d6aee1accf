//! Error types for einsum parsing, planning and execution.

use thiserror::Error;

use crate::dtype::{CastingPolicy, ScalarKind};

/// Errors that can occur during einsum parsing and execution.
///
/// Every variant is a deterministic function of the call's inputs. Nothing is
/// retried and no output buffer is touched once one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EinsumError {
    /// A character that is neither a letter, a space nor part of an ellipsis.
    #[error("invalid subscript '{character}' in einstein sum subscripts string, subscripts must be letters")]
    InvalidSubscript { character: char },

    /// A '.' that is not part of exactly one '...' in a segment.
    #[error("einstein sum subscripts string contains a '.' that is not part of an ellipsis ('...') in {segment}")]
    MalformedEllipsis { segment: Segment },

    /// More labels than the operand has axes.
    #[error("einstein sum subscripts string contains too many subscripts for operand {operand}")]
    TooManySubscripts { operand: usize },

    /// Unlabelled axes without an ellipsis to absorb them.
    #[error("{segment} has more dimensions than subscripts given in einstein sum, but no '...' ellipsis provided to broadcast the extra dimensions")]
    MissingEllipsis { segment: Segment },

    /// Operand count does not match the comma-separated segments.
    #[error("einstein sum subscripts string specifies {} operands ({specified}) than were provided ({provided})", fewer_or_more(.specified, .provided))]
    OperandCountMismatch { specified: usize, provided: usize },

    /// A '-' that is not followed by '>'.
    #[error("einstein sum subscripts string does not contain proper '->' output specified")]
    MissingOutputArrow,

    /// An output label given more than once.
    #[error("einstein sum subscripts string includes output subscript '{label}' multiple times")]
    RepeatedOutputLabel { label: char },

    /// An output label that no input carries.
    #[error("einstein sum subscripts string included output subscript '{label}' which never appeared in an input")]
    OutputLabelNotInInputs { label: char },

    /// Repeated label on one operand whose axes differ in size.
    #[error("dimensions in operand {operand} for collapsing index '{label}' don't match ({first} != {second})")]
    CollapsedDimensionMismatch {
        operand: usize,
        label: char,
        first: usize,
        second: usize,
    },

    /// A label whose axis sizes disagree across operands.
    #[error("shape mismatch for label '{label}' in operand {operand}: expected {expected}, got {got}")]
    ShapeMismatch {
        label: char,
        operand: usize,
        expected: usize,
        got: usize,
    },

    /// Ellipsis (broadcast) dimensions that cannot be broadcast together.
    #[error("operand {operand} could not be broadcast: broadcast dimension {axis} has size {got}, expected {expected}")]
    BroadcastMismatch {
        operand: usize,
        axis: usize,
        expected: usize,
        got: usize,
    },

    /// A caller-supplied output whose shape is not the computed one.
    #[error("output array has shape {got:?}, einstein sum produces {expected:?}")]
    OutputShapeMismatch { expected: Vec<usize>, got: Vec<usize> },

    /// Operand count at or over the limit.
    #[error("too many operands provided to einstein sum function ({count}, maximum is {max})")]
    TooManyOperands { count: usize, max: usize },

    /// No operands at all.
    #[error("not enough operands provided to einstein sum function")]
    NoOperands,

    /// Operand or iteration rank at or over the limit.
    #[error("rank {rank} is at or over the maximum of {max} dimensions")]
    RankTooLarge { rank: usize, max: usize },

    /// Element type without a sum-of-products kernel for this request.
    #[error("unsupported element type {kind:?}: {message}")]
    UnsupportedType { kind: ScalarKind, message: String },

    /// Requested type not reachable under the casting policy.
    #[error("cannot cast from {from:?} to {to:?} under casting rule {casting:?}")]
    CastingNotAllowed {
        from: ScalarKind,
        to: ScalarKind,
        casting: CastingPolicy,
    },

    /// An execution block whose strides reach past a borrowed buffer.
    #[error("invalid execution block: {message}")]
    InvalidBlock { message: String },

    /// Tensor construction or shape computation error.
    #[error("shape error: {message}")]
    ShapeError { message: String },
}

/// Which part of the subscripts string an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Operand(usize),
    Output,
}

impl core::fmt::Display for Segment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Segment::Operand(index) => write!(f, "operand {}", index),
            Segment::Output => write!(f, "output"),
        }
    }
}

fn fewer_or_more(specified: &usize, provided: &usize) -> &'static str {
    if specified < provided { "fewer" } else { "more" }
}

impl EinsumError {
    pub fn unsupported(kind: ScalarKind, message: impl Into<String>) -> Self {
        Self::UnsupportedType {
            kind,
            message: message.into(),
        }
    }

    pub fn block(message: impl Into<String>) -> Self {
        Self::InvalidBlock {
            message: message.into(),
        }
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::ShapeError {
            message: message.into(),
        }
    }

    /// Returns true for malformed subscripts strings.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSubscript { .. }
                | Self::MalformedEllipsis { .. }
                | Self::TooManySubscripts { .. }
                | Self::MissingEllipsis { .. }
                | Self::OperandCountMismatch { .. }
                | Self::MissingOutputArrow
                | Self::RepeatedOutputLabel { .. }
                | Self::OutputLabelNotInInputs { .. }
        )
    }

    /// Returns true for size disagreements between operands or the output.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::CollapsedDimensionMismatch { .. }
                | Self::ShapeMismatch { .. }
                | Self::BroadcastMismatch { .. }
                | Self::OutputShapeMismatch { .. }
                | Self::ShapeError { .. }
        )
    }
}

/// Result type for einsum operations.
pub type EinsumResult<T> = core::result::Result<T, EinsumError>;
