//! Complete einsum notation representation.

use core::fmt;

use smallvec::SmallVec;

use super::label::{AxisLabel, Label, LabelCounts, OperandLabels};

/// Compiled einsum subscripts.
///
/// Holds the per-operand label plans, the label occurrence counts, the
/// number of broadcast dimensions and the output labels. Every field is a
/// pure function of the subscripts string and the operand ranks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EinsumNotation {
    operands: SmallVec<[OperandLabels; 4]>,
    counts: LabelCounts,
    ndim_broadcast: usize,
    output: SmallVec<[AxisLabel; 8]>,
    explicit_output: bool,
    original: Option<String>,
}

impl EinsumNotation {
    pub(crate) fn new(
        operands: SmallVec<[OperandLabels; 4]>,
        counts: LabelCounts,
        ndim_broadcast: usize,
        output: SmallVec<[AxisLabel; 8]>,
        explicit_output: bool,
    ) -> Self {
        Self {
            operands,
            counts,
            ndim_broadcast,
            output,
            explicit_output,
            original: None,
        }
    }

    /// Sets the original subscripts string.
    pub fn with_original(mut self, original: impl Into<String>) -> Self {
        self.original = Some(original.into());
        self
    }

    /// Returns the original subscripts string, if recorded.
    #[inline]
    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    #[inline]
    pub fn num_operands(&self) -> usize {
        self.operands.len()
    }

    /// Label plans, one per input operand.
    #[inline]
    pub fn operands(&self) -> &[OperandLabels] {
        &self.operands
    }

    #[inline]
    pub fn label_counts(&self) -> &LabelCounts {
        &self.counts
    }

    /// Largest number of broadcast axes on any operand.
    #[inline]
    pub fn ndim_broadcast(&self) -> usize {
        self.ndim_broadcast
    }

    /// Output labels, broadcast slots included.
    #[inline]
    pub fn output_labels(&self) -> &[AxisLabel] {
        &self.output
    }

    #[inline]
    pub fn output_rank(&self) -> usize {
        self.output.len()
    }

    /// Returns true if the subscripts carried an explicit `->`.
    #[inline]
    pub fn has_explicit_output(&self) -> bool {
        self.explicit_output
    }

    /// Returns true if the output carries `label`.
    pub fn output_contains(&self, label: Label) -> bool {
        self.output.contains(&AxisLabel::Label(label))
    }

    /// Labels that occur in some input but not in the output, ascending by code.
    pub fn summed_labels(&self) -> SmallVec<[Label; 8]> {
        self.counts
            .labels()
            .filter(|&label| !self.output_contains(label))
            .collect()
    }

    /// The iteration space: output axes first, then summed labels.
    pub fn iteration_labels(&self) -> SmallVec<[AxisLabel; 8]> {
        let mut labels = self.output.clone();
        labels.extend(self.summed_labels().into_iter().map(AxisLabel::Label));
        labels
    }

    /// Returns true if any label is reduced away.
    pub fn has_summation(&self) -> bool {
        self.counts.labels().any(|label| !self.output_contains(label))
    }

    #[inline]
    pub fn is_unary(&self) -> bool {
        self.operands.len() == 1
    }

    #[inline]
    pub fn is_binary(&self) -> bool {
        self.operands.len() == 2
    }

    /// Output labels as a string, `_` standing for each broadcast axis.
    pub fn output_string(&self) -> String {
        self.output
            .iter()
            .map(|axis| axis.label().map_or('_', Label::as_char))
            .collect()
    }
}

impl fmt::Display for EinsumNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", operand)?;
        }
        write!(f, "->{}", self.output_string())
    }
}
