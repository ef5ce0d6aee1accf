//! Alignment of operand axes onto one iteration space.

use hashbrown::HashMap;
use smallvec::SmallVec;

use super::collapse::{AxisKey, collapse_operand};
use crate::error::{EinsumError, EinsumResult};
use crate::notation::{AxisLabel, EinsumNotation, MAX_DIMS};

/// One axis of the iteration space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanAxis {
    pub key: AxisKey,
    pub size: usize,
    /// Summed axes are absent from the output.
    pub summed: bool,
}

/// Resolved sizes and per-operand strides for every iteration axis.
///
/// Iteration axes are the output axes in output order followed by the
/// summed labels in ascending code order. An operand that does not carry an
/// axis, or carries it with size 1, walks it with stride 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisPlan {
    axes: SmallVec<[PlanAxis; 8]>,
    operand_strides: SmallVec<[SmallVec<[usize; 8]>; 4]>,
    output_rank: usize,
}

impl AxisPlan {
    /// Builds the axis plan from compiled subscripts and operand layouts.
    ///
    /// `shapes[i]` and `strides[i]` (element strides) describe operand `i`.
    pub fn new(
        notation: &EinsumNotation,
        shapes: &[&[usize]],
        strides: &[&[usize]],
    ) -> EinsumResult<Self> {
        let nop = notation.num_operands();
        if shapes.len() != nop || strides.len() != nop {
            return Err(EinsumError::OperandCountMismatch {
                specified: nop,
                provided: shapes.len(),
            });
        }

        let output_rank = notation.output_rank();
        let mut axes: SmallVec<[PlanAxis; 8]> = SmallVec::new();
        let mut broadcast_slot = 0;
        for (index, entry) in notation.iteration_labels().into_iter().enumerate() {
            let key = match entry {
                AxisLabel::Label(label) => AxisKey::Label(label),
                _ => {
                    broadcast_slot += 1;
                    AxisKey::Broadcast(broadcast_slot - 1)
                }
            };
            axes.push(PlanAxis {
                key,
                size: 1,
                summed: index >= output_rank,
            });
        }

        if axes.len() >= MAX_DIMS {
            return Err(EinsumError::RankTooLarge {
                rank: axes.len(),
                max: MAX_DIMS,
            });
        }

        let index_of: HashMap<AxisKey, usize> = axes
            .iter()
            .enumerate()
            .map(|(index, axis)| (axis.key, index))
            .collect();

        let mut operand_strides = SmallVec::with_capacity(nop);
        for (operand, labels) in notation.operands().iter().enumerate() {
            let collapsed = collapse_operand(
                labels,
                shapes[operand],
                strides[operand],
                operand,
                notation.ndim_broadcast(),
            )?;

            let mut op_strides: SmallVec<[usize; 8]> = SmallVec::from_elem(0, axes.len());
            for entry in &collapsed {
                let index = *index_of.get(&entry.key).ok_or_else(|| {
                    EinsumError::shape(format!(
                        "operand {} axis {:?} is missing from the iteration space",
                        operand, entry.key
                    ))
                })?;
                let axis = &mut axes[index];
                if entry.size != 1 {
                    if axis.size == 1 {
                        axis.size = entry.size;
                    } else if axis.size != entry.size {
                        return Err(mismatch(entry.key, operand, axis.size, entry.size));
                    }
                    op_strides[index] = entry.stride;
                }
            }
            operand_strides.push(op_strides);
        }

        let plan = Self {
            axes,
            operand_strides,
            output_rank,
        };
        tracing::debug!(
            iteration_shape = ?plan.iteration_shape(),
            output_shape = ?plan.output_shape(),
            "resolved axis plan"
        );
        Ok(plan)
    }

    #[inline]
    pub fn axes(&self) -> &[PlanAxis] {
        &self.axes
    }

    #[inline]
    pub fn num_axes(&self) -> usize {
        self.axes.len()
    }

    #[inline]
    pub fn output_rank(&self) -> usize {
        self.output_rank
    }

    pub fn iteration_shape(&self) -> SmallVec<[usize; 8]> {
        self.axes.iter().map(|axis| axis.size).collect()
    }

    pub fn output_shape(&self) -> Vec<usize> {
        self.axes[..self.output_rank]
            .iter()
            .map(|axis| axis.size)
            .collect()
    }

    /// Element strides of operand `operand`, one per iteration axis.
    #[inline]
    pub fn operand_strides(&self, operand: usize) -> &[usize] {
        &self.operand_strides[operand]
    }

    /// Output element strides extended with zeros over the summed axes.
    pub fn output_strides(&self, output: &[usize]) -> SmallVec<[usize; 8]> {
        let mut strides: SmallVec<[usize; 8]> = output.iter().copied().collect();
        strides.resize(self.axes.len(), 0);
        strides
    }

    pub fn has_summation(&self) -> bool {
        self.axes.len() > self.output_rank
    }

    /// Returns true if some iteration axis is empty, so nothing is accumulated.
    pub fn is_empty(&self) -> bool {
        self.axes.iter().any(|axis| axis.size == 0)
    }
}

fn mismatch(key: AxisKey, operand: usize, expected: usize, got: usize) -> EinsumError {
    match key {
        AxisKey::Label(label) => EinsumError::ShapeMismatch {
            label: label.as_char(),
            operand,
            expected,
            got,
        },
        AxisKey::Broadcast(axis) => EinsumError::BroadcastMismatch {
            operand,
            axis,
            expected,
            got,
        },
    }
}
