//! Per-operand diagonal collapsing.
//!
//! A repeated label on one operand selects the diagonal along those axes.
//! Walking the diagonal advances every merged axis at once, so the merged
//! axis keeps the size of its axes and the sum of their strides.

use smallvec::SmallVec;

use crate::error::{EinsumError, EinsumResult};
use crate::notation::{AxisLabel, Label, OperandLabels};

/// What a collapsed operand axis is keyed by in the iteration space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisKey {
    Label(Label),
    /// Slot in the output's broadcast block, after right-alignment.
    Broadcast(usize),
}

/// One operand axis after diagonal collapsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapsedAxis {
    pub key: AxisKey,
    pub size: usize,
    pub stride: usize,
}

/// Collapses repeated labels of operand `operand` into single axes.
///
/// Broadcast axes are right-aligned against a block of `ndim_broadcast` slots.
pub fn collapse_operand(
    labels: &OperandLabels,
    shape: &[usize],
    strides: &[usize],
    operand: usize,
    ndim_broadcast: usize,
) -> EinsumResult<SmallVec<[CollapsedAxis; 8]>> {
    if labels.len() != shape.len() || shape.len() != strides.len() {
        return Err(EinsumError::shape(format!(
            "operand {} has rank {} but its label plan covers {} axes",
            operand,
            shape.len(),
            labels.len()
        )));
    }

    let first_broadcast_slot = ndim_broadcast - labels.broadcast_count();
    let mut collapsed: SmallVec<[CollapsedAxis; 8]> = SmallVec::new();
    // Original axis -> index into `collapsed`.
    let mut position: SmallVec<[usize; 8]> = SmallVec::with_capacity(shape.len());
    let mut broadcast_seen = 0;

    for (axis, entry) in labels.iter().enumerate() {
        let (size, stride) = (shape[axis], strides[axis]);
        match *entry {
            AxisLabel::Label(label) => {
                position.push(collapsed.len());
                collapsed.push(CollapsedAxis {
                    key: AxisKey::Label(label),
                    size,
                    stride,
                });
            }
            AxisLabel::Broadcast => {
                position.push(collapsed.len());
                collapsed.push(CollapsedAxis {
                    key: AxisKey::Broadcast(first_broadcast_slot + broadcast_seen),
                    size,
                    stride,
                });
                broadcast_seen += 1;
            }
            AxisLabel::Repeat { offset } => {
                let target = position[axis - offset];
                position.push(target);
                let merged = &mut collapsed[target];
                if merged.size != size {
                    let label = labels.resolve(axis).map_or('?', Label::as_char);
                    return Err(EinsumError::CollapsedDimensionMismatch {
                        operand,
                        label,
                        first: merged.size,
                        second: size,
                    });
                }
                merged.stride += stride;
            }
        }
    }

    Ok(collapsed)
}
