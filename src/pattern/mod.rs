//! Kernel selection from the stride pattern of one inner block.
//!
//! Recognizes, most specialized first:
//! - Plain sum of one contiguous operand
//! - Dot product of two contiguous operands
//! - Scalar times a contiguous operand (reduced or element-wise)
//! - Element-wise product into a contiguous output
//! - General strided multiply-accumulate

mod fast_path;

pub use fast_path::FastPath;

use crate::dtype::ScalarKind;

/// Chooses a kernel for a block of `nop` operands.
///
/// `byte_strides` holds one stride per operand plus a trailing output
/// stride. Returns `None` when `kind` has no kernel (or does not have
/// `itemsize` bytes per element); callers then need their own loop.
///
/// # Example
///
/// ```
/// use einsum_sumprod::dtype::ScalarKind;
/// use einsum_sumprod::pattern::{FastPath, select_kernel};
///
/// assert_eq!(select_kernel(2, ScalarKind::F32, 4, &[4, 4, 0]), Some(FastPath::DotContig));
/// assert_eq!(select_kernel(1, ScalarKind::Custom, 4, &[4, 0]), None);
/// ```
pub fn select_kernel(
    nop: usize,
    kind: ScalarKind,
    itemsize: usize,
    byte_strides: &[usize],
) -> Option<FastPath> {
    if nop == 0 || byte_strides.len() != nop + 1 {
        return None;
    }
    if !kind.has_kernel() || kind.size() != Some(itemsize) {
        return None;
    }

    let contiguous = |stride: usize| stride == itemsize;
    let inputs = &byte_strides[..nop];
    let out = byte_strides[nop];

    if nop == 1 && contiguous(inputs[0]) && out == 0 {
        return Some(FastPath::SumContig);
    }

    if nop == 2 {
        let scalar_operand = match (inputs[0], inputs[1]) {
            (0, s) if contiguous(s) => Some(0),
            (s, 0) if contiguous(s) => Some(1),
            _ => None,
        };
        if out == 0 {
            if contiguous(inputs[0]) && contiguous(inputs[1]) {
                return Some(FastPath::DotContig);
            }
            if let Some(scalar_operand) = scalar_operand {
                return Some(FastPath::ScalarDotContig { scalar_operand });
            }
        } else if contiguous(out) {
            if let Some(scalar_operand) = scalar_operand {
                return Some(FastPath::ScalarTimesContig { scalar_operand });
            }
        }
    }

    if contiguous(out) && inputs.iter().all(|&s| contiguous(s)) {
        return Some(FastPath::ContigOutContig);
    }

    Some(FastPath::Strided)
}

/// Kernel selector over operand layouts.
pub struct PatternMatcher;

impl PatternMatcher {
    /// Selects a kernel for element type `T` and element strides.
    pub fn recognize<T: crate::kernels::Element>(element_strides: &[usize]) -> Option<FastPath> {
        let itemsize = core::mem::size_of::<T>();
        let byte_strides: smallvec::SmallVec<[usize; 5]> =
            element_strides.iter().map(|&s| s * itemsize).collect();
        select_kernel(element_strides.len().saturating_sub(1), T::KIND, itemsize, &byte_strides)
    }
}
