//! Plain reduction of one contiguous operand into a scalar output.
//!
//! `ij->i`, `i->`: no products, only the sum.

use super::block::ExecutionBlock;
use super::element::Element;
use super::{accumulate, simd};

/// `out[0] += Σ in[i]`, with lane accumulation when `VECTOR` is set.
pub fn sum_contig_outstride0<T: Element, const VECTOR: bool>(block: &mut ExecutionBlock<'_, T>) {
    let count = block.count();
    if count == 0 {
        return;
    }
    let (inputs, _, output) = block.parts();
    let data = &inputs[0][..count];

    let total = if VECTOR {
        T::vector_sum(data).unwrap_or_else(|| simd::lane_sum(data))
    } else {
        simd::scalar_sum(data)
    };
    accumulate(&mut output[0], total);
}
