//! Dot product kernel.
//!
//! Computes `out[0] += Σ a[i] * b[i]` for two contiguous operands, as in
//! `i,i->` or the inner loop of `ij,ij->`.

use super::block::ExecutionBlock;
use super::element::Element;
use super::{accumulate, simd};

pub fn dot_contig_outstride0<T: Element, const VECTOR: bool>(block: &mut ExecutionBlock<'_, T>) {
    let count = block.count();
    if count == 0 {
        return;
    }
    let (inputs, _, output) = block.parts();
    let (a, b) = (&inputs[0][..count], &inputs[1][..count]);

    let total = if VECTOR {
        T::vector_dot(a, b).unwrap_or_else(|| simd::lane_dot(a, b))
    } else {
        simd::scalar_dot(a, b)
    };
    accumulate(&mut output[0], total);
}
