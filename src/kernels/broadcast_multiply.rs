//! Kernels for two operands where one is a fixed scalar (stride 0).
//!
//! The scalar is read once per block instead of once per element.

use super::block::ExecutionBlock;
use super::element::Element;
use super::{accumulate, simd};

/// `out[i] += s * x[i]` with operand `SCALAR` fixed and the other contiguous.
pub fn scalar_times_contig<T: Element, const SCALAR: usize>(block: &mut ExecutionBlock<'_, T>) {
    let count = block.count();
    if count == 0 {
        return;
    }
    let (inputs, _, output) = block.parts();
    let scalar = inputs[SCALAR][0].to_acc();
    let data = &inputs[1 - SCALAR][..count];

    for (slot, &x) in output[..count].iter_mut().zip(data) {
        let product = if SCALAR == 0 {
            T::mul(scalar, x.to_acc())
        } else {
            T::mul(x.to_acc(), scalar)
        };
        accumulate(slot, product);
    }
}

/// `out[0] += s * Σ x[i]` with operand `SCALAR` fixed and the other contiguous.
pub fn scalar_dot_contig<T: Element, const SCALAR: usize, const VECTOR: bool>(
    block: &mut ExecutionBlock<'_, T>,
) {
    let count = block.count();
    if count == 0 {
        return;
    }
    let (inputs, _, output) = block.parts();
    let scalar = inputs[SCALAR][0].to_acc();
    let data = &inputs[1 - SCALAR][..count];

    let sum = if VECTOR {
        T::vector_sum(data).unwrap_or_else(|| simd::lane_sum(data))
    } else {
        simd::scalar_sum(data)
    };
    let total = if SCALAR == 0 {
        T::mul(scalar, sum)
    } else {
        T::mul(sum, scalar)
    };
    accumulate(&mut output[0], total);
}
