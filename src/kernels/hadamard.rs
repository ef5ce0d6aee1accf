//! Element-wise product of contiguous operands into a contiguous output.
//!
//! Covers `ij,ij->ij` and, with one operand, a plain copy-accumulate.

use super::block::ExecutionBlock;
use super::element::Element;
use super::accumulate;

/// `out[i] += Π in_op[i]` over any number of contiguous operands.
pub fn contig_outcontig<T: Element>(block: &mut ExecutionBlock<'_, T>) {
    let count = block.count();
    let (inputs, _, output) = block.parts();

    for (i, slot) in output[..count].iter_mut().enumerate() {
        let mut product = inputs[0][i].to_acc();
        for input in &inputs[1..] {
            product = T::mul(product, input[i].to_acc());
        }
        accumulate(slot, product);
    }
}
