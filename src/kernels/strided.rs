//! General multiply-accumulate over arbitrary strides and operand counts.

use super::block::ExecutionBlock;
use super::element::Element;
use super::accumulate;

#[inline]
fn product<T: Element>(inputs: &[&[T]], strides: &[usize], i: usize) -> T::Acc {
    let mut product = inputs[0][i * strides[0]].to_acc();
    for (input, &stride) in inputs[1..].iter().zip(&strides[1..]) {
        product = T::mul(product, input[i * stride].to_acc());
    }
    product
}

/// `out[i * so] += Π in_op[i * s_op]`, left to right over `i`.
///
/// With output stride 0 the products are summed first and added once.
pub fn strided<T: Element>(block: &mut ExecutionBlock<'_, T>) {
    let count = block.count();
    if count == 0 {
        return;
    }
    let (inputs, strides, output) = block.parts();
    let nop = inputs.len();
    let out_stride = strides[nop];

    if out_stride == 0 {
        let mut total = T::zero();
        for i in 0..count {
            total = T::add(total, product(inputs, strides, i));
        }
        accumulate(&mut output[0], total);
    } else {
        for i in 0..count {
            accumulate(&mut output[i * out_stride], product(inputs, strides, i));
        }
    }
}
