//! Sum-of-products kernels.
//!
//! Every kernel consumes one [`ExecutionBlock`] and adds `Σ Π operand[i]`
//! into the output, never overwriting it:
//! - Plain sum of one contiguous operand (`sum`)
//! - Dot product of two contiguous operands (`dot_product`)
//! - Scalar times contiguous, with or without reduction (`broadcast_multiply`)
//! - Element-wise product into a contiguous output (`hadamard`)
//! - General strided multiply-accumulate (`strided`)

mod block;
mod broadcast_multiply;
mod dot_product;
mod element;
mod hadamard;
pub mod simd;
mod strided;
mod sum;

pub use block::ExecutionBlock;
pub use broadcast_multiply::{scalar_dot_contig, scalar_times_contig};
pub use dot_product::dot_contig_outstride0;
pub use element::Element;
pub use hadamard::contig_outcontig;
pub use simd::SimdMode;
pub use strided::strided;
pub use sum::sum_contig_outstride0;

use crate::pattern::{FastPath, select_kernel};

/// A monomorphized inner loop.
pub type SumOfProductsFn<T> = fn(&mut ExecutionBlock<'_, T>);

/// `*slot = acc + *slot`, narrowed back to the element type once.
#[inline]
pub(crate) fn accumulate<T: Element>(slot: &mut T, acc: T::Acc) {
    *slot = T::from_acc(T::add(acc, slot.to_acc()));
}

/// Resolves a selected kernel variant to the inner loop for `T`.
///
/// With [`SimdMode::Disable`] every reduction adds strictly left to right.
pub fn sum_of_products_fn<T: Element>(path: FastPath, mode: SimdMode) -> SumOfProductsFn<T> {
    let vector = !mode.is_disabled();
    match (path, vector) {
        (FastPath::SumContig, true) => sum_contig_outstride0::<T, true>,
        (FastPath::SumContig, false) => sum_contig_outstride0::<T, false>,
        (FastPath::DotContig, true) => dot_contig_outstride0::<T, true>,
        (FastPath::DotContig, false) => dot_contig_outstride0::<T, false>,
        (FastPath::ScalarDotContig { scalar_operand: 0 }, true) => {
            scalar_dot_contig::<T, 0, true>
        }
        (FastPath::ScalarDotContig { scalar_operand: 0 }, false) => {
            scalar_dot_contig::<T, 0, false>
        }
        (FastPath::ScalarDotContig { .. }, true) => scalar_dot_contig::<T, 1, true>,
        (FastPath::ScalarDotContig { .. }, false) => scalar_dot_contig::<T, 1, false>,
        (FastPath::ScalarTimesContig { scalar_operand: 0 }, _) => scalar_times_contig::<T, 0>,
        (FastPath::ScalarTimesContig { .. }, _) => scalar_times_contig::<T, 1>,
        (FastPath::ContigOutContig, _) => contig_outcontig::<T>,
        (FastPath::Strided, _) => strided::<T>,
    }
}

/// Selects and resolves the inner loop for `nop` operands of type `T`.
///
/// `byte_strides` carries one stride per operand and a trailing output stride.
pub fn get_sum_of_products_function<T: Element>(
    nop: usize,
    byte_strides: &[usize],
    mode: SimdMode,
) -> Option<(FastPath, SumOfProductsFn<T>)> {
    let path = select_kernel(nop, T::KIND, core::mem::size_of::<T>(), byte_strides)?;
    Some((path, sum_of_products_fn::<T>(path, mode)))
}
