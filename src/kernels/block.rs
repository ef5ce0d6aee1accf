//! The unit of work handed to a sum-of-products kernel.

use smallvec::SmallVec;

use super::element::Element;
use crate::error::{EinsumError, EinsumResult};

/// Borrowed operand slices, element strides and an element count.
///
/// Element `i` of input `op` is `inputs[op][i * strides[op]]`, and of the
/// output `output[i * strides[nop]]`. Construction checks that every such
/// index is in bounds for `i < count`, so kernels index without surprises.
#[derive(Debug)]
pub struct ExecutionBlock<'a, T> {
    inputs: SmallVec<[&'a [T]; 4]>,
    output: &'a mut [T],
    strides: SmallVec<[usize; 5]>,
    count: usize,
}

impl<'a, T: Element> ExecutionBlock<'a, T> {
    /// `strides` holds one element stride per input plus a trailing one for the output.
    pub fn new(
        inputs: &[&'a [T]],
        output: &'a mut [T],
        strides: &[usize],
        count: usize,
    ) -> EinsumResult<Self> {
        if inputs.is_empty() {
            return Err(EinsumError::block("at least one input is required"));
        }
        if strides.len() != inputs.len() + 1 {
            return Err(EinsumError::block(format!(
                "{} strides given for {} inputs and one output",
                strides.len(),
                inputs.len()
            )));
        }

        if count > 0 {
            let lengths = inputs.iter().map(|s| s.len()).chain(core::iter::once(output.len()));
            for (index, (len, &stride)) in lengths.zip(strides.iter()).enumerate() {
                let last = (count - 1).checked_mul(stride);
                if last.is_none_or(|last| last >= len) {
                    return Err(EinsumError::block(format!(
                        "buffer {} with {} elements cannot hold {} elements at stride {}",
                        index, len, count, stride
                    )));
                }
            }
        }

        Ok(Self {
            inputs: inputs.iter().copied().collect(),
            output,
            strides: strides.iter().copied().collect(),
            count,
        })
    }

    #[inline]
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn input(&self, operand: usize) -> &'a [T] {
        self.inputs[operand]
    }

    /// Element strides, the output's last.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn output_stride(&self) -> usize {
        self.strides[self.inputs.len()]
    }

    /// Byte strides, as seen by the kernel selector.
    pub fn byte_strides(&self) -> SmallVec<[usize; 5]> {
        self.strides
            .iter()
            .map(|&s| s * core::mem::size_of::<T>())
            .collect()
    }

    /// Splits into inputs, strides and the output for a kernel.
    #[inline]
    pub fn parts(&mut self) -> (&[&'a [T]], &[usize], &mut [T]) {
        (self.inputs.as_slice(), self.strides.as_slice(), &mut *self.output)
    }
}
