//! Einsum execution engine.
//!
//! Orchestrates subscript compilation, axis planning, kernel selection and
//! the outer loop that feeds one execution block per outer index.

use num_traits::AsPrimitive;
use smallvec::SmallVec;

use super::config::EinsumConfig;
use crate::dtype::MemoryOrder;
use crate::error::{EinsumError, EinsumResult};
use crate::kernels::{Element, ExecutionBlock, get_sum_of_products_function};
use crate::notation::{EinsumNotation, parse_einsum};
use crate::pattern::{FastPath, select_kernel};
use crate::plan::AxisPlan;
use crate::tensor::{Tensor, next_index};

/// Evaluates an Einstein summation.
///
/// # Arguments
/// * `subscripts` - Einsum notation string (e.g., "ij,jk->ik")
/// * `operands` - Input tensors, one per comma-separated segment
/// * `out` - Optional output tensor; its contents are overwritten
/// * `config` - Optional configuration
///
/// Returns the result tensor (a handle on `out` when one is supplied). When
/// `config.allow_view` is set, a single operand with nothing summed comes
/// back as a view on the operand's storage.
///
/// # Example
///
/// ```
/// use einsum_sumprod::{Tensor, einsum};
///
/// let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
/// let b = Tensor::from_vec(vec![5.0, 6.0, 7.0, 8.0], &[2, 2]).unwrap();
/// let c = einsum("ij,jk->ik", &[&a, &b], None, None).unwrap();
/// assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
/// ```
#[tracing::instrument(level = "debug", skip_all, fields(subscripts = %subscripts, nop = operands.len()))]
pub fn einsum<T: Element>(
    subscripts: &str,
    operands: &[&Tensor<T>],
    out: Option<&Tensor<T>>,
    config: Option<EinsumConfig>,
) -> EinsumResult<Tensor<T>> {
    let config = config.unwrap_or_default();
    let ndims: SmallVec<[usize; 4]> = operands.iter().map(|op| op.ndim()).collect();
    let notation = parse_einsum(subscripts, &ndims)?;
    einsum_with_notation(&notation, operands, out, &config)
}

/// Evaluates an Einstein summation in element type `U`.
///
/// Operands are converted to `U` before any arithmetic, so accumulation
/// happens in `U`. The conversion must be allowed by `config.casting`.
///
/// # Example
///
/// ```
/// use einsum_sumprod::{Tensor, einsum_as};
///
/// let a = Tensor::from_vec(vec![1i32, 2, 3], &[3]).unwrap();
/// let total = einsum_as::<i32, f64>("i->", &[&a], None, None).unwrap();
/// assert_eq!(total.to_vec(), vec![6.0]);
/// ```
pub fn einsum_as<T, U>(
    subscripts: &str,
    operands: &[&Tensor<T>],
    out: Option<&Tensor<U>>,
    config: Option<EinsumConfig>,
) -> EinsumResult<Tensor<U>>
where
    T: Element + AsPrimitive<U>,
    U: Element,
{
    let config = config.unwrap_or_default();
    if !T::KIND.can_cast(U::KIND, config.casting) {
        return Err(EinsumError::CastingNotAllowed {
            from: T::KIND,
            to: U::KIND,
            casting: config.casting,
        });
    }

    let converted: SmallVec<[Tensor<U>; 4]> =
        operands.iter().map(|op| op.map(|x| x.as_())).collect();
    let converted: SmallVec<[&Tensor<U>; 4]> = converted.iter().collect();
    tracing::debug!(from = T::KIND.name(), to = U::KIND.name(), "converted operands");

    let ndims: SmallVec<[usize; 4]> = converted.iter().map(|op| op.ndim()).collect();
    let notation = parse_einsum(subscripts, &ndims)?;
    einsum_with_notation(&notation, &converted, out, &config)
}

/// Evaluates pre-compiled subscripts.
///
/// Useful when the same subscripts are evaluated against many operands of
/// the same ranks.
pub fn einsum_with_notation<T: Element>(
    notation: &EinsumNotation,
    operands: &[&Tensor<T>],
    out: Option<&Tensor<T>>,
    config: &EinsumConfig,
) -> EinsumResult<Tensor<T>> {
    if operands.len() != notation.num_operands() {
        return Err(EinsumError::OperandCountMismatch {
            specified: notation.num_operands(),
            provided: operands.len(),
        });
    }

    // An operand sharing storage with `out` is read from a snapshot.
    let operands: SmallVec<[Tensor<T>; 4]> = operands
        .iter()
        .map(|&op| match out {
            Some(out) if out.shares_storage(op) => op.to_contiguous(),
            _ => op.clone(),
        })
        .collect();

    let shapes: SmallVec<[&[usize]; 4]> = operands.iter().map(|op| op.shape()).collect();
    let strides: SmallVec<[&[usize]; 4]> = operands.iter().map(|op| op.strides()).collect();
    let plan = AxisPlan::new(notation, &shapes, &strides)?;
    let output_shape = plan.output_shape();

    if config.allow_view && out.is_none() && notation.is_unary() && !plan.has_summation() {
        let operand = &operands[0];
        tracing::debug!(shape = ?output_shape, "returning view");
        return operand.view(
            &output_shape,
            &plan.operand_strides(0)[..plan.output_rank()],
            operand.offset(),
        );
    }

    let result = match out {
        Some(out) => {
            if out.shape() != output_shape.as_slice() {
                return Err(EinsumError::OutputShapeMismatch {
                    expected: output_shape,
                    got: out.shape().to_vec(),
                });
            }
            out.fill(T::from_acc(T::zero()));
            out.clone()
        }
        None => Tensor::zeros(&output_shape, resolve_order(config.order, &operands)),
    };

    if plan.is_empty() {
        return Ok(result);
    }

    sum_of_products(&plan, &operands, &result, config)?;
    Ok(result)
}

/// Column-major for `Native` only when every operand is purely column-contiguous.
fn resolve_order<T: Element>(order: MemoryOrder, operands: &[Tensor<T>]) -> MemoryOrder {
    match order {
        MemoryOrder::Native => {
            let column = operands
                .iter()
                .all(|op| op.is_column_contiguous() && !op.is_row_contiguous());
            if column {
                MemoryOrder::ColumnMajor
            } else {
                MemoryOrder::RowMajor
            }
        }
        order => order,
    }
}

/// Walks every outer index and runs the kernel over the inner axis.
fn sum_of_products<T: Element>(
    plan: &AxisPlan,
    operands: &[Tensor<T>],
    result: &Tensor<T>,
    config: &EinsumConfig,
) -> EinsumResult<()> {
    let nop = operands.len();
    let output_strides = plan.output_strides(result.strides());

    // A rank-0 space is one element.
    let inner = select_inner_axis::<T>(plan, nop, &output_strides);
    let count = inner.map_or(1, |axis| plan.axes()[axis].size);
    let inner_strides = axis_strides(plan, nop, &output_strides, inner);

    let outer: SmallVec<[usize; 8]> = (0..plan.num_axes())
        .filter(|&axis| Some(axis) != inner)
        .collect();
    let outer_shape: SmallVec<[usize; 8]> =
        outer.iter().map(|&axis| plan.axes()[axis].size).collect();
    let operand_outer: SmallVec<[SmallVec<[usize; 8]>; 4]> = (0..nop)
        .map(|operand| gather(plan.operand_strides(operand), &outer))
        .collect();
    let output_outer = gather(&output_strides, &outer);

    let itemsize = core::mem::size_of::<T>();
    let byte_strides: SmallVec<[usize; 5]> = inner_strides.iter().map(|&s| s * itemsize).collect();
    let (path, kernel) = get_sum_of_products_function::<T>(nop, &byte_strides, config.simd)
        .ok_or_else(|| EinsumError::unsupported(T::KIND, "no sum-of-products kernel"))?;
    tracing::debug!(
        kernel = path.name(),
        inner = ?inner,
        count,
        simd = ?config.simd,
        "selected kernel"
    );

    let guards: SmallVec<[_; 4]> = operands
        .iter()
        .map(|op| op.storage().read_recursive())
        .collect();
    let mut out_guard = result.storage().write();

    let mut index: SmallVec<[usize; 8]> = SmallVec::from_elem(0, outer_shape.len());
    loop {
        let mut inputs: SmallVec<[&[T]; 4]> = SmallVec::with_capacity(nop);
        for (operand, guard) in guards.iter().enumerate() {
            let offset =
                operands[operand].offset() + linear_offset(&index, &operand_outer[operand]);
            inputs.push(guard.get(offset..).ok_or_else(|| {
                EinsumError::block(format!("operand {} offset {} out of bounds", operand, offset))
            })?);
        }
        let out_offset = result.offset() + linear_offset(&index, &output_outer);
        let output = out_guard
            .get_mut(out_offset..)
            .ok_or_else(|| EinsumError::block(format!("output offset {} out of bounds", out_offset)))?;

        let mut block = ExecutionBlock::new(&inputs, output, &inner_strides, count)?;
        kernel(&mut block);

        if !next_index(&mut index, &outer_shape) {
            break;
        }
    }

    Ok(())
}

/// Picks the iteration axis handed to the kernel, following memory order.
///
/// A non-trivial axis beats a size-1 axis, then an axis some specialized
/// kernel accepts beats one that needs the strided loop. Ties go to the
/// later axis.
fn select_inner_axis<T: Element>(
    plan: &AxisPlan,
    nop: usize,
    output_strides: &[usize],
) -> Option<usize> {
    let itemsize = core::mem::size_of::<T>();
    (0..plan.num_axes()).max_by_key(|&axis| {
        let byte_strides: SmallVec<[usize; 5]> = axis_strides(plan, nop, output_strides, Some(axis))
            .iter()
            .map(|&s| s * itemsize)
            .collect();
        let specialized = select_kernel(nop, T::KIND, itemsize, &byte_strides)
            .is_some_and(|path| path != FastPath::Strided);
        (plan.axes()[axis].size > 1, specialized)
    })
}

/// Element strides along `axis` for every operand, then the output.
fn axis_strides(
    plan: &AxisPlan,
    nop: usize,
    output_strides: &[usize],
    axis: Option<usize>,
) -> SmallVec<[usize; 5]> {
    let mut strides: SmallVec<[usize; 5]> = SmallVec::with_capacity(nop + 1);
    for operand in 0..nop {
        strides.push(axis.map_or(0, |axis| plan.operand_strides(operand)[axis]));
    }
    strides.push(axis.map_or(0, |axis| output_strides[axis]));
    strides
}

fn gather(strides: &[usize], axes: &[usize]) -> SmallVec<[usize; 8]> {
    axes.iter().map(|&axis| strides[axis]).collect()
}

#[inline]
fn linear_offset(index: &[usize], strides: &[usize]) -> usize {
    index.iter().zip(strides).map(|(&i, &s)| i * s).sum()
}
