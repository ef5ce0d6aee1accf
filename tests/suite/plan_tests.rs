//! Axis planning tests.

use einsum_sumprod::EinsumError;
use einsum_sumprod::notation::{Label, parse_einsum};
use einsum_sumprod::plan::{AxisKey, AxisPlan};
use einsum_sumprod::tensor::row_major_strides;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn plan(subscripts: &str, shapes: &[&[usize]]) -> Result<AxisPlan, EinsumError> {
    let ndims: Vec<usize> = shapes.iter().map(|s| s.len()).collect();
    let notation = parse_einsum(subscripts, &ndims)?;
    let strides: Vec<Vec<usize>> = shapes.iter().map(|s| row_major_strides(s)).collect();
    let strides: Vec<&[usize]> = strides.iter().map(|s| s.as_slice()).collect();
    AxisPlan::new(&notation, shapes, &strides)
}

#[test]
fn test_outer_product_axes() {
    let plan = plan("i,j->ij", &[&[3], &[4]]).unwrap();
    assert_eq!(plan.output_shape(), vec![3, 4]);
    assert!(!plan.has_summation());
    assert_eq!(plan.operand_strides(0), &[1, 0]);
    assert_eq!(plan.operand_strides(1), &[0, 1]);
}

#[test]
fn test_summed_axes_follow_output() {
    let plan = plan("ijk,jl->il", &[&[2, 3, 4], &[3, 5]]).unwrap();
    assert_eq!(plan.output_rank(), 2);
    assert_eq!(plan.iteration_shape().as_slice(), &[2, 5, 3, 4]);
    assert!(plan.axes()[..2].iter().all(|axis| !axis.summed));
    assert!(plan.axes()[2..].iter().all(|axis| axis.summed));
}

#[test]
fn test_diagonal_strides_add() {
    let plan = plan("ii->i", &[&[3, 3]]).unwrap();
    assert_eq!(plan.operand_strides(0), &[4]);
    assert_eq!(plan.axes()[0].key, AxisKey::Label(Label::new('i').unwrap()));
}

#[test]
fn test_collapsed_dimension_mismatch() {
    let err = plan("ii->i", &[&[2, 3]]).unwrap_err();
    assert!(matches!(
        err,
        EinsumError::CollapsedDimensionMismatch { operand: 0, label: 'i', .. }
    ));
}

#[test]
fn test_label_size_one_stretches() {
    let plan = plan("ij,ij->ij", &[&[1, 3], &[2, 3]]).unwrap();
    assert_eq!(plan.output_shape(), vec![2, 3]);
    assert_eq!(plan.operand_strides(0), &[0, 1]);
}

#[test]
fn test_label_conflict() {
    let err = plan("ij,ik", &[&[2, 3], &[4, 3]]).unwrap_err();
    assert!(matches!(
        err,
        EinsumError::ShapeMismatch { label: 'i', operand: 1, expected: 2, got: 4 }
    ));
}

#[test]
fn test_broadcast_conflict() {
    let err = plan("...,...", &[&[2, 3], &[2, 4]]).unwrap_err();
    assert!(matches!(err, EinsumError::BroadcastMismatch { .. }));
}

#[test]
fn test_zero_sized_axis() {
    let plan = plan("ij->i", &[&[3, 0]]).unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.output_shape(), vec![3]);
}

proptest! {
    #[test]
    fn test_iteration_space_covers_output(m in 1usize..6, k in 1usize..6, n in 1usize..6) {
        let plan = plan("ij,jk->ik", &[&[m, k], &[k, n]]).unwrap();
        prop_assert_eq!(plan.output_shape(), vec![m, n]);
        prop_assert_eq!(plan.iteration_shape().iter().product::<usize>(), m * k * n);
        let out_strides = plan.output_strides(&[n, 1]);
        prop_assert_eq!(out_strides.as_slice(), &[n, 1, 0]);
    }
}
