//! End-to-end einsum tests against naive reference loops.

use approx::assert_relative_eq;
use einsum_sumprod::{
    CastingPolicy, EinsumConfig, EinsumError, MemoryOrder, SimdMode, Tensor, einsum, einsum_as,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_tensor(rng: &mut StdRng, shape: &[usize]) -> Tensor<f64> {
    let len: usize = shape.iter().product();
    let data = (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Tensor::from_vec(data, shape).unwrap()
}

fn arange(shape: &[usize]) -> Tensor<f64> {
    let len: usize = shape.iter().product();
    Tensor::from_vec((0..len).map(|v| v as f64).collect(), shape).unwrap()
}

#[test]
fn test_matmul_matches_naive_loop() {
    let mut rng = StdRng::seed_from_u64(7);
    let (m, k, n) = (5, 7, 3);
    let a = random_tensor(&mut rng, &[m, k]);
    let b = random_tensor(&mut rng, &[k, n]);

    let c = einsum("ij,jk->ik", &[&a, &b], None, None).unwrap();
    assert_eq!(c.shape(), &[m, n]);

    for i in 0..m {
        for j in 0..n {
            let expected: f64 = (0..k)
                .map(|p| a.get(&[i, p]).unwrap() * b.get(&[p, j]).unwrap())
                .sum();
            assert_relative_eq!(c.get(&[i, j]).unwrap(), expected, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_batched_matmul_matches_naive_loop() {
    let mut rng = StdRng::seed_from_u64(11);
    let a = random_tensor(&mut rng, &[2, 3, 4]);
    let b = random_tensor(&mut rng, &[2, 4, 5]);

    let c = einsum("bij,bjk->bik", &[&a, &b], None, None).unwrap();
    assert_eq!(c.shape(), &[2, 3, 5]);

    for batch in 0..2 {
        for i in 0..3 {
            for j in 0..5 {
                let expected: f64 = (0..4)
                    .map(|p| a.get(&[batch, i, p]).unwrap() * b.get(&[batch, p, j]).unwrap())
                    .sum();
                assert_relative_eq!(c.get(&[batch, i, j]).unwrap(), expected, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn test_diagonal_and_trace() {
    let a = arange(&[3, 3]);

    let diag = einsum("ii->i", &[&a], None, None).unwrap();
    assert_eq!(diag.to_vec(), vec![0.0, 4.0, 8.0]);

    let trace = einsum("ii", &[&a], None, None).unwrap();
    assert_eq!(trace.shape(), &[] as &[usize]);
    assert_eq!(trace.to_vec(), vec![12.0]);
}

#[test]
fn test_ellipsis_diagonal_explicit() {
    let a = arange(&[4, 5, 4]);
    let result = einsum("i...i->...i", &[&a], None, None).unwrap();
    assert_eq!(result.shape(), &[5, 4]);

    for i in 0..4 {
        for j in 0..5 {
            assert_eq!(result.get(&[j, i]), a.get(&[i, j, i]));
        }
    }
}

#[test]
fn test_ellipsis_diagonal_implicit_sums() {
    let a = arange(&[4, 5, 4]);
    let result = einsum("i...i", &[&a], None, None).unwrap();
    assert_eq!(result.shape(), &[5]);

    for j in 0..5 {
        let expected: f64 = (0..4).map(|i| a.get(&[i, j, i]).unwrap()).sum();
        assert_eq!(result.get(&[j]).unwrap(), expected);
    }
}

#[test]
fn test_sum_leading_axis_under_ellipsis() {
    let a = arange(&[3, 2, 2]);
    let result = einsum("i...->...", &[&a], None, None).unwrap();
    assert_eq!(result.shape(), &[2, 2]);
    assert_eq!(result.to_vec(), vec![12.0, 15.0, 18.0, 21.0]);
}

#[test]
fn test_broadcast_size_one_axis() {
    let a = arange(&[2, 1]);
    let b = arange(&[1, 3]);
    let result = einsum("...,...->...", &[&a, &b], None, None).unwrap();
    assert_eq!(result.shape(), &[2, 3]);
    assert_eq!(result.to_vec(), vec![0.0, 0.0, 0.0, 0.0, 1.0, 2.0]);
}

#[test]
fn test_three_operand_chain() {
    let mut rng = StdRng::seed_from_u64(3);
    let a = random_tensor(&mut rng, &[2, 3]);
    let b = random_tensor(&mut rng, &[3, 4]);
    let c = random_tensor(&mut rng, &[4, 2]);

    let chained = einsum("ij,jk,kl->il", &[&a, &b, &c], None, None).unwrap();
    let ab = einsum("ij,jk->ik", &[&a, &b], None, None).unwrap();
    let stepwise = einsum("ik,kl->il", &[&ab, &c], None, None).unwrap();

    for (x, y) in chained.to_vec().iter().zip(stepwise.to_vec()) {
        assert_relative_eq!(*x, y, epsilon = 1e-12);
    }
}

#[test]
fn test_integer_operands_wrap() {
    let a = Tensor::from_vec(vec![100i8, 100], &[2]).unwrap();
    let result = einsum("i->", &[&a], None, None).unwrap();
    assert_eq!(result.to_vec(), vec![100i8.wrapping_add(100)]);
}

#[test]
fn test_bool_operands_are_logical() {
    let a = Tensor::from_vec(vec![true, false, true], &[3]).unwrap();
    let b = Tensor::from_vec(vec![false, false, true], &[3]).unwrap();
    let any = einsum("i,i->", &[&a, &b], None, None).unwrap();
    assert_eq!(any.to_vec(), vec![true]);
}

#[test]
fn test_simd_matches_scalar_within_tolerance() {
    let mut rng = StdRng::seed_from_u64(42);
    let a = random_tensor(&mut rng, &[1027]);
    let b = random_tensor(&mut rng, &[1027]);

    let simd = einsum("i,i->", &[&a, &b], None, Some(EinsumConfig::new().with_simd(SimdMode::Auto)))
        .unwrap();
    let scalar = einsum(
        "i,i->",
        &[&a, &b],
        None,
        Some(EinsumConfig::new().with_simd(SimdMode::Disable)),
    )
    .unwrap();

    assert_relative_eq!(simd.to_vec()[0], scalar.to_vec()[0], epsilon = 1e-10);
}

#[test]
fn test_scalar_mode_is_left_to_right() {
    let values = vec![1e16, 1.0, -1e16, 1.0];
    let a = Tensor::from_vec(values.clone(), &[4]).unwrap();
    let result = einsum("i->", &[&a], None, Some(EinsumConfig::reproducible())).unwrap();

    let expected = values.iter().fold(0.0f64, |acc, v| acc + v);
    assert_eq!(result.to_vec()[0].to_bits(), expected.to_bits());
}

#[test]
fn test_view_mutation_visible_through_operand() {
    let a = arange(&[2, 3]);
    let t = einsum("ij->ji", &[&a], None, None).unwrap();
    assert!(t.shares_storage(&a));
    assert_eq!(t.shape(), &[3, 2]);

    t.set(&[2, 1], -1.0).unwrap();
    assert_eq!(a.get(&[1, 2]), Some(-1.0));
}

#[test]
fn test_diagonal_view_shares_storage() {
    let a = arange(&[3, 3]);
    let diag = einsum("ii->i", &[&a], None, None).unwrap();
    assert!(diag.shares_storage(&a));
    assert_eq!(diag.strides(), &[4]);
}

#[test]
fn test_no_view_when_summing_or_out_given() {
    let a = arange(&[2, 3]);

    let summed = einsum("ij->i", &[&a], None, None).unwrap();
    assert!(!summed.shares_storage(&a));

    let out = Tensor::<f64>::zeros(&[3, 2], MemoryOrder::RowMajor);
    let t = einsum("ij->ji", &[&a], Some(&out), None).unwrap();
    assert!(!t.shares_storage(&a));
    assert!(t.shares_storage(&out));
    assert_eq!(out.to_vec(), vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);

    let copied = einsum("ij->ji", &[&a], None, Some(EinsumConfig::new().with_view(false))).unwrap();
    assert!(!copied.shares_storage(&a));
}

#[test]
fn test_column_major_output_order() {
    let a = arange(&[2, 3]);
    let config = EinsumConfig::new().with_order(MemoryOrder::ColumnMajor).with_view(false);
    let result = einsum("ij->ij", &[&a], None, Some(config)).unwrap();
    assert!(result.is_column_contiguous());
    assert_eq!(result.to_vec(), a.to_vec());
}

#[test]
fn test_operand_count_error_message() {
    let a = arange(&[2]);
    let err = einsum("ab,c", &[&a, &a, &a], None, None).unwrap_err();
    assert!(matches!(
        err,
        EinsumError::OperandCountMismatch { specified: 2, provided: 3 }
    ));
    assert!(err.to_string().contains("fewer operands"));
}

#[test]
fn test_syntax_and_shape_errors() {
    let a = arange(&[2, 2]);
    let b = arange(&[3, 2]);

    let err = einsum("..->", &[&a], None, None).unwrap_err();
    assert!(matches!(err, EinsumError::MalformedEllipsis { .. }));
    assert!(err.is_syntax_error());

    let err = einsum("ijk", &[&a], None, None).unwrap_err();
    assert!(matches!(err, EinsumError::TooManySubscripts { operand: 0 }));

    let err = einsum("ij,ik", &[&b, &a], None, None).unwrap_err();
    assert!(matches!(err, EinsumError::ShapeMismatch { .. }));
    assert!(err.is_shape_error());
}

#[test]
fn test_output_shape_mismatch_leaves_out_untouched() {
    let a = arange(&[2, 2]);
    let out = Tensor::full(&[3], 9.0, MemoryOrder::RowMajor);
    let err = einsum("ii->i", &[&a], Some(&out), None).unwrap_err();
    assert!(matches!(err, EinsumError::OutputShapeMismatch { .. }));
    assert_eq!(out.to_vec(), vec![9.0; 3]);
}

#[test]
fn test_matmul_layouts_agree() {
    let mut rng = StdRng::seed_from_u64(21);
    let a = random_tensor(&mut rng, &[6, 5]);
    let b = random_tensor(&mut rng, &[5, 4]);
    let a_col = Tensor::from_vec_with_order(
        column_major_data(&a),
        &[6, 5],
        MemoryOrder::ColumnMajor,
    )
    .unwrap();
    let b_col = Tensor::from_vec_with_order(
        column_major_data(&b),
        &[5, 4],
        MemoryOrder::ColumnMajor,
    )
    .unwrap();

    let row = einsum("ij,jk->ik", &[&a, &b], None, None).unwrap();
    let col = einsum("ij,jk->ik", &[&a_col, &b_col], None, None).unwrap();
    assert!(col.is_column_contiguous());
    for (x, y) in row.to_vec().iter().zip(col.to_vec()) {
        assert_relative_eq!(*x, y, epsilon = 1e-12);
    }
}

fn column_major_data(t: &Tensor<f64>) -> Vec<f64> {
    let (rows, cols) = (t.shape()[0], t.shape()[1]);
    (0..cols)
        .flat_map(|j| (0..rows).map(move |i| (i, j)))
        .map(|(i, j)| t.get(&[i, j]).unwrap())
        .collect()
}

#[test]
fn test_einsum_as_accumulates_in_target_type() {
    let a = Tensor::from_vec(vec![200u8, 200, 200], &[3]).unwrap();
    let wrapped = einsum("i->", &[&a], None, None).unwrap();
    assert_eq!(wrapped.to_vec(), vec![600u32 as u8]);

    let widened = einsum_as::<u8, u64>("i->", &[&a], None, None).unwrap();
    assert_eq!(widened.to_vec(), vec![600]);

    let err = einsum_as::<u8, i8>("i->", &[&a], None, None).unwrap_err();
    assert!(matches!(
        err,
        EinsumError::CastingNotAllowed { casting: CastingPolicy::Safe, .. }
    ));
}
