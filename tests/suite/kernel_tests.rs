//! Sum-of-products kernel tests.

use approx::assert_relative_eq;
use einsum_sumprod::kernels::simd::{lane_dot, lane_sum, scalar_sum};
use einsum_sumprod::kernels::{
    ExecutionBlock, SimdMode, contig_outcontig, get_sum_of_products_function, scalar_times_contig,
    strided,
};
use einsum_sumprod::pattern::FastPath;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_kernels_accumulate_into_output() {
    let a = vec![1.0f32, 2.0, 3.0];
    let b = vec![2.0f32, 2.0, 2.0];
    let mut out = vec![10.0f32, 20.0, 30.0];

    {
        let mut block =
            ExecutionBlock::new(&[a.as_slice(), b.as_slice()], &mut out, &[1, 1, 1], 3).unwrap();
        contig_outcontig(&mut block);
    }

    assert_eq!(out, vec![12.0, 24.0, 36.0]);
}

#[test]
fn test_scalar_times_contig_broadcasts_scalar() {
    let scalar = vec![3i32];
    let values = vec![1i32, 2, 3, 4];
    let mut out = vec![0i32; 4];

    {
        let mut block =
            ExecutionBlock::new(&[scalar.as_slice(), values.as_slice()], &mut out, &[0, 1, 1], 4)
                .unwrap();
        scalar_times_contig::<i32, 0>(&mut block);
    }

    assert_eq!(out, vec![3, 6, 9, 12]);
}

#[test]
fn test_strided_walks_arbitrary_strides() {
    // Column 1 of a 3x3 row-major matrix times every other element of b.
    let a: Vec<f64> = (0..9).map(|v| v as f64).collect();
    let b = vec![1.0, -1.0, 2.0, -1.0, 3.0];
    let mut out = vec![0.5];

    {
        let mut block =
            ExecutionBlock::new(&[&a[1..], b.as_slice()], &mut out, &[3, 2, 0], 3).unwrap();
        strided(&mut block);
    }

    assert_eq!(out[0], 0.5 + 1.0 * 1.0 + 4.0 * 2.0 + 7.0 * 3.0);
}

#[test]
fn test_block_rejects_short_buffers() {
    let a = vec![1.0f64; 4];
    let mut out = vec![0.0f64];
    assert!(ExecutionBlock::new(&[a.as_slice()], &mut out, &[2, 0], 3).is_err());
}

#[test]
fn test_empty_block_is_noop() {
    let a: Vec<f64> = Vec::new();
    let mut out = vec![7.0f64];

    let (path, kernel) =
        get_sum_of_products_function::<f64>(1, &[8, 0], SimdMode::Auto).unwrap();
    assert_eq!(path, FastPath::SumContig);

    {
        let mut block = ExecutionBlock::new(&[a.as_slice()], &mut out, &[1, 0], 0).unwrap();
        kernel(&mut block);
    }
    assert_eq!(out[0], 7.0);
}

#[test]
fn test_vector_and_scalar_modes_agree() {
    let mut rng = StdRng::seed_from_u64(9);
    let data: Vec<f32> = (0..517).map(|_| rng.gen_range(-1.0..1.0)).collect();

    let mut results = Vec::new();
    for mode in [SimdMode::Auto, SimdMode::Disable] {
        let mut out = vec![0.0f32];
        let (_, kernel) = get_sum_of_products_function::<f32>(1, &[4, 0], mode).unwrap();
        {
            let mut block =
                ExecutionBlock::new(&[data.as_slice()], &mut out, &[1, 0], data.len()).unwrap();
            kernel(&mut block);
        }
        results.push(out[0]);
    }

    assert_relative_eq!(results[0], results[1], epsilon = 1e-4);
    assert_relative_eq!(results[1], scalar_sum(&data), epsilon = 1e-6);
}

#[test]
fn test_lane_reduction_order_is_fixed() {
    let data: Vec<f64> = (0..37).map(|v| 1.0 / (v as f64 + 1.0)).collect();
    let first = lane_sum(&data);
    let second = lane_sum(&data);
    assert_eq!(first.to_bits(), second.to_bits());

    let ones = vec![1.0f64; 37];
    assert_eq!(lane_dot(&data, &ones).to_bits(), first.to_bits());
}
