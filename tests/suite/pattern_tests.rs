//! Kernel selection tests.

use einsum_sumprod::dtype::ScalarKind;
use einsum_sumprod::kernels::get_sum_of_products_function;
use einsum_sumprod::pattern::{FastPath, PatternMatcher, select_kernel};
use einsum_sumprod::SimdMode;
use half::f16;
use num_complex::Complex64;

#[test]
fn test_recognize_plain_sum() {
    assert_eq!(PatternMatcher::recognize::<f32>(&[1, 0]), Some(FastPath::SumContig));
    assert_eq!(PatternMatcher::recognize::<f32>(&[2, 0]), Some(FastPath::Strided));
}

#[test]
fn test_recognize_dot_product() {
    assert_eq!(PatternMatcher::recognize::<f64>(&[1, 1, 0]), Some(FastPath::DotContig));
    assert_eq!(
        PatternMatcher::recognize::<f64>(&[1, 0, 0]),
        Some(FastPath::ScalarDotContig { scalar_operand: 1 })
    );
}

#[test]
fn test_recognize_scalar_times_contig() {
    assert_eq!(
        PatternMatcher::recognize::<i64>(&[0, 1, 1]),
        Some(FastPath::ScalarTimesContig { scalar_operand: 0 })
    );
    assert_eq!(
        PatternMatcher::recognize::<i64>(&[1, 0, 1]),
        Some(FastPath::ScalarTimesContig { scalar_operand: 1 })
    );
}

#[test]
fn test_recognize_elementwise() {
    assert_eq!(PatternMatcher::recognize::<f16>(&[1, 1, 1]), Some(FastPath::ContigOutContig));
    assert_eq!(
        PatternMatcher::recognize::<f16>(&[1, 1, 1, 1]),
        Some(FastPath::ContigOutContig)
    );
}

#[test]
fn test_three_operand_reduction_is_strided() {
    assert_eq!(PatternMatcher::recognize::<f32>(&[1, 1, 1, 0]), Some(FastPath::Strided));
}

#[test]
fn test_complex_selects_kernels() {
    assert_eq!(
        PatternMatcher::recognize::<Complex64>(&[1, 1, 0]),
        Some(FastPath::DotContig)
    );
}

#[test]
fn test_unsupported_kind_has_no_kernel() {
    assert_eq!(select_kernel(2, ScalarKind::Custom, 8, &[8, 8, 0]), None);
    assert_eq!(select_kernel(1, ScalarKind::F64, 4, &[4, 0]), None);
    assert_eq!(select_kernel(2, ScalarKind::F64, 8, &[8, 0]), None);
}

#[test]
fn test_selected_function_matches_path() {
    let (path, _) = get_sum_of_products_function::<f32>(2, &[4, 4, 0], SimdMode::Disable).unwrap();
    assert_eq!(path, FastPath::DotContig);
    assert!(path.reduces());
    assert_eq!(path.to_string(), path.name());
}
