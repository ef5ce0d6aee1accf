//! AVX lane accumulation for `f32` and `f64`.
//!
//! One vector register holds the lanes, so lane `k` sees elements
//! `k, k + W, k + 2W, ...` exactly like the portable path, and the lanes are
//! reduced with the same pairwise order.

use std::arch::x86_64::*;

use super::{LANES_F32, LANES_F64, is_aligned, reduce_lanes};

const VECTOR_BYTES: usize = 32;

#[target_feature(enable = "avx")]
pub unsafe fn sum_f64(data: &[f64]) -> f64 {
    let len = data.len();
    let body = len - len % LANES_F64;
    let ptr = data.as_ptr();
    let aligned = is_aligned(ptr, VECTOR_BYTES);

    let mut acc = _mm256_setzero_pd();
    let mut index = 0usize;
    while index < body {
        // SAFETY: index + LANES_F64 <= body <= len.
        let vec = unsafe {
            if aligned {
                _mm256_load_pd(ptr.add(index))
            } else {
                _mm256_loadu_pd(ptr.add(index))
            }
        };
        acc = _mm256_add_pd(acc, vec);
        index += LANES_F64;
    }

    let mut lanes = [0.0f64; LANES_F64];
    // SAFETY: `lanes` holds exactly one register.
    unsafe { _mm256_storeu_pd(lanes.as_mut_ptr(), acc) };
    let mut total = reduce_lanes::<f64>(&mut lanes);
    for &x in &data[body..] {
        total += x;
    }
    total
}

#[target_feature(enable = "avx")]
pub unsafe fn dot_f64(a: &[f64], b: &[f64]) -> f64 {
    let len = a.len().min(b.len());
    let body = len - len % LANES_F64;
    let (pa, pb) = (a.as_ptr(), b.as_ptr());
    let aligned = is_aligned(pa, VECTOR_BYTES) && is_aligned(pb, VECTOR_BYTES);

    let mut acc = _mm256_setzero_pd();
    let mut index = 0usize;
    while index < body {
        // SAFETY: index + LANES_F64 <= body <= len of both slices.
        let (va, vb) = unsafe {
            if aligned {
                (_mm256_load_pd(pa.add(index)), _mm256_load_pd(pb.add(index)))
            } else {
                (_mm256_loadu_pd(pa.add(index)), _mm256_loadu_pd(pb.add(index)))
            }
        };
        // Separate multiply and add: a fused op would round differently.
        acc = _mm256_add_pd(acc, _mm256_mul_pd(va, vb));
        index += LANES_F64;
    }

    let mut lanes = [0.0f64; LANES_F64];
    // SAFETY: `lanes` holds exactly one register.
    unsafe { _mm256_storeu_pd(lanes.as_mut_ptr(), acc) };
    let mut total = reduce_lanes::<f64>(&mut lanes);
    for (&x, &y) in a[body..len].iter().zip(&b[body..len]) {
        total += x * y;
    }
    total
}

#[target_feature(enable = "avx")]
pub unsafe fn sum_f32(data: &[f32]) -> f32 {
    let len = data.len();
    let body = len - len % LANES_F32;
    let ptr = data.as_ptr();
    let aligned = is_aligned(ptr, VECTOR_BYTES);

    let mut acc = _mm256_setzero_ps();
    let mut index = 0usize;
    while index < body {
        // SAFETY: index + LANES_F32 <= body <= len.
        let vec = unsafe {
            if aligned {
                _mm256_load_ps(ptr.add(index))
            } else {
                _mm256_loadu_ps(ptr.add(index))
            }
        };
        acc = _mm256_add_ps(acc, vec);
        index += LANES_F32;
    }

    let mut lanes = [0.0f32; LANES_F32];
    // SAFETY: `lanes` holds exactly one register.
    unsafe { _mm256_storeu_ps(lanes.as_mut_ptr(), acc) };
    let mut total = reduce_lanes::<f32>(&mut lanes);
    for &x in &data[body..] {
        total += x;
    }
    total
}

#[target_feature(enable = "avx")]
pub unsafe fn dot_f32(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    let body = len - len % LANES_F32;
    let (pa, pb) = (a.as_ptr(), b.as_ptr());
    let aligned = is_aligned(pa, VECTOR_BYTES) && is_aligned(pb, VECTOR_BYTES);

    let mut acc = _mm256_setzero_ps();
    let mut index = 0usize;
    while index < body {
        // SAFETY: index + LANES_F32 <= body <= len of both slices.
        let (va, vb) = unsafe {
            if aligned {
                (_mm256_load_ps(pa.add(index)), _mm256_load_ps(pb.add(index)))
            } else {
                (_mm256_loadu_ps(pa.add(index)), _mm256_loadu_ps(pb.add(index)))
            }
        };
        acc = _mm256_add_ps(acc, _mm256_mul_ps(va, vb));
        index += LANES_F32;
    }

    let mut lanes = [0.0f32; LANES_F32];
    // SAFETY: `lanes` holds exactly one register.
    unsafe { _mm256_storeu_ps(lanes.as_mut_ptr(), acc) };
    let mut total = reduce_lanes::<f32>(&mut lanes);
    for (&x, &y) in a[body..len].iter().zip(&b[body..len]) {
        total += x * y;
    }
    total
}
