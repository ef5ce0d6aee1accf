//! Vector-lane accumulation.
//!
//! Lane paths accumulate element `i` of the vectorizable prefix into lane
//! `i % W`, reduce the lanes pairwise (`lanes[k] += lanes[k + W/2]`, halving
//! the width until one lane is left), then add the scalar tail left to right.
//! The hardware paths in `x86` keep that exact order, so on a given input they
//! agree with the portable path bit for bit. Against the strictly sequential
//! scalar path they differ only by rounding.

pub mod cpu;
#[cfg(target_arch = "x86_64")]
mod x86;

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::element::Element;

pub const LANES_F64: usize = 4;
pub const LANES_F32: usize = 8;

/// Upper bound on [`Element::LANES`] across all element types.
pub const MAX_LANES: usize = 16;

/// Whether vector-lane kernels may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimdMode {
    /// Lane accumulation, with hardware vectors when the CPU has them.
    #[default]
    Auto,
    /// Strictly sequential scalar accumulation.
    Disable,
}

static ENV_MODE: OnceLock<SimdMode> = OnceLock::new();

impl SimdMode {
    /// Environment variable consulted by [`SimdMode::from_env`].
    pub const ENV_VAR: &'static str = "EINSUM_SIMD";

    pub fn is_disabled(self) -> bool {
        matches!(self, SimdMode::Disable)
    }

    /// Mode requested through `EINSUM_SIMD`, read once per process.
    pub fn from_env() -> Self {
        *ENV_MODE.get_or_init(|| {
            let mode = Self::parse(std::env::var(Self::ENV_VAR).ok().as_deref());
            tracing::trace!(?mode, capabilities = %cpu::capabilities(), "resolved simd mode");
            mode
        })
    }

    /// `0`, `off`, `false`, `disable` and `scalar` disable lanes; anything else is `Auto`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "0" | "off" | "false" | "disable" | "scalar") => {
                SimdMode::Disable
            }
            _ => SimdMode::Auto,
        }
    }
}

#[inline]
pub fn is_aligned<T>(ptr: *const T, align: usize) -> bool {
    (ptr as usize) % align == 0
}

/// Pairwise lane reduction. `lanes.len()` must be a power of two.
#[inline]
pub fn reduce_lanes<T: Element>(lanes: &mut [T::Acc]) -> T::Acc {
    let mut width = lanes.len();
    while width > 1 {
        let half = width / 2;
        for k in 0..half {
            lanes[k] = T::add(lanes[k], lanes[k + half]);
        }
        width = half;
    }
    lanes.first().copied().unwrap_or_else(T::zero)
}

/// Lane sum of `data`.
pub fn lane_sum<T: Element>(data: &[T]) -> T::Acc {
    let width = T::LANES;
    let body = data.len() - data.len() % width;
    let mut lanes = [T::zero(); MAX_LANES];

    for chunk in data[..body].chunks_exact(width) {
        for (lane, &x) in lanes.iter_mut().zip(chunk) {
            *lane = T::add(*lane, x.to_acc());
        }
    }

    let mut total = reduce_lanes::<T>(&mut lanes[..width]);
    for &x in &data[body..] {
        total = T::add(total, x.to_acc());
    }
    total
}

/// Lane dot product of two equal-length slices.
pub fn lane_dot<T: Element>(a: &[T], b: &[T]) -> T::Acc {
    let width = T::LANES;
    let len = a.len().min(b.len());
    let body = len - len % width;
    let mut lanes = [T::zero(); MAX_LANES];

    for (ca, cb) in a[..body].chunks_exact(width).zip(b[..body].chunks_exact(width)) {
        for ((lane, &x), &y) in lanes.iter_mut().zip(ca).zip(cb) {
            *lane = T::add(*lane, T::mul(x.to_acc(), y.to_acc()));
        }
    }

    let mut total = reduce_lanes::<T>(&mut lanes[..width]);
    for (&x, &y) in a[body..len].iter().zip(&b[body..len]) {
        total = T::add(total, T::mul(x.to_acc(), y.to_acc()));
    }
    total
}

/// Strictly sequential sum.
pub fn scalar_sum<T: Element>(data: &[T]) -> T::Acc {
    data.iter().fold(T::zero(), |acc, &x| T::add(acc, x.to_acc()))
}

/// Strictly sequential dot product.
pub fn scalar_dot<T: Element>(a: &[T], b: &[T]) -> T::Acc {
    a.iter()
        .zip(b)
        .fold(T::zero(), |acc, (&x, &y)| T::add(acc, T::mul(x.to_acc(), y.to_acc())))
}

#[cfg(target_arch = "x86_64")]
pub fn sum_f64(data: &[f64]) -> Option<f64> {
    if cpu::capabilities().avx {
        // SAFETY: AVX support was detected at runtime.
        return Some(unsafe { x86::sum_f64(data) });
    }
    None
}

#[cfg(target_arch = "x86_64")]
pub fn dot_f64(a: &[f64], b: &[f64]) -> Option<f64> {
    if cpu::capabilities().avx {
        // SAFETY: AVX support was detected at runtime.
        return Some(unsafe { x86::dot_f64(a, b) });
    }
    None
}

#[cfg(target_arch = "x86_64")]
pub fn sum_f32(data: &[f32]) -> Option<f32> {
    if cpu::capabilities().avx {
        // SAFETY: AVX support was detected at runtime.
        return Some(unsafe { x86::sum_f32(data) });
    }
    None
}

#[cfg(target_arch = "x86_64")]
pub fn dot_f32(a: &[f32], b: &[f32]) -> Option<f32> {
    if cpu::capabilities().avx {
        // SAFETY: AVX support was detected at runtime.
        return Some(unsafe { x86::dot_f32(a, b) });
    }
    None
}

#[cfg(not(target_arch = "x86_64"))]
pub fn sum_f64(data: &[f64]) -> Option<f64> {
    let _ = data;
    None
}

#[cfg(not(target_arch = "x86_64"))]
pub fn dot_f64(a: &[f64], b: &[f64]) -> Option<f64> {
    let _ = (a, b);
    None
}

#[cfg(not(target_arch = "x86_64"))]
pub fn sum_f32(data: &[f32]) -> Option<f32> {
    let _ = data;
    None
}

#[cfg(not(target_arch = "x86_64"))]
pub fn dot_f32(a: &[f32], b: &[f32]) -> Option<f32> {
    let _ = (a, b);
    None
}
