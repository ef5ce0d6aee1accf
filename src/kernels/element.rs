//! Element capability trait for the sum-of-products kernels.

use core::fmt::Debug;

use half::f16;
use num_complex::Complex;

use super::simd;
use crate::dtype::ScalarKind;

/// A numeric type the kernels can accumulate.
///
/// Products and sums run in `Acc`, which is `Self` except for `f16` (widened
/// to `f32`, narrowed once per output write). Integer arithmetic wraps. For
/// `bool` the sum is OR and the product is AND.
pub trait Element: Copy + Default + Debug + Send + Sync + 'static {
    /// Runtime tag of this type.
    const KIND: ScalarKind;

    /// Independent accumulator lanes on vector paths. Always a power of two.
    const LANES: usize;

    /// Alignment in bytes that allows aligned vector loads.
    const VECTOR_ALIGN: usize = core::mem::size_of::<Self>() * Self::LANES;

    type Acc: Copy + Debug;

    fn zero() -> Self::Acc;

    fn one() -> Self::Acc;

    fn to_acc(self) -> Self::Acc;

    fn from_acc(acc: Self::Acc) -> Self;

    fn add(a: Self::Acc, b: Self::Acc) -> Self::Acc;

    fn mul(a: Self::Acc, b: Self::Acc) -> Self::Acc;

    /// Hardware lane sum of `data`.
    ///
    /// Implementations must match the portable lane order bit for bit;
    /// `None` means no hardware path on this CPU.
    #[inline]
    fn vector_sum(data: &[Self]) -> Option<Self::Acc> {
        let _ = data;
        None
    }

    /// Hardware lane dot product of two equal-length slices.
    #[inline]
    fn vector_dot(a: &[Self], b: &[Self]) -> Option<Self::Acc> {
        let _ = (a, b);
        None
    }
}

macro_rules! impl_element_int {
    ($($ty:ty => $kind:ident, $lanes:expr;)*) => {
        $(
            impl Element for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;
                const LANES: usize = $lanes;
                type Acc = $ty;

                #[inline]
                fn zero() -> $ty {
                    0
                }

                #[inline]
                fn one() -> $ty {
                    1
                }

                #[inline]
                fn to_acc(self) -> $ty {
                    self
                }

                #[inline]
                fn from_acc(acc: $ty) -> $ty {
                    acc
                }

                #[inline]
                fn add(a: $ty, b: $ty) -> $ty {
                    a.wrapping_add(b)
                }

                #[inline]
                fn mul(a: $ty, b: $ty) -> $ty {
                    a.wrapping_mul(b)
                }
            }
        )*
    };
}

impl_element_int! {
    i8 => I8, 16;
    i16 => I16, 16;
    i32 => I32, 8;
    i64 => I64, 4;
    u8 => U8, 16;
    u16 => U16, 16;
    u32 => U32, 8;
    u64 => U64, 4;
}

macro_rules! impl_element_complex {
    ($($real:ty => $kind:ident, $lanes:expr;)*) => {
        $(
            impl Element for Complex<$real> {
                const KIND: ScalarKind = ScalarKind::$kind;
                const LANES: usize = $lanes;
                type Acc = Complex<$real>;

                #[inline]
                fn zero() -> Self::Acc {
                    Complex::new(0.0, 0.0)
                }

                #[inline]
                fn one() -> Self::Acc {
                    Complex::new(1.0, 0.0)
                }

                #[inline]
                fn to_acc(self) -> Self::Acc {
                    self
                }

                #[inline]
                fn from_acc(acc: Self::Acc) -> Self {
                    acc
                }

                #[inline]
                fn add(a: Self::Acc, b: Self::Acc) -> Self::Acc {
                    a + b
                }

                #[inline]
                fn mul(a: Self::Acc, b: Self::Acc) -> Self::Acc {
                    a * b
                }
            }
        )*
    };
}

impl_element_complex! {
    f32 => Complex32, 4;
    f64 => Complex64, 2;
}

impl Element for bool {
    const KIND: ScalarKind = ScalarKind::Bool;
    const LANES: usize = 16;
    type Acc = bool;

    #[inline]
    fn zero() -> bool {
        false
    }

    #[inline]
    fn one() -> bool {
        true
    }

    #[inline]
    fn to_acc(self) -> bool {
        self
    }

    #[inline]
    fn from_acc(acc: bool) -> bool {
        acc
    }

    #[inline]
    fn add(a: bool, b: bool) -> bool {
        a || b
    }

    #[inline]
    fn mul(a: bool, b: bool) -> bool {
        a && b
    }
}

impl Element for f16 {
    const KIND: ScalarKind = ScalarKind::F16;
    const LANES: usize = 8;
    type Acc = f32;

    #[inline]
    fn zero() -> f32 {
        0.0
    }

    #[inline]
    fn one() -> f32 {
        1.0
    }

    #[inline]
    fn to_acc(self) -> f32 {
        self.to_f32()
    }

    #[inline]
    fn from_acc(acc: f32) -> f16 {
        f16::from_f32(acc)
    }

    #[inline]
    fn add(a: f32, b: f32) -> f32 {
        a + b
    }

    #[inline]
    fn mul(a: f32, b: f32) -> f32 {
        a * b
    }
}

impl Element for f32 {
    const KIND: ScalarKind = ScalarKind::F32;
    const LANES: usize = simd::LANES_F32;
    type Acc = f32;

    #[inline]
    fn zero() -> f32 {
        0.0
    }

    #[inline]
    fn one() -> f32 {
        1.0
    }

    #[inline]
    fn to_acc(self) -> f32 {
        self
    }

    #[inline]
    fn from_acc(acc: f32) -> f32 {
        acc
    }

    #[inline]
    fn add(a: f32, b: f32) -> f32 {
        a + b
    }

    #[inline]
    fn mul(a: f32, b: f32) -> f32 {
        a * b
    }

    #[inline]
    fn vector_sum(data: &[f32]) -> Option<f32> {
        simd::sum_f32(data)
    }

    #[inline]
    fn vector_dot(a: &[f32], b: &[f32]) -> Option<f32> {
        simd::dot_f32(a, b)
    }
}

impl Element for f64 {
    const KIND: ScalarKind = ScalarKind::F64;
    const LANES: usize = simd::LANES_F64;
    type Acc = f64;

    #[inline]
    fn zero() -> f64 {
        0.0
    }

    #[inline]
    fn one() -> f64 {
        1.0
    }

    #[inline]
    fn to_acc(self) -> f64 {
        self
    }

    #[inline]
    fn from_acc(acc: f64) -> f64 {
        acc
    }

    #[inline]
    fn add(a: f64, b: f64) -> f64 {
        a + b
    }

    #[inline]
    fn mul(a: f64, b: f64) -> f64 {
        a * b
    }

    #[inline]
    fn vector_sum(data: &[f64]) -> Option<f64> {
        simd::sum_f64(data)
    }

    #[inline]
    fn vector_dot(a: &[f64], b: &[f64]) -> Option<f64> {
        simd::dot_f64(a, b)
    }
}
