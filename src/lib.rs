//! # Einsum Sum-of-Products
//!
//! Einstein summation over strided N-dimensional arrays on the CPU.
//!
//! ## Features
//!
//! - Full subscript grammar: ellipsis broadcasting, implicit output, repeated
//!   labels as diagonals
//! - Axis planning with NumPy broadcasting rules
//! - Kernel selection per stride pattern (sum, dot, scalar-broadcast,
//!   element-wise, general strided)
//! - Vector-lane accumulation with a fixed reduction order, AVX on x86_64
//! - Views instead of copies for pure permutations and diagonals
//!
//! ## Example
//!
//! ```
//! use einsum_sumprod::{Tensor, einsum};
//!
//! let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
//!
//! // Trace
//! let trace = einsum("ii", &[&a], None, None).unwrap();
//! assert_eq!(trace.to_vec(), vec![5.0]);
//!
//! // Transpose, returned as a view
//! let t = einsum("ij->ji", &[&a], None, None).unwrap();
//! assert!(t.shares_storage(&a));
//! assert_eq!(t.to_vec(), vec![1.0, 3.0, 2.0, 4.0]);
//! ```

pub mod dtype;
pub mod error;
pub mod kernels;
pub mod launch;
pub mod notation;
pub mod pattern;
pub mod plan;
pub mod tensor;

pub use dtype::{CastingPolicy, MemoryOrder, ScalarKind};
pub use error::{EinsumError, EinsumResult};
pub use kernels::{Element, ExecutionBlock, SimdMode};
pub use launch::{EinsumConfig, einsum, einsum_as, einsum_with_notation};
pub use notation::{EinsumNotation, parse_einsum};
pub use pattern::{FastPath, PatternMatcher, select_kernel};
pub use plan::AxisPlan;
pub use tensor::Tensor;
