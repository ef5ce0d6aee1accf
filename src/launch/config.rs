//! Configuration for einsum operations.

use serde::{Deserialize, Serialize};

use crate::dtype::{CastingPolicy, MemoryOrder};
use crate::kernels::SimdMode;

/// Configuration options for einsum execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EinsumConfig {
    /// Layout of a newly allocated output.
    pub order: MemoryOrder,
    /// Which operand conversions [`einsum_as`](super::einsum_as) may perform.
    pub casting: CastingPolicy,
    /// Whether reductions may use vector lanes.
    pub simd: SimdMode,
    /// Whether a single-operand call without summation may return a view.
    pub allow_view: bool,
}

impl Default for EinsumConfig {
    fn default() -> Self {
        Self {
            order: MemoryOrder::Native,
            casting: CastingPolicy::Safe,
            simd: SimdMode::from_env(),
            allow_view: true,
        }
    }
}

impl EinsumConfig {
    /// Creates a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: MemoryOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_casting(mut self, casting: CastingPolicy) -> Self {
        self.casting = casting;
        self
    }

    /// Enables or disables vector-lane reductions.
    pub fn with_simd(mut self, simd: SimdMode) -> Self {
        self.simd = simd;
        self
    }

    /// Enables or disables returning views.
    pub fn with_view(mut self, enabled: bool) -> Self {
        self.allow_view = enabled;
        self
    }

    /// Vector lanes on, views allowed.
    pub fn fast() -> Self {
        Self {
            simd: SimdMode::Auto,
            allow_view: true,
            ..Self::default()
        }
    }

    /// Sequential accumulation and always a fresh, row-major result.
    pub fn reproducible() -> Self {
        Self {
            order: MemoryOrder::RowMajor,
            simd: SimdMode::Disable,
            allow_view: false,
            ..Self::default()
        }
    }
}
