//! Launch module for einsum operations.
//!
//! Provides the high-level API for evaluating einsum expressions on
//! strided tensors.

mod config;
mod executor;

pub use config::EinsumConfig;
pub use executor::{einsum, einsum_as, einsum_with_notation};
