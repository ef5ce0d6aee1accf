//! Einsum subscript compiler.
//!
//! Supports the full einsum grammar:
//! - Basic: `ij,jk->ik`
//! - Ellipsis: `...ij,...jk->...ik`
//! - Implicit output: `ij,jk` (implies `->ik`)
//! - Repeated labels: `ii->i` (diagonal), `ii` (trace)

mod label;
mod notation;
mod parser;

pub use label::{AxisLabel, LABEL_TABLE_SIZE, Label, LabelCounts, OperandLabels};
pub use notation::EinsumNotation;
pub use parser::{
    MAX_DIMS, MAX_OPERANDS, parse_einsum, parse_operand_subscripts, parse_output_subscripts,
};
