//! Axis plan: reconciles the compiled subscripts with operand shapes.
//!
//! - Repeated labels on one operand collapse into a diagonal axis
//! - Broadcast axes are right-aligned and size-1 axes stretch
//! - Every label gets one validated size and a per-operand stride

mod axis_plan;
mod collapse;

pub use axis_plan::{AxisPlan, PlanAxis};
pub use collapse::{AxisKey, CollapsedAxis, collapse_operand};
