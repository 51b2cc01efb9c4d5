//! Chip implementations
//!
//! - FP-add chip: one floating-point addition per row, constraints taken
//!   from the compiled adder network
//! - Constraint checker: evaluates any chip on concrete rows

pub mod check;
pub mod fp_add;

pub use check::ConstraintCheckBuilder;
pub use fp_add::{FpAddChip, FpAddIo};
