//! Reusable constraint gadgets
//!
//! Every gadget appends its hints and constraints to a [`CircuitBuilder`]
//! and returns the variables or linear combinations carrying its result.
//! Boolean results are field elements constrained to `{0, 1}`.
//!
//! [`CircuitBuilder`]: crate::circuit::CircuitBuilder

pub mod bits;
pub mod compare;
pub mod msnzb;
pub mod select;
pub mod shift;

pub use bits::{bit_length_check, decompose, pow2, recompose};
pub use compare::{is_equal, is_zero, less_than};
pub use msnzb::msnzb;
pub use select::{and, not, one_hot_select, or, select, swap};
pub use shift::{left_shift, scale_decoder, shift_right};
