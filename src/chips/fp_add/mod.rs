//! FP-add chip
//!
//! Proves a batch of floating-point additions, one per trace row.

mod air;
mod columns;
mod trace;

pub use air::FpAddChip;
pub use columns::{FpAddIo, FP_ADD_IO_COLUMNS};
pub use trace::generate_fp_add_trace;

use p3_field::PrimeField64;
use p3_matrix::dense::RowMajorMatrix;

use crate::error::Result;
use crate::trace::AdditionTrace;

impl<F: PrimeField64> FpAddChip<F> {
    /// Generate the trace matrix for this chip
    pub fn generate_trace(&self, trace: &AdditionTrace) -> Result<RowMajorMatrix<F>> {
        generate_fp_add_trace(self, trace)
    }
}
