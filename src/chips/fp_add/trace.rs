//! FP-add trace generation from a batch of additions

use p3_air::BaseAir;
use p3_field::{FieldAlgebra, PrimeField64};
use p3_matrix::dense::RowMajorMatrix;
use tracing::{debug, info, instrument};

use super::air::FpAddChip;
use super::columns::FP_ADD_IO_COLUMNS;
use crate::error::{CircuitError, Result};
use crate::float::EncodedFloat;
use crate::trace::AdditionTrace;

/// Solve one witness per addition and lay them out as rows.
///
/// Pads to a power of two (at least 2) with `0 + 0`, which takes the bypass
/// path and satisfies every constraint. When the chip binds claims, each row
/// also gets its claim queue: slot `j` of row `r` holds the I/O prefix of row
/// `r + j`, or zeros past the last addition.
#[instrument(skip_all, fields(format = %chip.format(), ops = trace.len()))]
pub fn generate_fp_add_trace<F: PrimeField64>(
    chip: &FpAddChip<F>,
    trace: &AdditionTrace,
) -> Result<RowMajorMatrix<F>> {
    if trace.format != *chip.format() {
        return Err(CircuitError::InvalidFormat {
            exponent_bits: trace.format.exponent_bits,
            precision: trace.format.precision,
            reason: "trace format differs from the chip format",
        });
    }
    let num_ops = trace.len();
    if chip.claims() != 0 && chip.claims() != num_ops {
        return Err(CircuitError::ClaimCount {
            expected: chip.claims(),
            actual: num_ops,
        });
    }
    let adder = chip.adder();
    let witness_width = chip.queue_offset();
    let width = BaseAir::<F>::width(chip);
    let trace_len = num_ops.next_power_of_two().max(2);

    let mut witnesses = Vec::with_capacity(num_ops);
    for (row, op) in trace.ops.iter().enumerate() {
        let witness = adder.witness(op.lhs, op.rhs).map_err(|err| match err {
            CircuitError::Unsatisfied { index, label } => {
                CircuitError::AirConstraint { row, index, label }
            }
            other => other,
        })?;
        witnesses.push(witness);
    }
    let padding = adder.witness(EncodedFloat::ZERO, EncodedFloat::ZERO)?;
    debug!(padding = trace_len - num_ops, "padded trace");

    let mut values = Vec::with_capacity(trace_len * width);
    for row in 0..trace_len {
        let witness = witnesses.get(row).unwrap_or(&padding);
        values.extend_from_slice(&witness.values()[..witness_width]);
        for slot in 0..chip.claims() {
            if let Some(source) = witnesses.get(row + slot) {
                values.extend_from_slice(&source.values()[..FP_ADD_IO_COLUMNS]);
            } else {
                values.extend(std::iter::repeat(F::ZERO).take(FP_ADD_IO_COLUMNS));
            }
        }
    }
    info!(rows = trace_len, width, "generated fp-add trace");

    Ok(RowMajorMatrix::new(values, width))
}
