//! FP-add AIR constraints

use std::borrow::Borrow;
use std::ops::Deref;

use p3_air::{Air, AirBuilder, AirBuilderWithPublicValues, BaseAir};
use p3_field::PrimeField64;
use p3_matrix::dense::RowMajorMatrix;
use p3_matrix::Matrix;

use super::columns::{FpAddIo, FP_ADD_IO_COLUMNS};
use crate::chips::check::first_violation;
use crate::circuit::LinearCombination;
use crate::error::{CircuitError, Result};
use crate::float::{FloatAddCircuit, FloatFormat};
use crate::trace::AddClaim;

/// Label reported for the constraints that bind rows to public claims
const CLAIM_LABEL: &str = "claim";

/// One floating-point addition per row.
///
/// The row starts with the full witness of the adder network; every rank-1
/// constraint `a · b = c` becomes the degree-2 row constraint `a·b - c = 0`.
///
/// With `n` claims the row also carries a queue of `n` I/O slots. The first
/// row's queue equals the public values, each transition shifts the queue by
/// one slot (filling zeros at the back), and every row's I/O prefix must equal
/// the head of its queue. Row `r < n` therefore proves claim `r` and the
/// padding rows prove `0 + 0 = 0`.
#[derive(Clone, Debug)]
pub struct FpAddChip<F> {
    adder: FloatAddCircuit<F>,
    claims: usize,
}

impl<F: PrimeField64> FpAddChip<F> {
    /// Chip with no claim queue; rows are checked but not bound
    pub fn new(format: FloatFormat) -> Result<Self> {
        Ok(Self {
            adder: FloatAddCircuit::new(format)?,
            claims: 0,
        })
    }

    /// Bind the first `claims` rows to public values
    pub fn with_claims(mut self, claims: usize) -> Self {
        self.claims = claims;
        self
    }

    pub fn claims(&self) -> usize {
        self.claims
    }

    /// First column of the claim queue
    pub(crate) fn queue_offset(&self) -> usize {
        self.adder.circuit().num_vars()
    }

    /// Public values for `claims`, in queue order
    pub fn public_values(&self, claims: &[AddClaim]) -> Result<Vec<F>> {
        if claims.len() != self.claims {
            return Err(CircuitError::ClaimCount {
                expected: self.claims,
                actual: claims.len(),
            });
        }
        let mut values = Vec::with_capacity(claims.len() * FP_ADD_IO_COLUMNS);
        for claim in claims {
            let io = claim.to_io::<F>()?;
            let slot: &[F; FP_ADD_IO_COLUMNS] = io.borrow();
            values.extend_from_slice(slot);
        }
        Ok(values)
    }

    pub fn format(&self) -> &FloatFormat {
        self.adder.format()
    }

    pub fn adder(&self) -> &FloatAddCircuit<F> {
        &self.adder
    }

    /// Operands and sum of a trace row
    pub fn io(&self, trace: &RowMajorMatrix<F>, row: usize) -> FpAddIo<F> {
        let values = trace.row_slice(row);
        let prefix: [F; FP_ADD_IO_COLUMNS] = std::array::from_fn(|i| values[i]);
        let io: &FpAddIo<F> = prefix.borrow();
        *io
    }

    /// Evaluate the AIR on every row and report the first failing constraint
    pub fn check_trace(&self, trace: &RowMajorMatrix<F>, public_values: &[F]) -> Result<()> {
        let expected = BaseAir::<F>::width(self);
        if trace.width() != expected {
            return Err(CircuitError::TraceWidth {
                expected,
                actual: trace.width(),
            });
        }
        if public_values.len() != self.claims * FP_ADD_IO_COLUMNS {
            return Err(CircuitError::ClaimCount {
                expected: self.claims,
                actual: public_values.len() / FP_ADD_IO_COLUMNS,
            });
        }
        match first_violation(self, trace, public_values) {
            None => Ok(()),
            Some((row, index)) => Err(CircuitError::AirConstraint {
                row,
                index,
                label: self.label(index),
            }),
        }
    }

    /// Label of the `index`-th assertion made by `eval`
    fn label(&self, index: usize) -> &'static str {
        self.adder
            .circuit()
            .constraints()
            .get(index)
            .map_or(CLAIM_LABEL, |constraint| constraint.label)
    }
}

impl<F: PrimeField64> BaseAir<F> for FpAddChip<F> {
    fn width(&self) -> usize {
        self.queue_offset() + self.claims * FP_ADD_IO_COLUMNS
    }
}

impl<F: PrimeField64, AB: AirBuilderWithPublicValues<F = F>> Air<AB> for FpAddChip<F> {
    fn eval(&self, builder: &mut AB) {
        let main = builder.main();
        let local_slice = main.row_slice(0);
        let local: &[AB::Var] = local_slice.deref();

        for constraint in self.adder.circuit().constraints() {
            let a = lc_expr::<AB>(&constraint.a, local);
            let b = lc_expr::<AB>(&constraint.b, local);
            let c = lc_expr::<AB>(&constraint.c, local);
            builder.assert_zero(a * b - c);
        }

        if self.claims == 0 {
            return;
        }
        let queue = self.queue_offset();
        let slots = self.claims * FP_ADD_IO_COLUMNS;
        let public_values: Vec<AB::Expr> = builder
            .public_values()
            .iter()
            .map(|&value| value.into())
            .collect();
        let next_slice = main.row_slice(1);
        let next: &[AB::Var] = next_slice.deref();

        for column in 0..FP_ADD_IO_COLUMNS {
            builder.assert_eq(local[column], local[queue + column]);
        }
        for (slot, value) in public_values.into_iter().take(slots).enumerate() {
            builder.when_first_row().assert_eq(local[queue + slot], value);
        }
        for slot in 0..slots {
            let shifted = slot + FP_ADD_IO_COLUMNS;
            if shifted < slots {
                builder
                    .when_transition()
                    .assert_eq(next[queue + slot], local[queue + shifted]);
            } else {
                builder.when_transition().assert_zero(next[queue + slot]);
            }
        }
    }
}

fn lc_expr<AB: AirBuilder>(lc: &LinearCombination<AB::F>, row: &[AB::Var]) -> AB::Expr {
    lc.terms().iter().fold(
        AB::Expr::from(lc.constant_term()),
        |acc, (var, coeff)| acc + AB::Expr::from(row[var.index()]) * AB::Expr::from(*coeff),
    )
}
