//! Zero, equality and less-than tests

use p3_field::PrimeField64;

use crate::circuit::{CircuitBuilder, Constraint, HintRule, LinearCombination, Var};
use crate::error::Result;

use super::bits::{decompose, pow2};

/// 1 if `value == 0`, 0 otherwise, for any field value.
///
/// Hints `inv = 1/value` (0 when `value` is 0) and pins
/// `value·inv = 1 - out` and `value·out = 0`.
pub fn is_zero<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    value: LinearCombination<F>,
) -> Result<Var> {
    let rule = HintRule::IsZero {
        value: value.clone(),
    };
    let outputs = builder.hinted("is_zero", rule, |outputs| {
        let (inv, out) = (outputs[0], outputs[1]);
        vec![
            Constraint::new(
                "is_zero.inv",
                value.clone(),
                inv.into(),
                LinearCombination::one() - out,
            ),
            Constraint::new("is_zero.out", value, out.into(), LinearCombination::zero()),
        ]
    })?;
    Ok(outputs[1])
}

/// 1 if `lhs == rhs`, 0 otherwise
pub fn is_equal<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    lhs: LinearCombination<F>,
    rhs: LinearCombination<F>,
) -> Result<Var> {
    is_zero(builder, rhs - lhs)
}

/// 1 if `lhs < rhs`, 0 otherwise. Both operands must be below `2^bits`.
///
/// `lhs + 2^bits - rhs` is decomposed into `bits + 1` digits; its top digit
/// is clear exactly when `lhs < rhs`.
pub fn less_than<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    bits: usize,
    lhs: LinearCombination<F>,
    rhs: LinearCombination<F>,
) -> Result<LinearCombination<F>> {
    let shifted = (lhs - rhs).offset(pow2(bits));
    let digits = decompose(builder, shifted, bits + 1)?;
    Ok(LinearCombination::one() - digits[bits])
}
