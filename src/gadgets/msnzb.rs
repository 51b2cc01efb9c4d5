//! Most-significant nonzero bit

use p3_field::PrimeField64;

use crate::circuit::{CircuitBuilder, LinearCombination, Var};
use crate::error::Result;

use super::bits::decompose;
use super::compare::is_zero;

/// One-hot vector (least significant first) marking the highest set bit of
/// `value < 2^bits`.
///
/// The MSNZB of zero is undefined: unless `skip_checks` is set the network
/// asserts `value != 0`. With `skip_checks` a zero value yields all zeros.
pub fn msnzb<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    value: LinearCombination<F>,
    bits: usize,
    skip_checks: bool,
) -> Result<Vec<Var>> {
    let digits = decompose(builder, value.clone(), bits)?;

    let mut found = LinearCombination::zero();
    let mut one_hot = Vec::with_capacity(bits);
    for digit in digits.iter().rev() {
        let hit = builder.product(
            "msnzb.first",
            (*digit).into(),
            LinearCombination::one() - found.clone(),
        )?;
        found = found + hit;
        one_hot.push(hit);
    }
    one_hot.reverse();

    if !skip_checks {
        let value_is_zero = is_zero(builder, value)?;
        builder.assert_zero("msnzb.nonzero", value_is_zero.into());
    }
    Ok(one_hot)
}
