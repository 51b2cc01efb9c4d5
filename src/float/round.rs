//! Round-half-up from a wide precision back to the working precision

use p3_field::PrimeField64;

use crate::circuit::{CircuitBuilder, LinearCombination};
use crate::error::Result;
use crate::gadgets::{less_than, pow2, select, shift_right};

use super::FloatExpr;

/// Round a normalized mantissa `x.m ∈ [2^wide, 2^(wide+1))` to `precision`
/// fractional bits, half up.
///
/// When rounding carries into bit `wide + 1` the result is `(e + 1, 2^p)`
/// instead of an unnormalized mantissa.
pub fn round<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    precision: usize,
    wide: usize,
    x: FloatExpr<F>,
) -> Result<FloatExpr<F>> {
    debug_assert!(wide > precision);
    let dropped = wide - precision;
    let half = pow2::<F>(dropped - 1);

    let limit = pow2::<F>(wide + 1) - half;
    let no_carry = less_than(builder, wide + 1, x.m.clone(), LinearCombination::constant(limit))?;

    let shifted = shift_right(builder, x.m.offset(half), wide + 2, dropped)?;

    let e = select(
        builder,
        no_carry.clone(),
        x.e.clone(),
        x.e.offset(F::ONE),
    )?;
    let m = select(
        builder,
        no_carry,
        shifted,
        LinearCombination::constant(pow2(precision)),
    )?;
    Ok(FloatExpr::new(e, m))
}
