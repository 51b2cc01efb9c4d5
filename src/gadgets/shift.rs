//! Fixed right shifts and variable left shifts

use p3_field::PrimeField64;

use crate::circuit::{CircuitBuilder, LinearCombination, Var};
use crate::error::Result;

use super::bits::{decompose, pow2, recompose};
use super::compare::{is_zero, less_than};
use super::select::one_hot_select;

/// `floor(value / 2^shift)` for `value < 2^bits`, with `shift` fixed at build time.
///
/// Truncates; the dropped low digits are still range-checked.
pub fn shift_right<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    value: LinearCombination<F>,
    bits: usize,
    shift: usize,
) -> Result<LinearCombination<F>> {
    let digits = decompose(builder, value, bits)?;
    Ok(recompose(&digits[shift.min(bits)..]))
}

/// One-hot vector of length `bound` with the 1 at position `shift`.
///
/// Runs a counter down from `shift`, stopping once it reaches zero, and keeps
/// only the first position where it reads zero. When `shift >= bound` the
/// counter never reaches zero and every digit is 0; callers that need the
/// scale to be nonzero must bound `shift` separately.
pub fn scale_decoder<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    shift: LinearCombination<F>,
    bound: usize,
) -> Result<Vec<Var>> {
    let mut counter = shift;
    let mut emitted = LinearCombination::zero();
    let mut one_hot = Vec::with_capacity(bound);
    for _ in 0..bound {
        let at_zero = is_zero(builder, counter.clone())?;
        let hit = builder.product(
            "scale_decoder.first",
            at_zero.into(),
            LinearCombination::one() - emitted.clone(),
        )?;
        emitted = emitted + hit;
        // decrement only while the counter is still positive
        counter = (counter + at_zero).offset(F::NEG_ONE);
        one_hot.push(hit);
    }
    Ok(one_hot)
}

/// `value · 2^shift` for a variable `shift < bound`.
///
/// Unless `skip_checks` is set the network asserts `shift < bound`. With
/// `skip_checks` an out-of-range shift yields 0, so callers may only set it
/// when the result is discarded or the shift is bounded elsewhere.
pub fn left_shift<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    value: LinearCombination<F>,
    shift: LinearCombination<F>,
    bound: usize,
    skip_checks: bool,
) -> Result<Var> {
    if !skip_checks {
        let in_range = less_than(
            builder,
            bound,
            shift.clone(),
            LinearCombination::from_u64(bound as u64),
        )?;
        builder.assert_one("left_shift.bound", in_range);
    }
    let one_hot = scale_decoder(builder, shift, bound)?;
    let powers: Vec<F> = (0..bound).map(pow2).collect();
    let scale = one_hot_select(&one_hot, &powers);
    builder.product("left_shift", scale, value)
}
