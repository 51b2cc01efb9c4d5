//! Normalization of a wide mantissa

use p3_field::PrimeField64;

use crate::circuit::{CircuitBuilder, LinearCombination};
use crate::error::Result;
use crate::gadgets::{left_shift, msnzb};

use super::FloatExpr;

/// Shift the highest set bit of `x.m` (a `wide + 1`-bit value) to position
/// `wide`, compensating in the exponent.
///
/// With top bit at index `t`, the result is `(e + t - p, m · 2^(wide - t))`,
/// i.e. a mantissa in `[2^wide, 2^(wide+1))` at precision `wide`. `x.m` must
/// be nonzero unless `skip_checks` is set; a zero mantissa then stays zero
/// and the exponent is meaningless.
pub fn normalize<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    precision: usize,
    wide: usize,
    x: FloatExpr<F>,
    skip_checks: bool,
) -> Result<FloatExpr<F>> {
    debug_assert!(wide > precision);
    let one_hot = msnzb(builder, x.m.clone(), wide + 1, skip_checks)?;
    let top = LinearCombination::weighted_sum(
        one_hot
            .iter()
            .enumerate()
            .map(|(i, digit)| (*digit, F::from_canonical_usize(i))),
    );
    let shift = LinearCombination::from_u64(wide as u64) - top.clone();
    let m = left_shift(builder, x.m, shift, wide + 1, skip_checks)?;
    let e = (x.e + top).offset(-F::from_canonical_usize(precision));
    Ok(FloatExpr::new(e, m.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use p3_field::FieldAlgebra;
    use p3_goldilocks::Goldilocks;

    type F = Goldilocks;

    fn n(v: u64) -> F {
        F::from_canonical_u64(v)
    }

    fn normalizer(p: usize, wide: usize) -> (crate::circuit::Circuit<F>, FloatExpr<F>) {
        let mut builder = CircuitBuilder::<F>::new();
        let e = builder.alloc_input();
        let m = builder.alloc_input();
        let out = normalize(&mut builder, p, wide, FloatExpr::from_vars(e, m), false).unwrap();
        (builder.build().unwrap(), out)
    }

    #[test]
    fn moves_top_bit_to_wide_position() {
        let (p, wide) = (4, 9);
        let (circuit, out) = normalizer(p, wide);
        for m in [1u64, 5, 18, 36, 511, 1023] {
            let witness = circuit.solve(&[n(20), n(m)]).unwrap();
            let top = 63 - m.leading_zeros() as u64;
            assert_eq!(witness.evaluate(&out.m), n(m << (wide as u64 - top)), "m = {m}");
            assert_eq!(witness.evaluate(&out.e), n(20 + top - p as u64), "m = {m}");
        }
    }

    #[test]
    fn already_normalized_input_is_unshifted() {
        let (p, wide) = (4, 9);
        let (circuit, out) = normalizer(p, wide);
        for m in [512u64, 700, 1023] {
            let witness = circuit.solve(&[n(20), n(m)]).unwrap();
            assert_eq!(witness.evaluate(&out.m), n(m));
            // top = wide, so the exponent only moves by the precision change
            assert_eq!(witness.evaluate(&out.e), n(20 + (wide - p) as u64));
        }
    }

    #[test]
    fn shift_bound_follows_skip_flag() {
        let bound_checks = |skip_checks| {
            let mut builder = CircuitBuilder::<F>::new();
            let e = builder.alloc_input();
            let m = builder.alloc_input();
            normalize(&mut builder, 4, 9, FloatExpr::from_vars(e, m), skip_checks).unwrap();
            let circuit = builder.build().unwrap();
            circuit
                .constraints()
                .iter()
                .filter(|c| c.label == "left_shift.bound")
                .count()
        };
        assert_eq!(bound_checks(true), 0);
        assert_eq!(bound_checks(false), 1);
    }

    #[test]
    fn zero_mantissa_needs_waiver() {
        let (circuit, _) = normalizer(4, 9);
        assert!(circuit.solve(&[n(3), n(0)]).is_err());
    }
}
