//! Admission check for encoded floats

use p3_field::PrimeField64;

use crate::circuit::{CircuitBuilder, LinearCombination};
use crate::error::Result;
use crate::gadgets::{and, bit_length_check, is_zero, pow2, select};

use super::{FloatExpr, FloatFormat};

/// 1 if `x` is well formed, 0 otherwise.
///
/// A zero exponent requires a zero mantissa; otherwise `e < 2^k` and
/// `m - 2^p < 2^p`. A mantissa below `2^p` wraps around the field in the
/// subtraction and fails the bit-length query.
pub fn well_formed<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    format: &FloatFormat,
    x: &FloatExpr<F>,
) -> Result<LinearCombination<F>> {
    let e_is_zero = is_zero(builder, x.e.clone())?;
    let m_is_zero = is_zero(builder, x.m.clone())?;
    let e_in_range = bit_length_check(builder, x.e.clone(), format.exponent_bits)?;
    let m_in_range = bit_length_check(
        builder,
        x.m.clone().offset(-pow2::<F>(format.precision)),
        format.precision,
    )?;
    let both = and(builder, e_in_range.into(), m_in_range.into())?;
    select(builder, e_is_zero.into(), m_is_zero.into(), both.into())
}

/// Make the network unsatisfiable unless `x` is well formed
pub fn assert_well_formed<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    format: &FloatFormat,
    x: &FloatExpr<F>,
) -> Result<()> {
    let ok = well_formed(builder, format, x)?;
    builder.assert_one("well_formed", ok);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CircuitError;
    use crate::float::EncodedFloat;
    use p3_baby_bear::BabyBear;
    use p3_field::FieldAlgebra;

    type F = BabyBear;

    #[test]
    fn query_matches_native_predicate() {
        let format = FloatFormat::LAB;
        let mut builder = CircuitBuilder::<F>::new();
        let e = builder.alloc_input();
        let m = builder.alloc_input();
        let ok = well_formed(&mut builder, &format, &FloatExpr::from_vars(e, m)).unwrap();
        let circuit = builder.build().unwrap();

        for e in [0u64, 1, 7, 255, 256] {
            for m in [0u64, 1, 15, 16, 31, 32] {
                let witness = circuit
                    .solve(&[F::from_canonical_u64(e), F::from_canonical_u64(m)])
                    .unwrap();
                let expected = EncodedFloat::new(e, m).is_well_formed(&format);
                assert_eq!(witness.evaluate(&ok), F::from_bool(expected), "({e}, {m})");
            }
        }
    }

    #[test]
    fn assertion_rejects_zero_exponent_with_mantissa() {
        let mut builder = CircuitBuilder::<F>::new();
        let e = builder.alloc_input();
        let m = builder.alloc_input();
        assert_well_formed(&mut builder, &FloatFormat::LAB, &FloatExpr::from_vars(e, m)).unwrap();
        let circuit = builder.build().unwrap();

        assert!(circuit.solve(&[F::ZERO, F::ZERO]).is_ok());
        assert!(matches!(
            circuit.solve(&[F::ZERO, F::from_canonical_u32(16)]),
            Err(CircuitError::Unsatisfied { label: "well_formed", .. })
        ));
    }
}
