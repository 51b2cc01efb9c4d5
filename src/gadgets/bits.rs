//! Bit decomposition, recomposition and bit-length checks

use p3_field::{FieldAlgebra, PrimeField64};

use crate::circuit::{CircuitBuilder, Constraint, HintRule, LinearCombination, Var};
use crate::error::Result;

use super::compare::{is_equal, is_zero};

/// `2^i` as a field element
pub fn pow2<F: FieldAlgebra>(i: usize) -> F {
    F::TWO.exp_u64(i as u64)
}

/// `Σ 2^i · bits[i]`
pub fn recompose<F: PrimeField64>(bits: &[Var]) -> LinearCombination<F> {
    LinearCombination::weighted_sum(bits.iter().enumerate().map(|(i, bit)| (*bit, pow2(i))))
}

/// Decompose `value` into `count` boolean digits, least significant first.
///
/// The digits are constrained boolean and must recompose to `value`, so the
/// network has no satisfying assignment unless `value < 2^count`.
pub fn decompose<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    value: LinearCombination<F>,
    count: usize,
) -> Result<Vec<Var>> {
    let rule = HintRule::Bits {
        value: value.clone(),
        count,
    };
    builder.hinted("range", rule, |bits| {
        let mut pins: Vec<_> = bits
            .iter()
            .map(|bit| Constraint::boolean("range.bool", *bit))
            .collect();
        pins.push(Constraint::equal("range.sum", recompose(bits), value));
        pins
    })
}

/// 1 if `value < 2^count`, 0 otherwise. Never makes the network unsatisfiable.
pub fn bit_length_check<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    value: LinearCombination<F>,
    count: usize,
) -> Result<Var> {
    if count == 0 {
        return is_zero(builder, value);
    }
    let rule = HintRule::Bits {
        value: value.clone(),
        count,
    };
    let bits = builder.hinted("bit_length", rule, |bits| {
        bits.iter()
            .map(|bit| Constraint::boolean("bit_length.bool", *bit))
            .collect()
    })?;
    is_equal(builder, recompose(&bits), value)
}
