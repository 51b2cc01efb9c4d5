//! Boolean logic, conditional selection and swapping
//!
//! All conditions must already be constrained boolean; with a non-boolean
//! condition `select` degrades to an unconstrained interpolation.

use p3_field::PrimeField64;

use crate::circuit::{CircuitBuilder, LinearCombination, Var};
use crate::error::Result;

/// `a ∧ b = a·b`
pub fn and<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    a: LinearCombination<F>,
    b: LinearCombination<F>,
) -> Result<Var> {
    builder.product("and", a, b)
}

/// `a ∨ b = a + b - a·b`
pub fn or<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    a: LinearCombination<F>,
    b: LinearCombination<F>,
) -> Result<LinearCombination<F>> {
    let both = builder.product("or", a.clone(), b.clone())?;
    Ok(a + b - both)
}

/// `1 - a`
pub fn not<F: PrimeField64>(a: LinearCombination<F>) -> LinearCombination<F> {
    LinearCombination::one() - a
}

/// `cond ? when_true : when_false`, as `cond·(when_true - when_false) + when_false`
pub fn select<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    cond: LinearCombination<F>,
    when_true: LinearCombination<F>,
    when_false: LinearCombination<F>,
) -> Result<LinearCombination<F>> {
    let delta = builder.product("select", cond, when_true - when_false.clone())?;
    Ok(when_false + delta)
}

/// `(right, left)` when `sel = 1`, `(left, right)` when `sel = 0`, using a
/// single product.
pub fn swap<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    sel: LinearCombination<F>,
    left: LinearCombination<F>,
    right: LinearCombination<F>,
) -> Result<(LinearCombination<F>, LinearCombination<F>)> {
    let delta = builder.product("swap", sel, right.clone() - left.clone())?;
    Ok((left + delta, right - delta))
}

/// Dot product of a one-hot vector with constant entries: the entry at the
/// hot position.
pub fn one_hot_select<F: PrimeField64>(one_hot: &[Var], values: &[F]) -> LinearCombination<F> {
    LinearCombination::weighted_sum(one_hot.iter().copied().zip(values.iter().copied()))
}
