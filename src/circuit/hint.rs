//! Witness hints
//!
//! A hint is the prover-side rule that computes one or more witness values.
//! Every hint travels together with the constraints that pin its outputs
//! down, so the witness rule and the algebraic relation are registered as a
//! single unit and can be audited side by side.

use std::ops::Range;

use p3_field::PrimeField64;

use super::expr::{LinearCombination, Var};

/// How a hint computes its outputs from already-assigned values
#[derive(Clone, Debug)]
pub enum HintRule<F> {
    /// Low `count` bits of the canonical value, least significant first
    Bits {
        value: LinearCombination<F>,
        count: usize,
    },
    /// Outputs `[inv, out]`: `inv = 1/value` (0 when value is 0), `out = 1 - value·inv`
    IsZero { value: LinearCombination<F> },
    /// Output `a·b`
    Product {
        a: LinearCombination<F>,
        b: LinearCombination<F>,
    },
    /// Output `value`
    Linear { value: LinearCombination<F> },
}

impl<F> HintRule<F> {
    /// Number of outputs the rule writes
    pub fn arity(&self) -> usize {
        match self {
            HintRule::Bits { count, .. } => *count,
            HintRule::IsZero { .. } => 2,
            HintRule::Product { .. } | HintRule::Linear { .. } => 1,
        }
    }
}

impl<F: PrimeField64> HintRule<F> {
    /// Compute the outputs against the partially filled assignment
    pub(crate) fn compute(&self, values: &[F]) -> Vec<F> {
        match self {
            HintRule::Bits { value, count } => {
                let v = value.evaluate(values).as_canonical_u64();
                (0..*count)
                    .map(|i| F::from_bool((v >> i) & 1 == 1))
                    .collect()
            }
            HintRule::IsZero { value } => {
                let v = value.evaluate(values);
                let inv = v.try_inverse().unwrap_or(F::ZERO);
                vec![inv, F::ONE - v * inv]
            }
            HintRule::Product { a, b } => vec![a.evaluate(values) * b.evaluate(values)],
            HintRule::Linear { value } => vec![value.evaluate(values)],
        }
    }
}

/// A hint together with the outputs it assigns and the indices of the
/// constraints pinning them.
#[derive(Clone, Debug)]
pub struct Hinted<F> {
    pub label: &'static str,
    pub rule: HintRule<F>,
    pub outputs: Vec<Var>,
    pub pins: Range<usize>,
}
