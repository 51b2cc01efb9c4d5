//! Variables and linear combinations over them

use std::ops::{Add, Mul, Neg, Sub};

use p3_field::{Field, FieldAlgebra};

/// A variable of the network. Variables map one-to-one to trace columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(pub(crate) usize);

impl Var {
    /// Column index of this variable
    pub fn index(self) -> usize {
        self.0
    }
}

/// `constant + Σ coeff·var`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearCombination<F> {
    terms: Vec<(Var, F)>,
    constant: F,
}

impl<F: Field> LinearCombination<F> {
    pub fn zero() -> Self {
        Self::constant(F::ZERO)
    }

    pub fn one() -> Self {
        Self::constant(F::ONE)
    }

    pub fn constant(constant: F) -> Self {
        Self {
            terms: Vec::new(),
            constant,
        }
    }

    pub fn from_u64(value: u64) -> Self {
        Self::constant(F::from_canonical_u64(value))
    }

    /// `Σ coeff·var` over the given pairs
    pub fn weighted_sum(terms: impl IntoIterator<Item = (Var, F)>) -> Self {
        Self {
            terms: terms.into_iter().collect(),
            constant: F::ZERO,
        }
    }

    pub fn terms(&self) -> &[(Var, F)] {
        &self.terms
    }

    pub fn constant_term(&self) -> F {
        self.constant
    }

    /// Add a constant offset
    pub fn offset(mut self, value: F) -> Self {
        self.constant += value;
        self
    }

    /// Evaluate against a full assignment indexed by variable
    pub fn evaluate(&self, values: &[F]) -> F {
        self.terms
            .iter()
            .fold(self.constant, |acc, &(var, coeff)| acc + coeff * values[var.0])
    }
}

impl<F: Field> From<Var> for LinearCombination<F> {
    fn from(var: Var) -> Self {
        Self {
            terms: vec![(var, F::ONE)],
            constant: F::ZERO,
        }
    }
}

impl<F: Field> Add for LinearCombination<F> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
        self
    }
}

impl<F: Field> Add<Var> for LinearCombination<F> {
    type Output = Self;

    fn add(mut self, rhs: Var) -> Self {
        self.terms.push((rhs, F::ONE));
        self
    }
}

impl<F: Field> Sub for LinearCombination<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl<F: Field> Sub<Var> for LinearCombination<F> {
    type Output = Self;

    fn sub(mut self, rhs: Var) -> Self {
        self.terms.push((rhs, F::NEG_ONE));
        self
    }
}

impl<F: Field> Mul<F> for LinearCombination<F> {
    type Output = Self;

    fn mul(mut self, rhs: F) -> Self {
        for (_, coeff) in self.terms.iter_mut() {
            *coeff *= rhs;
        }
        self.constant *= rhs;
        self
    }
}

impl<F: Field> Neg for LinearCombination<F> {
    type Output = Self;

    fn neg(self) -> Self {
        self * F::NEG_ONE
    }
}
