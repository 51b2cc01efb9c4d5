//! Floating-point encoding and the addition network
//!
//! A float is a pair `(e, m)`: zero is `(0, 0)`, and every other value is
//! `m · 2^(e - p)` with `m` normalized into `[2^p, 2^(p+1))`. The gadgets in
//! this module work on pairs of linear combinations ([`FloatExpr`]); the
//! native types ([`FloatFormat`], [`EncodedFloat`]) describe the format and
//! concrete values.

pub mod add;
pub mod encoding;
pub mod normalize;
pub mod reference;
pub mod round;
pub mod well_formed;

pub use add::{float_add, FloatAddCircuit};
pub use encoding::{EncodedFloat, FloatFormat};
pub use normalize::normalize;
pub use round::round;
pub use well_formed::{assert_well_formed, well_formed};

use p3_field::Field;

use crate::circuit::{LinearCombination, Var};

/// An `(e, m)` pair inside the network
#[derive(Clone, Debug)]
pub struct FloatExpr<F> {
    pub e: LinearCombination<F>,
    pub m: LinearCombination<F>,
}

impl<F: Field> FloatExpr<F> {
    pub fn new(e: LinearCombination<F>, m: LinearCombination<F>) -> Self {
        Self { e, m }
    }

    pub fn from_vars(e: Var, m: Var) -> Self {
        Self::new(e.into(), m.into())
    }
}
