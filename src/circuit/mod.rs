//! Constraint network core
//!
//! The network is a list of rank-1 constraints `a · b = c` over linear
//! combinations of variables. Every variable other than the public inputs is
//! produced by a [`Hinted`] rule registered together with its pinning
//! constraints, which lets the same description drive both constraint
//! emission (the AIR) and deterministic witness generation.

mod expr;
mod hint;

use std::collections::BTreeMap;

use p3_field::{Field, PrimeField64};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use expr::{LinearCombination, Var};
pub use hint::{HintRule, Hinted};

use crate::error::{CircuitError, Result};

/// Rank-1 constraint `a · b = c`
#[derive(Clone, Debug)]
pub struct Constraint<F> {
    pub label: &'static str,
    pub a: LinearCombination<F>,
    pub b: LinearCombination<F>,
    pub c: LinearCombination<F>,
}

impl<F: Field> Constraint<F> {
    pub fn new(
        label: &'static str,
        a: LinearCombination<F>,
        b: LinearCombination<F>,
        c: LinearCombination<F>,
    ) -> Self {
        Self { label, a, b, c }
    }

    /// `value = 0`
    pub fn zero(label: &'static str, value: LinearCombination<F>) -> Self {
        Self::new(label, LinearCombination::one(), value, LinearCombination::zero())
    }

    /// `lhs = rhs`
    pub fn equal(
        label: &'static str,
        lhs: LinearCombination<F>,
        rhs: LinearCombination<F>,
    ) -> Self {
        Self::new(label, LinearCombination::one(), lhs, rhs)
    }

    /// `value · (1 - value) = 0`
    pub fn boolean(label: &'static str, var: Var) -> Self {
        Self::new(
            label,
            var.into(),
            LinearCombination::one() - var,
            LinearCombination::zero(),
        )
    }

    pub fn is_satisfied(&self, values: &[F]) -> bool {
        self.a.evaluate(values) * self.b.evaluate(values) == self.c.evaluate(values)
    }
}

/// Incrementally builds a [`Circuit`]
pub struct CircuitBuilder<F> {
    num_vars: usize,
    inputs: Vec<Var>,
    reserved: Vec<Var>,
    hints: Vec<Hinted<F>>,
    constraints: Vec<Constraint<F>>,
}

impl<F: PrimeField64> Default for CircuitBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PrimeField64> CircuitBuilder<F> {
    pub fn new() -> Self {
        Self {
            num_vars: 0,
            inputs: Vec::new(),
            reserved: Vec::new(),
            hints: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Largest `b` such that every `b`-bit value has a unique field representative
    pub fn max_bits() -> usize {
        (63 - F::ORDER_U64.leading_zeros()) as usize
    }

    /// Fail unless a `bits`-wide decomposition recomposes without wrapping
    pub fn check_bits(bits: usize) -> Result<()> {
        if bits > Self::max_bits() {
            return Err(CircuitError::FieldTooSmall {
                bits,
                order: F::ORDER_U64,
            });
        }
        Ok(())
    }

    fn alloc(&mut self) -> Var {
        let var = Var(self.num_vars);
        self.num_vars += 1;
        var
    }

    /// Allocate a public input variable
    pub fn alloc_input(&mut self) -> Var {
        let var = self.alloc();
        self.inputs.push(var);
        var
    }

    /// Allocate an output variable to be bound later with [`Self::bind_output`]
    pub fn reserve_output(&mut self) -> Var {
        let var = self.alloc();
        self.reserved.push(var);
        var
    }

    /// Bind a reserved output to a value
    pub fn bind_output(&mut self, var: Var, value: LinearCombination<F>) {
        self.reserved.retain(|v| *v != var);
        let start = self.constraints.len();
        self.constraints
            .push(Constraint::equal("output", value.clone(), var.into()));
        self.hints.push(Hinted {
            label: "output",
            rule: HintRule::Linear { value },
            outputs: vec![var],
            pins: start..self.constraints.len(),
        });
    }

    /// Register a hint: allocate its outputs, then let `pin` emit the
    /// constraints that make them the unique valid assignment.
    pub fn hinted(
        &mut self,
        label: &'static str,
        rule: HintRule<F>,
        pin: impl FnOnce(&[Var]) -> Vec<Constraint<F>>,
    ) -> Result<Vec<Var>> {
        if let HintRule::Bits { count, .. } = &rule {
            Self::check_bits(*count)?;
        }
        let outputs: Vec<Var> = (0..rule.arity()).map(|_| self.alloc()).collect();
        let pins = pin(&outputs);
        if pins.is_empty() {
            return Err(CircuitError::UnpinnedHint(label));
        }
        let start = self.constraints.len();
        self.constraints.extend(pins);
        self.hints.push(Hinted {
            label,
            rule,
            outputs: outputs.clone(),
            pins: start..self.constraints.len(),
        });
        Ok(outputs)
    }

    /// Allocate `a · b` as a new variable
    pub fn product(
        &mut self,
        label: &'static str,
        a: LinearCombination<F>,
        b: LinearCombination<F>,
    ) -> Result<Var> {
        let rule = HintRule::Product {
            a: a.clone(),
            b: b.clone(),
        };
        let out = self.hinted(label, rule, |out| {
            vec![Constraint::new(label, a, b, out[0].into())]
        })?;
        Ok(out[0])
    }

    pub fn enforce(&mut self, constraint: Constraint<F>) {
        self.constraints.push(constraint);
    }

    pub fn assert_zero(&mut self, label: &'static str, value: LinearCombination<F>) {
        self.enforce(Constraint::zero(label, value));
    }

    pub fn assert_one(&mut self, label: &'static str, value: LinearCombination<F>) {
        self.enforce(Constraint::equal(label, value, LinearCombination::one()));
    }

    pub fn assert_equal(
        &mut self,
        label: &'static str,
        lhs: LinearCombination<F>,
        rhs: LinearCombination<F>,
    ) {
        self.enforce(Constraint::equal(label, lhs, rhs));
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn build(self) -> Result<Circuit<F>> {
        if let Some(var) = self.reserved.first() {
            return Err(CircuitError::UnboundOutput(var.index()));
        }
        let circuit = Circuit {
            num_vars: self.num_vars,
            inputs: self.inputs,
            hints: self.hints,
            constraints: self.constraints,
        };
        debug!(
            vars = circuit.num_vars,
            constraints = circuit.constraints.len(),
            hints = circuit.hints.len(),
            "built circuit"
        );
        Ok(circuit)
    }
}

/// An immutable, compiled network
#[derive(Clone, Debug)]
pub struct Circuit<F> {
    num_vars: usize,
    inputs: Vec<Var>,
    hints: Vec<Hinted<F>>,
    constraints: Vec<Constraint<F>>,
}

impl<F: PrimeField64> Circuit<F> {
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn inputs(&self) -> &[Var] {
        &self.inputs
    }

    pub fn constraints(&self) -> &[Constraint<F>] {
        &self.constraints
    }

    pub fn hints(&self) -> &[Hinted<F>] {
        &self.hints
    }

    /// Run every hint in registration order
    pub fn generate_witness(&self, inputs: &[F]) -> Result<Witness<F>> {
        if inputs.len() != self.inputs.len() {
            return Err(CircuitError::InputCount {
                expected: self.inputs.len(),
                actual: inputs.len(),
            });
        }
        let mut values = vec![F::ZERO; self.num_vars];
        for (var, value) in self.inputs.iter().zip(inputs) {
            values[var.index()] = *value;
        }
        for hint in &self.hints {
            let computed = hint.rule.compute(&values);
            for (var, value) in hint.outputs.iter().zip(computed) {
                values[var.index()] = value;
            }
        }
        Ok(Witness { values })
    }

    /// First unsatisfied constraint, if any
    pub fn check(&self, witness: &Witness<F>) -> Result<()> {
        for (index, constraint) in self.constraints.iter().enumerate() {
            if !constraint.is_satisfied(&witness.values) {
                warn!(index, label = constraint.label, "unsatisfied constraint");
                return Err(CircuitError::Unsatisfied {
                    index,
                    label: constraint.label,
                });
            }
        }
        Ok(())
    }

    /// Generate a witness and check it
    pub fn solve(&self, inputs: &[F]) -> Result<Witness<F>> {
        let witness = self.generate_witness(inputs)?;
        self.check(&witness)?;
        Ok(witness)
    }

    pub fn stats(&self) -> CircuitStats {
        let mut by_label = BTreeMap::new();
        for constraint in &self.constraints {
            *by_label.entry(constraint.label).or_insert(0) += 1;
        }
        CircuitStats {
            vars: self.num_vars,
            inputs: self.inputs.len(),
            constraints: self.constraints.len(),
            hints: self.hints.len(),
            constraints_by_label: by_label,
        }
    }
}

/// Size summary of a circuit
#[derive(Clone, Debug, Serialize)]
pub struct CircuitStats {
    pub vars: usize,
    pub inputs: usize,
    pub constraints: usize,
    pub hints: usize,
    pub constraints_by_label: BTreeMap<&'static str, usize>,
}

/// Full assignment to every variable of a circuit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness<F> {
    values: Vec<F>,
}

impl<F: Field> Witness<F> {
    pub fn get(&self, var: Var) -> F {
        self.values[var.index()]
    }

    pub fn evaluate(&self, value: &LinearCombination<F>) -> F {
        value.evaluate(&self.values)
    }

    pub fn values(&self) -> &[F] {
        &self.values
    }

    /// Overwrite one value; used to exercise soundness against tampered witnesses
    pub fn set(&mut self, var: Var, value: F) {
        self.values[var.index()] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p3_baby_bear::BabyBear;
    use p3_field::FieldAlgebra;
    use p3_goldilocks::Goldilocks;

    type F = BabyBear;

    #[test]
    fn max_bits_matches_field_order() {
        assert_eq!(CircuitBuilder::<BabyBear>::max_bits(), 30);
        assert_eq!(CircuitBuilder::<Goldilocks>::max_bits(), 63);
        assert!(CircuitBuilder::<BabyBear>::check_bits(31).is_err());
    }

    #[test]
    fn unpinned_hint_is_rejected() {
        let mut builder = CircuitBuilder::<F>::new();
        let x = builder.alloc_input();
        let err = builder
            .hinted("loose", HintRule::Linear { value: x.into() }, |_| Vec::new())
            .unwrap_err();
        assert!(matches!(err, CircuitError::UnpinnedHint("loose")));
    }

    #[test]
    fn unbound_output_is_rejected() {
        let mut builder = CircuitBuilder::<F>::new();
        let _ = builder.alloc_input();
        let out = builder.reserve_output();
        match builder.build() {
            Err(CircuitError::UnboundOutput(index)) => assert_eq!(index, out.index()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn product_witness_and_tamper() {
        let mut builder = CircuitBuilder::<F>::new();
        let a = builder.alloc_input();
        let b = builder.alloc_input();
        let out = builder.reserve_output();
        let ab = builder.product("mul", a.into(), b.into()).unwrap();
        builder.bind_output(out, ab.into());
        let circuit = builder.build().unwrap();

        let mut witness = circuit
            .solve(&[F::from_canonical_u32(6), F::from_canonical_u32(7)])
            .unwrap();
        assert_eq!(witness.get(out), F::from_canonical_u32(42));

        witness.set(ab, F::from_canonical_u32(41));
        assert!(matches!(
            circuit.check(&witness),
            Err(CircuitError::Unsatisfied { label: "mul", .. })
        ));
    }

    #[test]
    fn wrong_input_count() {
        let mut builder = CircuitBuilder::<F>::new();
        let _ = builder.alloc_input();
        let circuit = builder.build().unwrap();
        assert!(matches!(
            circuit.generate_witness(&[]),
            Err(CircuitError::InputCount { expected: 1, actual: 0 })
        ));
    }
}
