//! The floating-point adder

use p3_field::PrimeField64;
use tracing::debug;

use crate::circuit::{Circuit, CircuitBuilder, CircuitStats, LinearCombination, Var, Witness};
use crate::error::Result;
use crate::gadgets::{is_zero, left_shift, less_than, or, select, swap};

use super::{assert_well_formed, normalize, round, EncodedFloat, FloatExpr, FloatFormat};

/// Emit the constraints of `inputs[0] + inputs[1]` and return the sum.
///
/// Both inputs are asserted well formed; the sum is well formed whenever
/// its exponent stays below `2^k`.
pub fn float_add<F: PrimeField64>(
    builder: &mut CircuitBuilder<F>,
    format: &FloatFormat,
    inputs: [FloatExpr<F>; 2],
) -> Result<FloatExpr<F>> {
    format.validate::<F>()?;
    let k = format.exponent_bits;
    let p = format.precision;

    for input in &inputs {
        assert_well_formed(builder, format, input)?;
    }
    let [lhs, rhs] = inputs;

    // (e, m) pairs of well-formed floats order lexicographically
    let scale = F::from_canonical_u64(1 << (p + 1));
    let magnitude = |x: &FloatExpr<F>| x.e.clone() * scale + x.m.clone();
    let lhs_smaller = less_than(builder, k + p + 1, magnitude(&lhs), magnitude(&rhs))?;

    let (alpha_e, beta_e) = swap(builder, lhs_smaller.clone(), lhs.e, rhs.e)?;
    let (alpha_m, beta_m) = swap(builder, lhs_smaller, lhs.m, rhs.m)?;

    let diff = alpha_e.clone() - beta_e.clone();
    let far_apart = less_than(
        builder,
        k,
        LinearCombination::from_u64(p as u64 + 1),
        diff.clone(),
    )?;
    let alpha_is_zero = is_zero(builder, alpha_e.clone())?;
    let bypass = or(builder, far_apart, alpha_is_zero.into())?;

    // `diff > p + 1` only happens on the bypass path, where the shifted
    // mantissa degenerates to 0 and the result is discarded
    let aligned = left_shift(builder, alpha_m.clone(), diff, p + 2, true)?;
    let sum = beta_m + aligned;

    let wide = format.wide_precision();
    // a nonzero sum is guaranteed off the bypass path since alpha is nonzero
    let normalized = normalize(builder, p, wide, FloatExpr::new(beta_e, sum), true)?;
    let rounded = round(builder, p, wide, normalized)?;

    let e = select(builder, bypass.clone(), alpha_e, rounded.e)?;
    let m = select(builder, bypass, alpha_m, rounded.m)?;
    Ok(FloatExpr::new(e, m))
}

/// A compiled adder for one format.
///
/// Variables `0..4` are the inputs `[e0, m0, e1, m1]` and `4..6` the outputs
/// `[e_out, m_out]`.
#[derive(Clone, Debug)]
pub struct FloatAddCircuit<F> {
    format: FloatFormat,
    circuit: Circuit<F>,
    output: [Var; 2],
}

impl<F: PrimeField64> FloatAddCircuit<F> {
    pub fn new(format: FloatFormat) -> Result<Self> {
        let mut builder = CircuitBuilder::new();
        let lhs = FloatExpr::from_vars(builder.alloc_input(), builder.alloc_input());
        let rhs = FloatExpr::from_vars(builder.alloc_input(), builder.alloc_input());
        let output = [builder.reserve_output(), builder.reserve_output()];

        let sum = float_add(&mut builder, &format, [lhs, rhs])?;
        builder.bind_output(output[0], sum.e);
        builder.bind_output(output[1], sum.m);

        let circuit = builder.build()?;
        debug!(
            %format,
            vars = circuit.num_vars(),
            constraints = circuit.constraints().len(),
            "compiled float adder"
        );
        Ok(Self {
            format,
            circuit,
            output,
        })
    }

    pub fn format(&self) -> &FloatFormat {
        &self.format
    }

    pub fn circuit(&self) -> &Circuit<F> {
        &self.circuit
    }

    pub fn output(&self) -> [Var; 2] {
        self.output
    }

    pub fn stats(&self) -> CircuitStats {
        self.circuit.stats()
    }

    /// Solve the network for one pair of operands
    pub fn witness(&self, lhs: EncodedFloat, rhs: EncodedFloat) -> Result<Witness<F>> {
        let [e0, m0] = lhs.to_fields()?;
        let [e1, m1] = rhs.to_fields()?;
        self.circuit.solve(&[e0, m0, e1, m1])
    }

    /// The sum as read off a solved witness
    pub fn read_output(&self, witness: &Witness<F>) -> EncodedFloat {
        EncodedFloat::new(
            witness.get(self.output[0]).as_canonical_u64(),
            witness.get(self.output[1]).as_canonical_u64(),
        )
    }

    pub fn add(&self, lhs: EncodedFloat, rhs: EncodedFloat) -> Result<EncodedFloat> {
        let witness = self.witness(lhs, rhs)?;
        Ok(self.read_output(&witness))
    }
}
